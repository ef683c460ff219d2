// src/noyau/fonctions.rs
//
// Fonctions et constantes de la liste blanche, sur valeurs scalées (lecture.rs).
// Chaque nom de registre.rs doit avoir ici une arité et une implémentation
// (vérifié par les tests).

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::Signed;

use super::erreur::{Defaut, EvalError};
use super::lecture::{self as l, CHIFFRES};
use super::nombre::{self as n, Nombre};

/// Valeur d'une constante autorisée.
pub fn constante(nom: &str) -> Result<Nombre, Defaut> {
    let deux = l::depuis_entier(2);
    let dix = l::depuis_entier(10);

    match nom {
        "PI" => Ok(Nombre::Fini(l::pi())),
        "E" => Ok(l::exp(&l::un())),
        "LN2" => l::ln(&deux),
        "LN10" => l::ln(&dix),
        "LOG2E" => Ok(n::div(&Nombre::un(), &l::ln(&deux)?)),
        "LOG10E" => Ok(n::div(&Nombre::un(), &l::ln(&dix)?)),
        "SQRT1_2" => l::sqrt(&(l::un() / BigInt::from(2))).map(Nombre::Fini),
        "SQRT2" => l::sqrt(&deux).map(Nombre::Fini),
        _ => Err(Defaut::Domaine(format!("Undefined symbol {nom}"))),
    }
}

/// (min, max) d'arguments ; max = None : variadique.
pub fn arite(nom: &str) -> Option<(usize, Option<usize>)> {
    match nom {
        "log" | "round" => Some((1, Some(2))),
        "pow" => Some((2, Some(2))),
        "min" | "max" => Some((1, None)),
        "sin" | "cos" | "tan" | "asin" | "acos" | "atan" | "sinh" | "cosh" | "tanh" | "log10"
        | "log2" | "ln" | "sqrt" | "abs" | "ceil" | "floor" | "trunc" | "sign" | "exp" => {
            Some((1, Some(1)))
        }
        _ => None,
    }
}

/// Décimales maximales acceptées par round(x, n) : toute la précision de travail.
const ROUND_DECIMALES_MAX: i64 = CHIFFRES as i64;

fn decimales_round(n: &Nombre) -> Result<usize, Defaut> {
    let hors_domaine = || {
        Defaut::Domaine(format!(
            "Number of decimals in function round must be an integer from 0 to {ROUND_DECIMALES_MAX} inclusive"
        ))
    };

    let Nombre::Fini(n) = n else {
        return Err(hors_domaine());
    };
    if !l::est_entier(n) {
        return Err(hors_domaine());
    }
    match l::vers_i64(n) {
        Some(k) if (0..=ROUND_DECIMALES_MAX).contains(&k) => Ok(k as usize),
        _ => Err(hors_domaine()),
    }
}

fn verifier_arite(nom: &str, n: usize) -> Result<(), EvalError> {
    let (min, max) = arite(nom)
        .ok_or_else(|| EvalError::syntaxe(format!("Undefined function {nom}")))?;

    if n < min {
        return Err(EvalError::syntaxe(format!(
            "Too few arguments in function {nom} (expected: {min}, actual: {n})"
        )));
    }
    if let Some(max) = max {
        if n > max {
            return Err(EvalError::syntaxe(format!(
                "Too many arguments in function {nom} (expected: {max}, actual: {n})"
            )));
        }
    }
    Ok(())
}

/// ln étendu : ln(+∞) = +∞, ln(NaN) = NaN.
fn ln_etendu(x: &Nombre) -> Result<Nombre, Defaut> {
    match x {
        Nombre::Fini(v) => l::ln(v),
        Nombre::PlusInf => Ok(Nombre::PlusInf),
        Nombre::MoinsInf => Err(Defaut::NonReel),
        Nombre::NaN => Ok(Nombre::NaN),
    }
}

/// min / max : NaN contamine, ±∞ s'ordonnent.
fn extremum(args: &[Nombre], garder: Ordering) -> Nombre {
    let mut iter = args.iter();
    let Some(mut meilleur) = iter.next() else {
        return Nombre::NaN;
    };
    for a in iter {
        match a.comparer(meilleur) {
            None => return Nombre::NaN,
            Some(o) if o == garder => meilleur = a,
            Some(_) => {}
        }
    }
    meilleur.clone()
}

/// Fonctions à un argument sur ±∞ / NaN.
fn unaire_non_fini(nom: &str, x: &Nombre) -> Result<Nombre, Defaut> {
    if *x == Nombre::NaN {
        return Ok(Nombre::NaN);
    }
    let negatif = *x == Nombre::MoinsInf;
    let unite = |negatif: bool| Nombre::Fini(if negatif { -l::un() } else { l::un() });

    Ok(match nom {
        "sin" | "cos" | "tan" => Nombre::NaN,
        "asin" | "acos" => return Err(Defaut::NonReel),
        "atan" => {
            let demi_pi = l::pi() / BigInt::from(2);
            Nombre::Fini(if negatif { -demi_pi } else { demi_pi })
        }
        "sinh" => x.clone(),
        "cosh" | "abs" => Nombre::PlusInf,
        "tanh" | "sign" => unite(negatif),
        "ln" | "log" | "log10" | "log2" | "sqrt" => {
            if negatif {
                return Err(Defaut::NonReel);
            }
            Nombre::PlusInf
        }
        "exp" => {
            if negatif {
                Nombre::zero()
            } else {
                Nombre::PlusInf
            }
        }
        // ceil, floor, trunc, round
        _ => x.clone(),
    })
}

/// Applique une fonction autorisée à ses arguments (déjà évalués).
pub fn appliquer(nom: &str, args: &[Nombre]) -> Result<Nombre, EvalError> {
    verifier_arite(nom, args.len())?;

    match nom {
        "pow" => return Ok(n::pow(&args[0], &args[1])?),
        "min" => return Ok(extremum(args, Ordering::Less)),
        "max" => return Ok(extremum(args, Ordering::Greater)),
        "log" if args.len() == 2 => {
            return Ok(match (&args[0], &args[1]) {
                (Nombre::Fini(x), Nombre::Fini(base)) => l::log_base(x, base)?,
                (x, base) => n::div(&ln_etendu(x)?, &ln_etendu(base)?),
            });
        }
        _ => {}
    }

    let decimales = match (nom, args.get(1)) {
        ("round", Some(d)) => decimales_round(d)?,
        _ => 0,
    };

    let x = match &args[0] {
        Nombre::Fini(x) => x,
        autre => return Ok(unaire_non_fini(nom, autre)?),
    };

    let v = match nom {
        "sin" => Nombre::Fini(l::sin(x)),
        "cos" => Nombre::Fini(l::cos(x)),
        "tan" => l::tan(x),
        "asin" => Nombre::Fini(l::asin(x)?),
        "acos" => Nombre::Fini(l::acos(x)?),
        "atan" => Nombre::Fini(l::atan(x)),
        "sinh" => l::sinh(x),
        "cosh" => l::cosh(x),
        "tanh" => Nombre::Fini(l::tanh(x)),

        "ln" | "log" => l::ln(x)?,
        "log10" => l::log_base(x, &l::depuis_entier(10))?,
        "log2" => l::log_base(x, &l::depuis_entier(2))?,
        "exp" => l::exp(x),
        "sqrt" => Nombre::Fini(l::sqrt(x)?),

        "abs" => Nombre::Fini(x.abs()),
        "sign" => Nombre::Fini(l::signe(x)),
        "ceil" => Nombre::Fini(l::plafond(x)),
        "floor" => Nombre::Fini(l::plancher(x)),
        "trunc" => Nombre::Fini(l::tronque(x)),
        "round" => Nombre::Fini(l::arrondi_scale(x, decimales)),

        _ => return Err(EvalError::syntaxe(format!("Undefined function {nom}"))),
    };

    Ok(v)
}
