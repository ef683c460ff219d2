// src/noyau/nombre.rs
//
// Valeurs de la pile : décimal scalé fini, ou ±∞, ou NaN
// -------------------------------------------------------
// - Les cas non finis suivent IEEE 754 (1/0 = ∞, 0·∞ = NaN, 1/∞ = 0, ...)
// - Rien n'est classé ici : eval.rs classe la valeur finale seulement
// - Les valeurs finies restent exactes (lecture.rs)

use std::cmp::Ordering;
use std::ops::Neg;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use super::erreur::Defaut;
use super::lecture as l;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nombre {
    Fini(BigInt),
    PlusInf,
    MoinsInf,
    NaN,
}

use Nombre::{Fini, MoinsInf, NaN, PlusInf};

impl Nombre {
    pub fn zero() -> Self {
        Fini(BigInt::zero())
    }

    pub fn un() -> Self {
        Fini(l::un())
    }

    pub fn infini(negatif: bool) -> Self {
        if negatif {
            MoinsInf
        } else {
            PlusInf
        }
    }

    pub fn est_fini(&self) -> bool {
        matches!(self, Fini(_))
    }

    /// -1, 0 ou 1 ; NaN : 0.
    pub fn signe(&self) -> i8 {
        match self {
            Fini(x) if x.is_positive() => 1,
            Fini(x) if x.is_negative() => -1,
            Fini(_) | NaN => 0,
            PlusInf => 1,
            MoinsInf => -1,
        }
    }

    /// Ordre total sauf NaN.
    pub fn comparer(&self, autre: &Nombre) -> Option<Ordering> {
        match (self, autre) {
            (NaN, _) | (_, NaN) => None,
            (Fini(a), Fini(b)) => Some(a.cmp(b)),
            (a, b) => Some(rang(a).cmp(&rang(b))),
        }
    }

    /// Lecture finale : arrondi à `decimales`, puis f64 (±inf / NaN tels quels).
    pub fn vers_f64(&self, decimales: usize) -> f64 {
        match self {
            Fini(v) => l::vers_f64(&l::arrondi(v, l::CHIFFRES, decimales), decimales),
            PlusInf => f64::INFINITY,
            MoinsInf => f64::NEG_INFINITY,
            NaN => f64::NAN,
        }
    }
}

fn rang(x: &Nombre) -> i8 {
    match x {
        MoinsInf => -1,
        PlusInf => 1,
        _ => 0,
    }
}

impl Neg for Nombre {
    type Output = Nombre;

    fn neg(self) -> Nombre {
        match self {
            Fini(x) => Fini(-x),
            PlusInf => MoinsInf,
            MoinsInf => PlusInf,
            NaN => NaN,
        }
    }
}

/* ------------------------ Opérations ------------------------ */

pub fn add(a: &Nombre, b: &Nombre) -> Nombre {
    match (a, b) {
        (Fini(x), Fini(y)) => l::borne(x + y),
        (NaN, _) | (_, NaN) => NaN,
        (PlusInf, MoinsInf) | (MoinsInf, PlusInf) => NaN,
        (PlusInf, _) | (_, PlusInf) => PlusInf,
        _ => MoinsInf,
    }
}

pub fn sub(a: &Nombre, b: &Nombre) -> Nombre {
    add(a, &-b.clone())
}

pub fn mul(a: &Nombre, b: &Nombre) -> Nombre {
    match (a, b) {
        (Fini(x), Fini(y)) => l::borne(l::produit(x, y)),
        (NaN, _) | (_, NaN) => NaN,
        // 0 · ∞
        _ => match a.signe() * b.signe() {
            0 => NaN,
            s => Nombre::infini(s < 0),
        },
    }
}

pub fn div(a: &Nombre, b: &Nombre) -> Nombre {
    match (a, b) {
        (NaN, _) | (_, NaN) => NaN,
        (Fini(_), Fini(y)) if y.is_zero() => match a.signe() {
            0 => NaN,
            s => Nombre::infini(s < 0),
        },
        (Fini(x), Fini(y)) => l::borne(l::quotient(x, y)),
        (Fini(_), _) => Nombre::zero(),
        // ∞ / 0 : signe du numérateur
        (_, Fini(y)) => Nombre::infini((a.signe() < 0) != y.is_negative()),
        _ => NaN,
    }
}

/// x^y, règles de `pow` IEEE pour les cas non finis.
pub fn pow(x: &Nombre, y: &Nombre) -> Result<Nombre, Defaut> {
    match (x, y) {
        (Fini(a), Fini(b)) => l::pow(a, b),
        (_, Fini(b)) if b.is_zero() => Ok(Nombre::un()),
        (NaN, _) | (_, NaN) => Ok(NaN),

        // exposant infini : tout dépend de |x| face à 1
        (Fini(a), _) => {
            let vers_plus = *y == PlusInf;
            Ok(match a.abs().cmp(&l::un()) {
                Ordering::Equal => NaN,
                Ordering::Greater if vers_plus => PlusInf,
                Ordering::Less if !vers_plus => PlusInf,
                _ => Nombre::zero(),
            })
        }

        // base infinie
        (_, Fini(b)) if b.is_negative() => Ok(Nombre::zero()),
        (_, Fini(b)) => Ok(Nombre::infini(*x == MoinsInf && l::entier_impair(b))),
        (_, PlusInf) => Ok(PlusInf),
        (_, MoinsInf) => Ok(Nombre::zero()),
    }
}
