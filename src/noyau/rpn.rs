// src/noyau/rpn.rs
//
// Shunting-yard -> RPN (programme postfixé exécuté par eval.rs)
// Objectif:
// - Convertir une suite de Jeton en RPN, en vérifiant toute la grammaire
// - Les erreurs portent la position (base 1) du jeton fautif
//
// Règles:
// - Ident(name):
//    - fonction autorisée suivie de '(' => appel, arité comptée aux virgules
//    - constante autorisée => valeur (atome)
//    - autre => refus (défense en profondeur : validation.rs a déjà filtré)
// - Moins unaire : opérateur préfixe Neg, plus fort que * / mais plus faible que ^
//   (-2^2 = -4, 2*-3 = -6). Plus unaire ignoré.
// - ^ associatif à droite.
// - Multiplication implicite (2PI, 2(3), (1+2)(3+4), 2 sin(x)) : un '*' au rang de '*'.
//   Deux littéraux accolés (“2 3”) restent une faute.

use num_bigint::BigInt;

use super::erreur::EvalError;
use super::jetons::{Jeton, Tok};
use super::registre::Registre;

/// Profondeur maximale de parenthèses (appels compris).
pub const PROFONDEUR_MAX: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    Num(BigInt),
    Const(&'static str),
    Neg,
    Binaire(Operateur),
    Appel { nom: &'static str, nb_args: usize },
}

/// Éléments de la pile d'opérateurs.
#[derive(Debug)]
enum Op {
    Binaire(Operateur),
    Neg,
    Paren,
    Appel { nom: &'static str, virgules: usize },
}

fn precedence(op: &Op) -> u8 {
    match op {
        Op::Binaire(Operateur::Plus | Operateur::Moins) => 1,
        Op::Binaire(Operateur::Fois | Operateur::Divise) => 2,
        Op::Neg => 3,
        Op::Binaire(Operateur::Puissance) => 4,
        Op::Paren | Op::Appel { .. } => 0,
    }
}

fn operateur(tok: &Tok) -> Option<Operateur> {
    match tok {
        Tok::Plus => Some(Operateur::Plus),
        Tok::Minus => Some(Operateur::Moins),
        Tok::Star => Some(Operateur::Fois),
        Tok::Slash => Some(Operateur::Divise),
        Tok::Caret => Some(Operateur::Puissance),
        _ => None,
    }
}

fn valeur_attendue(j: &Jeton) -> EvalError {
    EvalError::syntaxe(format!("Value expected (char {})", j.pos + 1))
}

fn partie_inattendue(j: &Jeton) -> EvalError {
    EvalError::syntaxe(format!("Unexpected part \"{}\" (char {})", j.texte, j.pos + 1))
}

fn operateur_inattendu(j: &Jeton) -> EvalError {
    EvalError::syntaxe(format!("Unexpected operator {} (char {})", j.texte, j.pos + 1))
}

/// Convertit une suite de jetons en RPN.
///
/// `longueur` = nombre de caractères de la source (positions de fin d'entrée).
///
/// Exemple:
///   jetons: sin ( PI / 2 )
///   rpn:    PI 2 / sin#1
pub fn to_rpn(jetons: &[Jeton], registre: &Registre, longueur: usize) -> Result<Vec<Instr>, EvalError> {
    let mut out: Vec<Instr> = Vec::new();
    let mut ops: Vec<Op> = Vec::new();

    // “valeur attendue” = début, après un opérateur, '(' ou ','.
    let mut attend_valeur = true;
    let mut profondeur: usize = 0;

    let mut i = 0;
    while i < jetons.len() {
        let j = &jetons[i];
        let apres_nombre = i > 0 && matches!(jetons[i - 1].tok, Tok::Num(_));

        match &j.tok {
            Tok::Num(v) => {
                if !attend_valeur {
                    if apres_nombre {
                        return Err(partie_inattendue(j));
                    }
                    empiler_binaire(Operateur::Fois, &mut ops, &mut out);
                }
                out.push(Instr::Num(v.clone()));
                attend_valeur = false;
            }

            Tok::Ident(name) => {
                if !attend_valeur {
                    empiler_binaire(Operateur::Fois, &mut ops, &mut out);
                    attend_valeur = true;
                }

                let appel = matches!(jetons.get(i + 1), Some(Jeton { tok: Tok::LPar, .. }));

                if let Some(nom) = registre.fonction_exacte(name) {
                    if !appel {
                        return Err(EvalError::syntaxe(format!(
                            "Function {nom} requires arguments (char {})",
                            j.pos + 1
                        )));
                    }
                    profondeur += 1;
                    if profondeur > PROFONDEUR_MAX {
                        return Err(EvalError::syntaxe(format!(
                            "Maximum nesting depth of {PROFONDEUR_MAX} exceeded (char {})",
                            j.pos + 1
                        )));
                    }
                    ops.push(Op::Appel { nom, virgules: 0 });
                    // la '(' de l'appel est consommée ici
                    i += 2;
                    attend_valeur = true;

                    // appel sans argument : f()
                    if let Some(Jeton { tok: Tok::RPar, .. }) = jetons.get(i) {
                        ops.pop();
                        profondeur -= 1;
                        out.push(Instr::Appel { nom, nb_args: 0 });
                        attend_valeur = false;
                        i += 1;
                    }
                    continue;
                }

                if let Some(nom) = registre.constante_exacte(name) {
                    if appel {
                        return Err(EvalError::syntaxe(format!(
                            "{nom} is not a function (char {})",
                            j.pos + 1
                        )));
                    }
                    out.push(Instr::Const(nom));
                    attend_valeur = false;
                } else {
                    return Err(EvalError::UnknownIdentifier(name.clone()));
                }
            }

            Tok::Plus | Tok::Minus if attend_valeur => {
                // unaire : '+' neutre, '-' => Neg (préfixe, ne dépile rien)
                if j.tok == Tok::Minus {
                    ops.push(Op::Neg);
                }
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                if attend_valeur {
                    return Err(valeur_attendue(j));
                }
                let op = match operateur(&j.tok) {
                    Some(op) => op,
                    None => return Err(operateur_inattendu(j)),
                };
                empiler_binaire(op, &mut ops, &mut out);
                attend_valeur = true;
            }

            Tok::LPar => {
                if !attend_valeur {
                    empiler_binaire(Operateur::Fois, &mut ops, &mut out);
                    attend_valeur = true;
                }
                profondeur += 1;
                if profondeur > PROFONDEUR_MAX {
                    return Err(EvalError::syntaxe(format!(
                        "Maximum nesting depth of {PROFONDEUR_MAX} exceeded (char {})",
                        j.pos + 1
                    )));
                }
                ops.push(Op::Paren);
            }

            Tok::Virgule => {
                if attend_valeur {
                    return Err(valeur_attendue(j));
                }
                // dépile jusqu'à l'appel englobant
                loop {
                    match ops.last_mut() {
                        Some(Op::Appel { virgules, .. }) => {
                            *virgules += 1;
                            break;
                        }
                        Some(Op::Paren) | None => return Err(operateur_inattendu(j)),
                        Some(_) => vider_sommet(&mut ops, &mut out),
                    }
                }
                attend_valeur = true;
            }

            Tok::RPar => {
                if attend_valeur {
                    return Err(valeur_attendue(j));
                }
                loop {
                    match ops.pop() {
                        Some(Op::Paren) => break,
                        Some(Op::Appel { nom, virgules }) => {
                            out.push(Instr::Appel {
                                nom,
                                nb_args: virgules + 1,
                            });
                            break;
                        }
                        Some(Op::Binaire(o)) => out.push(Instr::Binaire(o)),
                        Some(Op::Neg) => out.push(Instr::Neg),
                        None => return Err(operateur_inattendu(j)),
                    }
                }
                profondeur -= 1;
                attend_valeur = false;
            }
        }

        i += 1;
    }

    if attend_valeur {
        return Err(EvalError::syntaxe(format!(
            "Unexpected end of expression (char {})",
            longueur + 1
        )));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        match op {
            Op::Binaire(o) => out.push(Instr::Binaire(o)),
            Op::Neg => out.push(Instr::Neg),
            Op::Paren | Op::Appel { .. } => {
                return Err(EvalError::syntaxe(format!(
                    "Parenthesis ) expected (char {})",
                    longueur + 1
                )));
            }
        }
    }

    Ok(out)
}

/// Opérateur binaire : dépile ce qui lie plus fort (ou autant, à gauche), puis empile.
fn empiler_binaire(op: Operateur, ops: &mut Vec<Op>, out: &mut Vec<Instr>) {
    let courant = Op::Binaire(op);
    let p_tok = precedence(&courant);
    let droite = op == Operateur::Puissance;

    while let Some(top) = ops.last() {
        if matches!(top, Op::Paren | Op::Appel { .. }) {
            break;
        }
        let p_top = precedence(top);
        let doit_pop = p_top > p_tok || (p_top == p_tok && !droite);
        if !doit_pop {
            break;
        }
        vider_sommet(ops, out);
    }

    ops.push(courant);
}

/// Sort l'opérateur du sommet vers la sortie.
fn vider_sommet(ops: &mut Vec<Op>, out: &mut Vec<Instr>) {
    match ops.pop() {
        Some(Op::Binaire(o)) => out.push(Instr::Binaire(o)),
        Some(Op::Neg) => out.push(Instr::Neg),
        _ => {}
    }
}

/// Format utilitaire (debug) : programme RPN en texte.
pub fn format_rpn(rpn: &[Instr]) -> String {
    rpn.iter()
        .map(|instr| match instr {
            Instr::Num(v) => super::lecture::vers_f64(v, super::lecture::CHIFFRES).to_string(),
            Instr::Const(c) => c.to_string(),
            Instr::Neg => "neg".to_string(),
            Instr::Binaire(Operateur::Plus) => "+".to_string(),
            Instr::Binaire(Operateur::Moins) => "-".to_string(),
            Instr::Binaire(Operateur::Fois) => "*".to_string(),
            Instr::Binaire(Operateur::Divise) => "/".to_string(),
            Instr::Binaire(Operateur::Puissance) => "^".to_string(),
            Instr::Appel { nom, nb_args } => format!("{nom}#{nb_args}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
