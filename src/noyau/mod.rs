//! Noyau : évaluateur d'expressions sous liste blanche
//!
//! Organisation interne :
//! - registre.rs   : liste blanche (fonctions, constantes), construite une fois
//! - normalise.rs  : casse canonique des identifiants reconnus (+ scanner partagé)
//! - validation.rs : refus de tout identifiant hors liste (fail closed)
//! - jetons.rs     : tokenisation positionnée
//! - rpn.rs        : shunting-yard + grammaire complète
//! - lecture.rs    : décimal étendu (entiers scalés), arrondi, f64
//! - nombre.rs     : valeurs de pile (fini, ±∞, NaN), règles IEEE
//! - fonctions.rs  : valeurs des constantes, arités, fonctions
//! - erreur.rs     : classement des erreurs
//! - eval.rs       : pipeline complet

pub mod erreur;
pub mod eval;
pub mod fonctions;
pub mod jetons;
pub mod lecture;
pub mod nombre;
pub mod normalise;
pub mod registre;
pub mod rpn;
pub mod validation;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::{ErrorKind, EvalError};
pub use eval::{
    evaluate, Demarche, EvaluationRequest, EvaluationResult, Evaluator, Reponse,
    DEFAULT_PRECISION,
};
pub use registre::Registre;
