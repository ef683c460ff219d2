//! Classement des erreurs.
//!
//! Toute défaillance (saisie vide, identifiant hors liste, grammaire, arithmétique)
//! finit dans `EvalError`, dont l'affichage est le message destiné à l'utilisateur.
//! Rien ne panique, rien ne s'échappe de `evaluate`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catégorie d'erreur visible par l'appelant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Empty,
    UnknownIdentifier,
    DivisionByZero,
    SyntaxError,
    NonNumericResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Expression cannot be empty")]
    Empty,

    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Result is not a number")]
    NotANumber,

    #[error("Result is NaN")]
    NaN,
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Empty => ErrorKind::Empty,
            EvalError::UnknownIdentifier(_) => ErrorKind::UnknownIdentifier,
            EvalError::DivisionByZero => ErrorKind::DivisionByZero,
            EvalError::Syntax(_) => ErrorKind::SyntaxError,
            EvalError::NotANumber | EvalError::NaN => ErrorKind::NonNumericResult,
        }
    }

    /// Message utilisateur (identique à `Display`).
    pub fn detail(&self) -> String {
        self.to_string()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EvalError::Empty)
    }

    pub(crate) fn syntaxe(msg: impl Into<String>) -> Self {
        EvalError::Syntax(msg.into())
    }
}

/// Défaut arithmétique interne (lecture.rs / fonctions.rs).
/// ±∞ et NaN ne sont pas des défauts : ils circulent comme valeurs (nombre.rs).
/// Un défaut, lui, interrompt l'évaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Defaut {
    /// Résultat complexe : sqrt(-1), log(-1), asin(2), (-8)^(1/3)...
    NonReel,
    /// Argument hors domaine non numérique (ex: décimales de round).
    Domaine(String),
}

impl From<Defaut> for EvalError {
    fn from(d: Defaut) -> Self {
        match d {
            Defaut::NonReel => EvalError::NotANumber,
            Defaut::Domaine(msg) => EvalError::Syntax(msg),
        }
    }
}

/// Classe le `f64` final (seul endroit où ±∞ et NaN deviennent des erreurs) :
/// `None` si fini.
pub fn classer_non_fini(v: f64) -> Option<EvalError> {
    if v.is_nan() {
        Some(EvalError::NaN)
    } else if v.is_infinite() {
        Some(EvalError::DivisionByZero)
    } else {
        None
    }
}
