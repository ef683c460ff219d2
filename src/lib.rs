//! Calculatrice sûre : évaluateur d'expressions arithmétiques sous liste blanche.
//!
//! - `noyau`  : pipeline pur (normalisation, validation, analyse, calcul décimal étendu)
//! - `app`    : état de l'appelant (saisie en direct, historique, rendu texte)
//! - `config` : configuration TOML
//!
//! ```
//! use calculatrice_sure::evaluate;
//!
//! assert_eq!(evaluate("0.1 + 0.2", 5), Ok(0.3));
//! assert_eq!(evaluate("window", 5).unwrap_err().to_string(), "Unknown identifier: window");
//! ```

pub mod app;
pub mod config;
pub mod noyau;

pub use config::{Config, ConfigError};
pub use noyau::{evaluate, ErrorKind, EvalError, EvaluationRequest, EvaluationResult, Evaluator, Reponse};
