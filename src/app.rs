// src/app.rs
//
// Calculatrice : module App (racine)
// ----------------------------------
// Rôle:
// - Déclarer les sous-modules (historique.rs + etat.rs + vue.rs)
// - Ré-exporter Session (pour main.rs: use calculatrice_sure::app::Session;)
//
// Important:
// - Aucune évaluation ici : tout passe par crate::noyau.

pub mod etat;
pub mod historique;
pub mod vue;

pub use etat::{EtatResultat, Session};
pub use historique::{HistoryItem, Historique};
