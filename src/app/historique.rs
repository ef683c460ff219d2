//! src/app/historique.rs
//!
//! Historique des calculs réussis (mémoire seulement, aucune persistance).
//!
//! Contrats :
//! - Plus récent en tête ; au-delà de la limite, le plus ancien est évincé.
//! - L'expression stockée est la forme normalisée, sans aucun espace.
//! - Aucune re-validation : l'appelant n'y dépose que des succès.

use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Nombre d'entrées conservées par défaut.
pub const LIMITE_DEFAUT: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub expression: String,
    pub result: f64,
    /// Millisecondes depuis l'époque Unix.
    pub timestamp: i64,
}

/// Sérialisable pour l'export ; jamais relu tel quel (la limite passe par `new`).
#[derive(Clone, Debug, Serialize)]
pub struct Historique {
    items: VecDeque<HistoryItem>,
    limite: usize,
}

impl Default for Historique {
    fn default() -> Self {
        Self::new(LIMITE_DEFAUT)
    }
}

impl Historique {
    pub fn new(limite: usize) -> Self {
        let limite = limite.max(1);
        Self {
            items: VecDeque::with_capacity(limite.min(LIMITE_DEFAUT)),
            limite,
        }
    }

    /// Ajoute un succès. Expression vide (après retrait des espaces) : ignorée.
    pub fn ajouter(&mut self, expression: &str, result: f64) -> Option<&HistoryItem> {
        let expression: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
        if expression.is_empty() {
            return None;
        }

        let item = HistoryItem {
            id: Uuid::new_v4(),
            expression,
            result,
            timestamp: Utc::now().timestamp_millis(),
        };
        debug!(id = %item.id, expression = %item.expression, result, "historique: ajout");

        self.items.push_front(item);
        while self.items.len() > self.limite {
            if let Some(ancien) = self.items.pop_back() {
                debug!(id = %ancien.id, "historique: éviction");
            }
        }

        self.items.front()
    }

    /// Retire une entrée ; `false` si l'id est inconnu.
    pub fn supprimer(&mut self, id: Uuid) -> bool {
        match self.items.iter().position(|it| it.id == id) {
            Some(i) => {
                self.items.remove(i);
                debug!(%id, "historique: suppression");
                true
            }
            None => false,
        }
    }

    pub fn vider(&mut self) {
        debug!(n = self.items.len(), "historique: vidé");
        self.items.clear();
    }

    pub fn trouver(&self, id: Uuid) -> Option<&HistoryItem> {
        self.items.iter().find(|it| it.id == id)
    }

    /// Entrées, plus récente en tête.
    pub fn items(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limite(&self) -> usize {
        self.limite
    }
}
