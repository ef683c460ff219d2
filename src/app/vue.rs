// src/app/vue.rs
//
// Vue (texte), terminal
// ----------------------
// Objectifs :
// - Même Session (etat.rs) pour le mode ligne de commande et la boucle interactive
// - Rendu pur : des String, aucune écriture ici (main.rs imprime)
// - Erreurs préfixées, sentinelle “empty” neutre

use super::etat::{EtatResultat, Session};
use super::historique::{HistoryItem, Historique};
use crate::noyau::Demarche;

/// Largeur de la colonne expression dans l'historique.
const LARGEUR_EXPR: usize = 32;

impl Session {
    /// Ligne de résultat “en direct”.
    pub fn rendu(&self) -> String {
        rendre_etat(self.etat())
    }

    pub fn rendu_historique(&self) -> String {
        rendre_historique(self.historique())
    }
}

pub fn rendre_etat(etat: &EtatResultat) -> String {
    match etat {
        EtatResultat::Attente => format!("({})", etat.detail()),
        EtatResultat::Valeur(v) => format!("= {v}"),
        EtatResultat::Erreur(e) => format!("! {e}"),
    }
}

pub fn rendre_item(item: &HistoryItem) -> String {
    let mut expr = item.expression.clone();
    if expr.chars().count() > LARGEUR_EXPR {
        expr = expr.chars().take(LARGEUR_EXPR - 1).collect();
        expr.push('…');
    }

    let quand = chrono::DateTime::from_timestamp_millis(item.timestamp)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    format!(
        "{}  {quand}  {expr:<largeur$} = {}",
        item.id,
        item.result,
        largeur = LARGEUR_EXPR
    )
}

pub fn rendre_historique(h: &Historique) -> String {
    if h.is_empty() {
        return "(historique vide)".to_string();
    }
    h.items().map(rendre_item).collect::<Vec<_>>().join("\n")
}

pub fn rendre_demarche(d: &Demarche) -> String {
    format!(
        "Normalisée : {}\nJetons     : {}\nRPN        : {}",
        d.normalise, d.jetons, d.rpn
    )
}

/// Aide de la boucle interactive.
pub const AIDE: &str = "\
Commandes :
  <expression>    évalue et ajoute à l'historique
  :history        affiche l'historique (plus récent en tête)
  :recall <id>    recharge une entrée de l'historique
  :delete <id>    supprime une entrée
  :clear          vide l'historique
  :help           cette aide
  :quit           quitte";
