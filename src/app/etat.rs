//! src/app/etat.rs
//!
//! État de session (sans rendu).
//!
//! Rôle : contenir l'entrée courante, le résultat “en direct”, l'historique et la précision,
//! et offrir les actions de l'appelant (saisie, validation, rappel, suppression).
//!
//! Contrats :
//! - Toute évaluation passe par le noyau (`Evaluator`) ; rien n'est recalculé ici.
//! - `Attente` (rien de saisi) est distinct de `Erreur(Empty)` : l'appelant choisit le rendu.
//! - Seuls les succès entrent dans l'historique.

use tracing::debug;
use uuid::Uuid;

use super::historique::{HistoryItem, Historique};
use crate::config::Config;
use crate::noyau::eval::PRECISION_MAX;
use crate::noyau::{EvalError, EvaluationResult, Evaluator, Reponse, DEFAULT_PRECISION};

/// Sentinelle affichée tant que rien n'a été saisi.
pub const SENTINELLE_VIDE: &str = "empty";

#[derive(Clone, Debug, PartialEq)]
pub enum EtatResultat {
    /// Rien de saisi : neutre, pas une erreur.
    Attente,
    Valeur(f64),
    Erreur(EvalError),
}

impl EtatResultat {
    /// Texte du résultat : valeur, détail d'erreur, ou sentinelle.
    pub fn detail(&self) -> String {
        match self {
            EtatResultat::Attente => SENTINELLE_VIDE.to_string(),
            EtatResultat::Valeur(v) => v.to_string(),
            EtatResultat::Erreur(e) => e.detail(),
        }
    }

    pub fn est_erreur(&self) -> bool {
        matches!(self, EtatResultat::Erreur(_))
    }

    /// Forme “fil” ; `Attente` replie sur l'erreur Empty.
    pub fn reponse(&self) -> Reponse {
        let r: EvaluationResult = match self {
            EtatResultat::Attente => Err(EvalError::Empty),
            EtatResultat::Valeur(v) => Ok(*v),
            EtatResultat::Erreur(e) => Err(e.clone()),
        };
        Reponse::from(r)
    }
}

impl From<EvaluationResult> for EtatResultat {
    fn from(r: EvaluationResult) -> Self {
        match r {
            Ok(v) => EtatResultat::Valeur(v),
            Err(e) => EtatResultat::Erreur(e),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    // --- entrée utilisateur ---
    entree: String,

    // --- sortie “en direct” ---
    etat: EtatResultat,

    // --- collaborateurs ---
    evaluateur: Evaluator,
    historique: Historique,

    // --- paramètres ---
    precision: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            entree: String::new(),
            etat: EtatResultat::Attente,
            evaluateur: Evaluator::default(),
            historique: Historique::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            evaluateur: Evaluator::default().with_max_length(config.max_length),
            historique: Historique::new(config.history_limit),
            precision: config.precision.min(PRECISION_MAX),
            ..Self::default()
        }
    }

    /* ------------------------ Lecture ------------------------ */

    pub fn entree(&self) -> &str {
        &self.entree
    }

    pub fn etat(&self) -> &EtatResultat {
        &self.etat
    }

    pub fn historique(&self) -> &Historique {
        &self.historique
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn evaluateur(&self) -> &Evaluator {
        &self.evaluateur
    }

    /// Vrai dès que l'entrée contient autre chose que des espaces.
    pub fn a_saisi(&self) -> bool {
        !self.entree.trim().is_empty()
    }

    /* ------------------------ Actions ------------------------ */

    /// Nouvelle entrée : réévaluée aussitôt (retour en direct).
    pub fn saisir(&mut self, texte: impl Into<String>) -> &EtatResultat {
        self.entree = texte.into();
        self.reevaluer();
        &self.etat
    }

    /// Garde-fou : précision bornée, résultat courant recalculé.
    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision.min(PRECISION_MAX);
        self.reevaluer();
    }

    fn reevaluer(&mut self) {
        self.etat = if self.a_saisi() {
            self.evaluateur.evaluate(&self.entree, self.precision).into()
        } else {
            EtatResultat::Attente
        };
    }

    /// Validation (Entrée / “=”).
    ///
    /// Succès : l'expression normalisée part dans l'historique, l'entrée est remise à zéro.
    /// Échec : entrée et erreur conservées pour correction.
    pub fn soumettre(&mut self) -> Result<HistoryItem, EvalError> {
        let valeur = self.evaluateur.evaluate(&self.entree, self.precision);

        let v = match valeur {
            Ok(v) => v,
            Err(e) => {
                self.etat = if self.a_saisi() {
                    EtatResultat::Erreur(e.clone())
                } else {
                    EtatResultat::Attente
                };
                return Err(e);
            }
        };

        let normalise = self.evaluateur.normaliser(&self.entree)?;
        let item = self
            .historique
            .ajouter(&normalise, v)
            .cloned()
            .ok_or(EvalError::Empty)?;

        debug!(id = %item.id, "session: soumis");
        self.clear_entree();
        Ok(item)
    }

    /// Recharge une entrée d'historique comme saisie courante.
    pub fn rappeler(&mut self, id: Uuid) -> bool {
        let Some(item) = self.historique.trouver(id) else {
            return false;
        };
        self.entree = item.expression.clone();
        self.etat = EtatResultat::Valeur(item.result);
        true
    }

    pub fn supprimer(&mut self, id: Uuid) -> bool {
        self.historique.supprimer(id)
    }

    pub fn vider_historique(&mut self) {
        self.historique.vider();
    }

    /// C : efface l'entrée (retour à l'attente).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.etat = EtatResultat::Attente;
    }

    /// AC : remise à zéro totale (entrée + historique + précision par défaut).
    pub fn reset_total(&mut self) {
        self.clear_entree();
        self.historique.vider();
        self.precision = DEFAULT_PRECISION;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attente_puis_direct() {
        let mut s = Session::default();
        assert!(!s.a_saisi());
        assert_eq!(s.etat(), &EtatResultat::Attente);
        assert_eq!(s.etat().detail(), "empty");

        assert_eq!(s.saisir("1 + 2 * 3"), &EtatResultat::Valeur(7.0));
        assert!(s.a_saisi());

        s.saisir("1 / 0");
        assert_eq!(s.etat().detail(), "Division by zero");

        s.saisir("   ");
        assert_eq!(s.etat(), &EtatResultat::Attente);
        assert!(!s.a_saisi());
    }

    #[test]
    fn soumission_reussie() {
        let mut s = Session::default();
        s.saisir("SIN( pi / 2 )");
        let item = s.soumettre().unwrap();

        assert_eq!(item.expression, "sin(PI/2)");
        assert_eq!(item.result, 1.0);
        assert_eq!(s.historique().len(), 1);
        assert_eq!(s.entree(), "");
        assert_eq!(s.etat(), &EtatResultat::Attente);
    }

    #[test]
    fn soumission_en_echec() {
        let mut s = Session::default();
        s.saisir("window");
        assert_eq!(
            s.soumettre(),
            Err(EvalError::UnknownIdentifier("window".into()))
        );
        assert!(s.historique().is_empty());
        assert_eq!(s.entree(), "window");
        assert!(s.etat().est_erreur());

        s.clear_entree();
        assert_eq!(s.soumettre(), Err(EvalError::Empty));
        assert_eq!(s.etat(), &EtatResultat::Attente);
    }

    #[test]
    fn rappel_et_suppression() {
        let mut s = Session::default();
        s.saisir("2 ^ 10");
        let id = s.soumettre().unwrap().id;

        assert!(s.rappeler(id));
        assert_eq!(s.entree(), "2^10");
        assert_eq!(s.etat(), &EtatResultat::Valeur(1024.0));

        assert!(s.supprimer(id));
        assert!(!s.rappeler(id));

        s.saisir("1");
        s.soumettre().unwrap();
        s.vider_historique();
        assert!(s.historique().is_empty());
    }

    #[test]
    fn precision_et_config() {
        let config = Config {
            precision: 2,
            history_limit: 1,
            ..Config::default()
        };
        let mut s = Session::new(&config);
        assert_eq!(s.saisir("1/3"), &EtatResultat::Valeur(0.33));

        s.set_precision(4);
        assert_eq!(s.etat(), &EtatResultat::Valeur(0.3333));

        s.soumettre().unwrap();
        s.saisir("2");
        s.soumettre().unwrap();
        assert_eq!(s.historique().len(), 1);

        s.reset_total();
        assert_eq!(s.precision(), DEFAULT_PRECISION);
        assert!(s.historique().is_empty());
    }

    #[test]
    fn reponse_fil() {
        assert_eq!(
            EtatResultat::Attente.reponse(),
            Reponse::Erreur("Expression cannot be empty".into())
        );
        assert!(EtatResultat::Valeur(1.0).reponse().est_ok());
    }
}
