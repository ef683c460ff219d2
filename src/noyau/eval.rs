//! Noyau : évaluation (pipeline réel)
//!
//! trim -> vide ? -> longueur -> normalise -> validation (liste blanche)
//!      -> jetons -> RPN -> pile (nombre.rs) -> arrondi -> f64 -> fini ?
//!
//! ±∞ et NaN traversent la pile ; seule la valeur finale est classée.
//!
//! Fonction pure : aucune I/O, aucun log, aucun état partagé mutable.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::erreur::{classer_non_fini, EvalError};
use super::fonctions::{appliquer, constante};
use super::jetons::{format_tokens, tokenize};
use super::lecture::CHIFFRES;
use super::nombre::{self as n, Nombre};
use super::normalise::normalize;
use super::registre::Registre;
use super::rpn::{format_rpn, to_rpn, Instr, Operateur};
use super::validation::validate_identifiers;

/// Décimales par défaut du résultat.
pub const DEFAULT_PRECISION: u32 = 5;

/// Décimales de travail : au-delà, il n'y a plus rien à lire.
pub const PRECISION_MAX: u32 = CHIFFRES as u32;

/// Longueur maximale (en caractères) d'une expression.
pub const LONGUEUR_MAX: usize = 4096;

pub type EvaluationResult = Result<f64, EvalError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub expression: String,
    #[serde(default = "precision_defaut")]
    pub precision: u32,
}

fn precision_defaut() -> u32 {
    DEFAULT_PRECISION
}

impl EvaluationRequest {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }
}

/// Forme “fil” du résultat : `{"ok":true,"value":…}` / `{"ok":false,"error":"…"}`.
/// `ok` découle de la variante.
#[derive(Clone, Debug, PartialEq)]
pub enum Reponse {
    Valeur(f64),
    Erreur(String),
}

impl Reponse {
    pub fn est_ok(&self) -> bool {
        matches!(self, Reponse::Valeur(_))
    }
}

impl Serialize for Reponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut fil = serializer.serialize_struct("Reponse", 2)?;
        fil.serialize_field("ok", &self.est_ok())?;
        match self {
            Reponse::Valeur(v) => fil.serialize_field("value", v)?,
            Reponse::Erreur(e) => fil.serialize_field("error", e)?,
        }
        fil.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReponseFil {
    ok: bool,
    value: Option<f64>,
    error: Option<String>,
}

impl<'de> Deserialize<'de> for Reponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match ReponseFil::deserialize(deserializer)? {
            ReponseFil {
                ok: true,
                value: Some(v),
                error: None,
            } => Ok(Reponse::Valeur(v)),
            ReponseFil {
                ok: false,
                value: None,
                error: Some(e),
            } => Ok(Reponse::Erreur(e)),
            _ => Err(serde::de::Error::custom(
                "\"ok\" must match exactly one of \"value\" / \"error\"",
            )),
        }
    }
}

impl From<&EvaluationResult> for Reponse {
    fn from(r: &EvaluationResult) -> Self {
        match r {
            Ok(value) => Reponse::Valeur(*value),
            Err(e) => Reponse::Erreur(e.detail()),
        }
    }
}

impl From<EvaluationResult> for Reponse {
    fn from(r: EvaluationResult) -> Self {
        Reponse::from(&r)
    }
}

/// Démarche (debug) : formes intermédiaires d'une expression valide.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Demarche {
    pub normalise: String,
    pub jetons: String,
    pub rpn: String,
}

/// Évaluateur : registre + borne de longueur.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator {
    registre: &'static Registre,
    max_length: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Registre::global())
    }
}

impl Evaluator {
    pub fn new(registre: &'static Registre) -> Self {
        Self {
            registre,
            max_length: LONGUEUR_MAX,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn registre(&self) -> &'static Registre {
        self.registre
    }

    /// Normalise puis valide : la seule forme qui atteint l'analyseur.
    fn preparer(&self, expression: &str) -> Result<String, EvalError> {
        let s = expression.trim();
        if s.is_empty() {
            return Err(EvalError::Empty);
        }

        let n = s.chars().count();
        if n > self.max_length {
            return Err(EvalError::syntaxe(format!(
                "Expression too long ({n} characters, maximum {})",
                self.max_length
            )));
        }

        let normalise = normalize(self.registre, s);
        validate_identifiers(self.registre, &normalise)?;
        Ok(normalise)
    }

    fn compiler(&self, normalise: &str) -> Result<Vec<Instr>, EvalError> {
        let jetons = tokenize(normalise)?;
        to_rpn(&jetons, self.registre, normalise.chars().count())
    }

    pub fn evaluate(&self, expression: &str, precision: u32) -> EvaluationResult {
        let normalise = self.preparer(expression)?;
        let programme = self.compiler(&normalise)?;
        let v = executer(&programme)?;

        let p = precision.min(PRECISION_MAX) as usize;
        let x = v.vers_f64(p);

        match classer_non_fini(x) {
            Some(e) => Err(e),
            None => Ok(x),
        }
    }

    pub fn evaluate_request(&self, req: &EvaluationRequest) -> EvaluationResult {
        self.evaluate(&req.expression, req.precision)
    }

    /// Forme normalisée (casse canonique) d'une expression valide.
    pub fn normaliser(&self, expression: &str) -> Result<String, EvalError> {
        self.preparer(expression)
    }

    pub fn demarche(&self, expression: &str) -> Result<Demarche, EvalError> {
        let normalise = self.preparer(expression)?;
        let jetons = tokenize(&normalise)?;
        let rpn = to_rpn(&jetons, self.registre, normalise.chars().count())?;

        Ok(Demarche {
            jetons: format_tokens(&jetons),
            rpn: format_rpn(&rpn),
            normalise,
        })
    }
}

/// API publique : évalue `expression` et arrondit à `precision` décimales.
pub fn evaluate(expression: &str, precision: u32) -> EvaluationResult {
    Evaluator::default().evaluate(expression, precision)
}

/// Exécute un programme RPN sur une pile de nombres étendus.
fn executer(programme: &[Instr]) -> Result<Nombre, EvalError> {
    let mut pile: Vec<Nombre> = Vec::with_capacity(programme.len());

    for instr in programme {
        let v = match instr {
            Instr::Num(v) => Nombre::Fini(v.clone()),
            Instr::Const(nom) => constante(nom)?,
            Instr::Neg => -depiler(&mut pile)?,
            Instr::Binaire(op) => {
                let b = depiler(&mut pile)?;
                let a = depiler(&mut pile)?;
                match op {
                    Operateur::Plus => n::add(&a, &b),
                    Operateur::Moins => n::sub(&a, &b),
                    Operateur::Fois => n::mul(&a, &b),
                    Operateur::Divise => n::div(&a, &b),
                    Operateur::Puissance => n::pow(&a, &b)?,
                }
            }
            Instr::Appel { nom, nb_args } => {
                if pile.len() < *nb_args {
                    return Err(programme_invalide());
                }
                let args = pile.split_off(pile.len() - nb_args);
                appliquer(nom, &args)?
            }
        };
        pile.push(v);
    }

    match (pile.pop(), pile.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err(programme_invalide()),
    }
}

fn depiler(pile: &mut Vec<Nombre>) -> Result<Nombre, EvalError> {
    pile.pop().ok_or_else(programme_invalide)
}

// to_rpn garantit une pile cohérente ; filet sans panique.
fn programme_invalide() -> EvalError {
    EvalError::syntaxe("Invalid expression")
}
