// src/noyau/registre.rs
//
// Liste blanche (fonctions + constantes)
// --------------------------------------
// - Fonctions : forme canonique en minuscules (sin, cos, ...)
// - Constantes : forme canonique en MAJUSCULES (PI, E, ...)
// - Construite une seule fois, lecture seule ensuite (aucune API de mutation).
// - Recherche O(1) : validation appelée à chaque frappe côté appelant.

use std::collections::HashSet;
use std::sync::OnceLock;

/// Fonctions autorisées (forme canonique).
pub const FONCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "log", "log10", "log2",
    "ln", "sqrt", "abs", "ceil", "floor", "round", "trunc", "sign", "min", "max", "pow", "exp",
];

/// Constantes autorisées (forme canonique).
pub const CONSTANTES: &[&str] = &[
    "PI", "E", "LN2", "LN10", "LOG2E", "LOG10E", "SQRT1_2", "SQRT2",
];

#[derive(Clone, Debug)]
pub struct Registre {
    fonctions: HashSet<&'static str>,
    constantes: HashSet<&'static str>,
}

static GLOBAL: OnceLock<Registre> = OnceLock::new();

impl Default for Registre {
    fn default() -> Self {
        Self::new()
    }
}

impl Registre {
    pub fn new() -> Self {
        Self {
            fonctions: FONCTIONS.iter().copied().collect(),
            constantes: CONSTANTES.iter().copied().collect(),
        }
    }

    /// Instance unique du processus (initialisée au premier accès).
    pub fn global() -> &'static Registre {
        GLOBAL.get_or_init(Registre::new)
    }

    /// Nom de fonction canonique si `mot` (toute casse) est autorisé.
    pub fn fonction(&self, mot: &str) -> Option<&'static str> {
        self.fonctions.get(mot.to_ascii_lowercase().as_str()).copied()
    }

    /// Nom de constante canonique si `mot` (toute casse) est autorisé.
    pub fn constante(&self, mot: &str) -> Option<&'static str> {
        self.constantes.get(mot.to_ascii_uppercase().as_str()).copied()
    }

    /// Appartenance stricte (sensible à la casse) : sert après normalisation.
    pub fn contient(&self, mot: &str) -> bool {
        self.fonctions.contains(mot) || self.constantes.contains(mot)
    }

    /// Fonction déjà en forme canonique.
    pub fn fonction_exacte(&self, mot: &str) -> Option<&'static str> {
        self.fonctions.get(mot).copied()
    }

    pub fn constante_exacte(&self, mot: &str) -> Option<&'static str> {
        self.constantes.get(mot).copied()
    }
}
