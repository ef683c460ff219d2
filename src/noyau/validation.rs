// src/noyau/validation.rs
//
// Validation des identifiants (après normalisation)
// ------------------------------------------------
// Fermé par défaut : le premier identifiant hors liste blanche arrête tout.
// Ordre de parcours = ordre de première apparition (reproductible).

use std::collections::HashSet;

use super::erreur::EvalError;
use super::normalise::identifiants;
use super::registre::Registre;

pub fn validate_identifiers(registre: &Registre, normalise: &str) -> Result<(), EvalError> {
    let mut vus: HashSet<&str> = HashSet::new();

    for (_, mot) in identifiants(normalise) {
        if !vus.insert(mot) {
            continue;
        }
        if !registre.contient(mot) {
            return Err(EvalError::UnknownIdentifier(mot.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::normalise::normalize;

    fn valider(s: &str) -> Result<(), EvalError> {
        let r = Registre::global();
        validate_identifiers(r, &normalize(r, s))
    }

    #[test]
    fn autorises() {
        assert!(valider("sin(PI/2) + max(1, E)").is_ok());
        assert!(valider("SIN(pi)").is_ok());
        assert!(valider("1 + 2").is_ok());
    }

    #[test]
    fn premier_inconnu() {
        assert_eq!(
            valider("cos.constructor(\"return process\")()"),
            Err(EvalError::UnknownIdentifier("constructor".into()))
        );
        assert_eq!(
            valider("Object.keys"),
            Err(EvalError::UnknownIdentifier("Object".into()))
        );
    }

    #[test]
    fn notation_exposant_refusee() {
        assert_eq!(valider("1e5"), Err(EvalError::UnknownIdentifier("e5".into())));
    }

    #[test]
    fn sans_normalisation_la_casse_compte() {
        let r = Registre::global();
        assert_eq!(
            validate_identifiers(r, "SIN(1)"),
            Err(EvalError::UnknownIdentifier("SIN".into()))
        );
    }
}
