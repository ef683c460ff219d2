// src/config.rs
//
// Configuration (TOML)
// --------------------
// Ordre : --config <chemin>, sinon <config_dir>/calculatrice/config.toml s'il existe,
// sinon valeurs par défaut. Les options de ligne de commande passent ensuite par-dessus.
//
// Exemple :
//   precision = 8
//   max_length = 2048
//   history_limit = 50

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::historique::LIMITE_DEFAUT;
use crate::noyau::eval::{DEFAULT_PRECISION, LONGUEUR_MAX, PRECISION_MAX};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lecture de {chemin} impossible: {source}")]
    Lecture {
        chemin: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration invalide ({chemin}): {source}")]
    Format {
        chemin: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{champ} hors bornes: {valeur} (attendu {min}..={max})")]
    HorsBornes {
        champ: &'static str,
        valeur: usize,
        min: usize,
        max: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Décimales du résultat.
    pub precision: u32,

    /// Longueur maximale d'une expression (caractères).
    pub max_length: usize,

    /// Taille de l'historique.
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            max_length: LONGUEUR_MAX,
            history_limit: LIMITE_DEFAUT,
        }
    }
}

impl Config {
    /// Emplacement par défaut : <config_dir>/calculatrice/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("calculatrice").join("config.toml"))
    }

    /// Chemin explicite (doit exister), sinon emplacement par défaut s'il existe.
    pub fn load(explicite: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(chemin) = explicite {
            return Self::load_from_file(chemin);
        }

        match Self::default_path() {
            Some(chemin) if chemin.exists() => Self::load_from_file(&chemin),
            _ => {
                tracing::debug!("aucun fichier de configuration, valeurs par défaut");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_file(chemin: &Path) -> Result<Self, ConfigError> {
        let contenu = std::fs::read_to_string(chemin).map_err(|source| ConfigError::Lecture {
            chemin: chemin.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&contenu).map_err(|e| match e {
            ConfigError::Format { source, .. } => ConfigError::Format {
                chemin: chemin.to_path_buf(),
                source,
            },
            autre => autre,
        })?;

        tracing::debug!(chemin = %chemin.display(), ?config, "configuration chargée");
        Ok(config)
    }

    pub fn from_toml(contenu: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contenu).map_err(|source| ConfigError::Format {
            chemin: PathBuf::new(),
            source,
        })?;
        config.valider()
    }

    fn valider(self) -> Result<Self, ConfigError> {
        borne("precision", self.precision as usize, 0, PRECISION_MAX as usize)?;
        borne("max_length", self.max_length, 1, usize::MAX)?;
        borne("history_limit", self.history_limit, 1, usize::MAX)?;
        Ok(self)
    }

    /// Les options de ligne de commande passent par-dessus le fichier.
    pub fn fusionner(mut self, precision: Option<u32>) -> Self {
        if let Some(p) = precision {
            self.precision = p.min(PRECISION_MAX);
        }
        self
    }
}

fn borne(champ: &'static str, valeur: usize, min: usize, max: usize) -> Result<(), ConfigError> {
    if (min..=max).contains(&valeur) {
        Ok(())
    } else {
        Err(ConfigError::HorsBornes {
            champ,
            valeur,
            min,
            max,
        })
    }
}
