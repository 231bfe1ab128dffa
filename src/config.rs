//! Runtime configuration: where the catalogue snapshots and the static
//! frontend live.
//!
//! Resolution order:
//! 1) TOML file at `$CATALOGUE_CONFIG_PATH`, else `config/catalogue.toml`;
//!    a missing or broken file falls back to built-in defaults.
//! 2) `CATALOGUE_DATA_DIR` / `CATALOGUE_PUBLIC_DIR` override the loaded
//!    values on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::origin::Origin;

pub const DEFAULT_CONFIG_PATH: &str = "config/catalogue.toml";

pub const ENV_CONFIG_PATH: &str = "CATALOGUE_CONFIG_PATH";
pub const ENV_DATA_DIR: &str = "CATALOGUE_DATA_DIR";
pub const ENV_PUBLIC_DIR: &str = "CATALOGUE_PUBLIC_DIR";

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueConfig {
    /// Directory holding the line-delimited JSON snapshots.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory served as the static frontend.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
        }
    }
}

impl CatalogueConfig {
    /// Load configuration with env overrides applied.
    pub fn load() -> Self {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::load_from(&path);

        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var(ENV_PUBLIC_DIR) {
            config.public_dir = PathBuf::from(dir);
        }
        config
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "broken catalogue config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Programme snapshot for one origin, e.g. `data/programmes_uk.jsonl`.
    pub fn programme_source(&self, origin: Origin) -> PathBuf {
        self.data_dir
            .join(format!("programmes_{}.jsonl", origin.as_str()))
    }

    /// Main scholarship snapshot.
    pub fn scholarship_source(&self) -> PathBuf {
        self.data_dir.join("scholarships.jsonl")
    }

    /// Per-scholarship application-steps snapshot.
    pub fn scholarship_steps_source(&self) -> PathBuf {
        self.data_dir.join("scholarship_steps.jsonl")
    }
}
