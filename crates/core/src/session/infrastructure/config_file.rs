use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::session::domain::aggregator_config::{AggregatorConfig, ConfigError};
use crate::shared::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ConfigError),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Platform config location, e.g. `~/.config/EmotionSession/aggregator.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigFileError> {
    dirs::config_dir()
        .map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigFileError::NoConfigDir)
}

/// Reads and validates a JSON config file.
pub fn load(path: &Path) -> Result<AggregatorConfig, ConfigFileError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AggregatorConfig =
        serde_json::from_str(&json).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Loads `explicit` if given; otherwise the platform config file when it
/// exists; otherwise defaults.
///
/// A missing explicit file is an error. A missing default file is not.
pub fn load_or_default(explicit: Option<&Path>) -> Result<AggregatorConfig, ConfigFileError> {
    if let Some(path) = explicit {
        return load(path);
    }
    match default_config_path() {
        Ok(path) if path.exists() => {
            log::debug!("Loading config from {}", path.display());
            load(&path)
        }
        _ => Ok(AggregatorConfig::default()),
    }
}

pub fn save(config: &AggregatorConfig, path: &Path) -> Result<(), ConfigFileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigFileError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(config).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| ConfigFileError::Write {
        path: path.to_path_buf(),
        source,
    })
}
