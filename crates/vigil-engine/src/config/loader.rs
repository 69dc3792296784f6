use super::VigilConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from, in order:
    /// 1. `explicit`, when given (must exist)
    /// 2. ./vigil.yaml
    /// 3. ~/.vigil/config.yaml
    /// 4. Default configuration
    pub async fn load(explicit: Option<&Path>) -> Result<VigilConfig, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }
        Self::load_default().await
    }

    pub async fn load_default() -> Result<VigilConfig, ConfigError> {
        let local_config = PathBuf::from("./vigil.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".vigil").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        debug!("No config file found, using defaults");
        Ok(VigilConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<VigilConfig, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: VigilConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::validate(&config)?;
        Ok(config)
    }

    pub fn validate(config: &VigilConfig) -> Result<(), ConfigError> {
        if config.waits.default_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "waits.default_timeout_ms must be positive".into(),
            ));
        }
        if config.waits.optional_timeout_ms > config.waits.default_timeout_ms {
            return Err(ConfigError::Invalid(
                "waits.optional_timeout_ms must not exceed waits.default_timeout_ms".into(),
            ));
        }
        if config.actions.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "actions.max_attempts must be at least 1".into(),
            ));
        }
        if config.verification.price_tolerance < 0.0 || config.verification.total_tolerance < 0.0 {
            return Err(ConfigError::Invalid("tolerances must not be negative".into()));
        }
        Ok(())
    }
}
