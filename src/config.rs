//! # Application Configuration
//!
//! All settings live in a single `config.toml` under the platform config
//! directory (`~/.config/virtualpad/config.toml` on Linux):
//!
//! ```toml
//! [options]
//! connection_code = "0000"
//! text = "Player 1"
//!
//! [surface]
//! adjusting = false
//!
//! [surface.columns]
//! left = 0.4
//! center = 0.2
//! right = 0.4
//!
//! [transport]
//! enabled = false
//! url = "localhost:1883"
//! # ...
//!
//! [layout.left.divider]
//! type = "vertical"
//! initial_position = 50.0
//! # ...
//! ```
//!
//! A missing file is replaced by the built-in defaults before loading. A file
//! that exists but does not parse or validate is reported as an error; it is
//! never overwritten.

use crate::layout::{ColumnShares, LayoutConfig, LayoutError};
use crate::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_DIR: &str = "virtualpad";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Identity of this gamepad towards the receiving side.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GamepadOptions {
    pub connection_code: String,
    /// Display text shown in the top bar
    pub text: String,
}

impl Default for GamepadOptions {
    fn default() -> Self {
        Self {
            connection_code: "0000".to_string(),
            text: String::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Start in adjust mode with divider handles visible
    pub adjusting: bool,
    pub columns: ColumnShares,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub options: GamepadOptions,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.layout.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        let io_error = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(path, content).await.map_err(io_error)?;
        debug!("Configuration written to {}", path.display());
        Ok(())
    }

    /// Loads `path`, writing the default configuration first when the file
    /// does not exist yet.
    pub async fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if !exists {
            info!(
                "No configuration at {}, writing defaults",
                path.display()
            );
            AppConfig::default().save(path).await?;
        }
        Self::load(path).await
    }
}

/// Location of `config.toml`, falling back to `~/.config` and finally the
/// working directory when the platform reports no config dir.
pub fn config_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
    path.push(CONFIG_DIR);
    path.push(CONFIG_FILE);
    path
}
