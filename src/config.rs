//! Configuration for parsing and formatting.
//!
//! All types implement [`serde::Deserialize`] with defaults for every field,
//! so a TOML file only needs the keys it wants to change:
//!
//! ```toml
//! [parse]
//! directive_prefixes = ["diagram"]
//!
//! [format]
//! indent = 2
//! ```

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {}", .0.display())]
    MissingFile(std::path::PathBuf),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub parse: ParseConfig,
    pub format: FormatConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Keywords that mark a `-- <prefix>: ...` comment as a relationship directive.
    pub directive_prefixes: Vec<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            directive_prefixes: vec!["diagram".to_string(), "mermaid".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Spaces used to indent top-level declarations.
    pub indent: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod load {
    use std::{fs, path::Path};

    use directories::ProjectDirs;
    use log::{debug, info};

    use super::{AppConfig, ConfigError};

    const LOCAL_CONFIG: &str = "sqlerd.toml";

    /// Find and load configuration.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. `sqlerd.toml` in the working directory
    /// 3. Platform-specific config directory
    /// 4. Default config if none found
    pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
        if let Some(path) = explicit_path {
            info!(path = path.display().to_string(); "Loading configuration from explicit path");
            return load_config_file(path);
        }

        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            info!(path = local.display().to_string(); "Loading configuration from local path");
            return load_config_file(local);
        }

        if let Some(dirs) = ProjectDirs::from("com", "sqlerd", "sqlerd") {
            let system = dirs.config_dir().join("config.toml");
            if system.exists() {
                info!(path = system.display().to_string(); "Loading configuration from system path");
                return load_config_file(&system);
            }
            debug!(path = system.display().to_string(); "System configuration file not found");
        }

        debug!("No configuration file found, using default configuration");
        Ok(AppConfig::default())
    }

    fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        AppConfig::from_toml(&content)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use load::load_config;
