//! Configuration loading and merging.
//!
//! One entry point assembles the effective configuration: the TOML file
//! (or built-in defaults when none is given), command-line overrides on
//! top, then a single validation of the merged result. An override can
//! therefore correct a value the file got wrong.

use std::fs;
use std::path::Path;

use crate::config::schema::FleetConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Command-line settings layered over the config file.
///
/// A `None` field keeps the file's (or default) value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub concurrency_limit: Option<usize>,
    pub probe_timeout_secs: Option<f64>,
    pub server_timeout_secs: Option<f64>,
    pub no_color: bool,
}

impl Overrides {
    fn apply(&self, config: &mut FleetConfig) {
        if let Some(limit) = self.concurrency_limit {
            config.scan.concurrency_limit = limit;
        }
        if let Some(secs) = self.probe_timeout_secs {
            config.scan.probe_timeout_secs = secs;
        }
        if let Some(secs) = self.server_timeout_secs {
            config.scan.server_timeout_secs = secs;
        }
        if self.no_color {
            config.output.color = false;
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Toml { path: String, source: toml::de::Error },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            ConfigError::Toml { path, source } => {
                write!(f, "invalid TOML in {}: {}", path, source)
            }
            ConfigError::Validation(errors) => {
                write!(f, "invalid configuration: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Build the effective configuration from `path` and `overrides`.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<FleetConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_file(path)?,
        None => FleetConfig::default(),
    };
    merge(config, overrides)
}

fn parse_file(path: &Path) -> Result<FleetConfig, ConfigError> {
    let shown = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: shown.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml { path: shown, source })
}

// Validation runs once, on the merged result.
fn merge(mut config: FleetConfig, overrides: &Overrides) -> Result<FleetConfig, ConfigError> {
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
