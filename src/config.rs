//! Signatory configuration, injected at construction.
use crate::proof_config::ProofConfig;
use crate::SIGNATORY_CONFIG;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use thiserror::Error;

/// An error relating to configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file environment variable not set: {0}")]
    EnvVar(env::VarError),
    #[error("Error reading config file: {0}")]
    FileRead(std::io::Error),
    #[error("Error parsing config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration variables for the signatory: the default proof config
/// applied to issuance requests that carry no overrides.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct SignatoryConfig {
    pub proof_config: ProofConfig,
}

/// Wrapper struct for parsing the `signatory` table.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
struct Config {
    /// Signatory configuration data.
    signatory: SignatoryConfig,
}

impl SignatoryConfig {
    /// Parses a signatory configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<Config>(toml_str)?.signatory)
    }

    /// Reads a signatory configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&fs::read_to_string(path).map_err(ConfigError::FileRead)?)
    }

    /// Reads a signatory configuration from the file named by the
    /// `SIGNATORY_CONFIG` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = env::var(SIGNATORY_CONFIG).map_err(ConfigError::EnvVar)?;
        Self::from_file(Path::new(&path))
    }
}
