//! `servers.ron`: known machines and optional email settings.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bulldozer_engine::{Credentials, EmailSettings, DEFAULT_TOKEN_EXPIRATION_MINUTES};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("Machine token `{0}` not found in the configuration. Did you add it?")]
    UnknownMachine(String),
    #[error("Machine `{machine}` has an invalid url: {reason}")]
    InvalidUrl { machine: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MachineConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl MachineConfig {
    pub fn credentials(&self, key: &str) -> Result<Credentials, ConfigError> {
        Credentials::new(&self.username, &self.password, &self.url).map_err(|err| {
            ConfigError::InvalidUrl {
                machine: key.to_string(),
                reason: err.message,
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub machines: BTreeMap<String, MachineConfig>,
    #[serde(default)]
    pub email: Option<EmailSettings>,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_token_expiration")]
    pub token_expiration_minutes: u32,
}

fn default_token_expiration() -> u32 {
    DEFAULT_TOKEN_EXPIRATION_MINUTES
}

impl AppConfig {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn machine(&self, key: &str) -> Result<&MachineConfig, ConfigError> {
        self.machines
            .get(key)
            .ok_or_else(|| ConfigError::UnknownMachine(key.to_string()))
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    AppConfig::parse(path, &content)
}
