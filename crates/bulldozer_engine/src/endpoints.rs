use std::fmt;

use url::Url;

use crate::{FailureKind, RemoteError};

/// Login for one admin server. Immutable for the run.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub base_url: Url,
}

impl Credentials {
    /// `base_url` is treated as a directory, with or without a trailing `/`.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, RemoteError> {
        Ok(Self {
            username: username.into(),
            password: password.into(),
            base_url: parse_base(base_url)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

/// The three admin endpoints used by a harvest run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub generate_token: Url,
    pub query_logs: Url,
    pub clean_logs: Url,
}

impl Endpoints {
    pub fn for_base(base: &Url) -> Result<Self, RemoteError> {
        Ok(Self {
            generate_token: join(base, "admin/generateToken")?,
            query_logs: join(base, "admin/logs/query")?,
            clean_logs: join(base, "admin/logs/clean")?,
        })
    }
}

fn parse_base(raw: &str) -> Result<Url, RemoteError> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash).map_err(|err| RemoteError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn join(base: &Url, path: &str) -> Result<Url, RemoteError> {
    base.join(path)
        .map_err(|err| RemoteError::new(FailureKind::InvalidUrl, err.to_string()))
}
