use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{FailureKind, RemoteError};

/// Message the admin API sends when the token has run out.
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token Expired.";

/// Response wrapper shared by every admin endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Success(T),
    Error(ServerError),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerError {
    pub messages: Vec<String>,
}

impl ServerError {
    pub fn is_token_expired(&self) -> bool {
        self.messages.iter().any(|m| m == TOKEN_EXPIRED_MESSAGE)
    }

    pub fn reason(&self) -> String {
        if self.is_token_expired() {
            "Token expired".to_string()
        } else {
            self.messages.join("; ")
        }
    }
}

impl From<ServerError> for RemoteError {
    fn from(error: ServerError) -> Self {
        let kind = if error.is_token_expired() {
            FailureKind::TokenExpired
        } else {
            FailureKind::ServerReported
        };
        RemoteError::new(kind, error.reason())
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn parse(body: &[u8]) -> Result<Self, RemoteError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))?;

        if value.get("status").and_then(Value::as_str) == Some("error") {
            let messages = value
                .get("messages")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(text) => text.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            return Ok(Envelope::Error(ServerError { messages }));
        }

        serde_json::from_value(value)
            .map(Envelope::Success)
            .map_err(|err| RemoteError::new(FailureKind::Decode, err.to_string()))
    }

    pub fn into_result(self) -> Result<T, RemoteError> {
        match self {
            Envelope::Success(payload) => Ok(payload),
            Envelope::Error(error) => Err(error.into()),
        }
    }
}

/// Parses `body` and turns a server-reported error into a [`RemoteError`].
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T, RemoteError> {
    Envelope::parse(body)?.into_result()
}
