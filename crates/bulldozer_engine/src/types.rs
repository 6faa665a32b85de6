use std::fmt;

/// Failure of one admin API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: FailureKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Host unreachable, timeout or non-2xx status.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            FailureKind::InvalidUrl
                | FailureKind::HttpStatus(_)
                | FailureKind::Timeout
                | FailureKind::Network
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body was not the expected JSON.
    Decode,
    /// Envelope carried `"status": "error"`.
    ServerReported,
    /// Server-reported error whose messages include `Token Expired.`.
    TokenExpired,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::ServerReported => write!(f, "server error"),
            FailureKind::TokenExpired => write!(f, "token expired"),
        }
    }
}
