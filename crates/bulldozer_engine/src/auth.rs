use bulldozer_core::AccessToken;
use serde::Deserialize;
use url::Url;

use crate::{decode_envelope, Credentials, FailureKind, FormTransport, RemoteError};

pub const DEFAULT_TOKEN_EXPIRATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Transport failure: host down, timeout or non-2xx status.
    #[error("unreachable: {0}")]
    Unreachable(String),
    /// The token endpoint answered with an error envelope.
    #[error("{0}")]
    Rejected(String),
    #[error("response did not contain a token")]
    MissingToken,
}

#[derive(Debug, Deserialize)]
struct TokenPayload {
    #[serde(default)]
    token: Option<String>,
}

/// Exchanges credentials for a token. No retry.
pub async fn authenticate(
    transport: &dyn FormTransport,
    url: &Url,
    credentials: &Credentials,
    expiration_minutes: u32,
) -> Result<AccessToken, AuthError> {
    let fields = [
        ("username", credentials.username.clone()),
        ("password", credentials.password.clone()),
        ("client", "requestip".to_string()),
        ("expiration", expiration_minutes.to_string()),
        ("f", "json".to_string()),
    ];

    let body = transport
        .post_form(url, &fields)
        .await
        .map_err(|err| AuthError::Unreachable(err.to_string()))?;

    let payload: TokenPayload = decode_envelope(&body).map_err(to_auth_error)?;
    match payload.token {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
        _ => Err(AuthError::MissingToken),
    }
}

fn to_auth_error(err: RemoteError) -> AuthError {
    match err.kind {
        FailureKind::ServerReported | FailureKind::TokenExpired => AuthError::Rejected(err.message),
        _ => AuthError::Rejected(err.to_string()),
    }
}
