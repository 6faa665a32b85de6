use bulldozer_core::AccessToken;
use serde_json::Value;
use url::Url;

use crate::{decode_envelope, FormTransport, RemoteError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error cleaning logs. {0}")]
pub struct CleanError(#[from] pub RemoteError);

/// Asks the server to delete its logs.
pub async fn clean(
    transport: &dyn FormTransport,
    url: &Url,
    token: &AccessToken,
) -> Result<(), CleanError> {
    let fields = [
        ("token", token.as_str().to_string()),
        ("f", "json".to_string()),
    ];
    let body = transport.post_form(url, &fields).await?;
    decode_envelope::<Value>(&body)?;
    Ok(())
}
