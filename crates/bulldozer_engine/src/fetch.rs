use bulldozer_core::{AccessToken, Cursor, LogPage, LogQueryPayload};
use url::Url;

use crate::{decode_envelope, FormTransport, RemoteError};

/// Fixed parameters sent with every log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// JSON-encoded filter object.
    pub filter: String,
    pub page_size: u32,
    /// Lowest severity returned.
    pub level: String,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            filter: "{}".to_string(),
            page_size: 10_000,
            level: "WARNING".to_string(),
        }
    }
}

impl QueryOptions {
    fn form_fields(
        &self,
        token: &AccessToken,
        start_time: Option<&Cursor>,
    ) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("filter", self.filter.clone()),
            ("token", token.as_str().to_string()),
            ("pageSize", self.page_size.to_string()),
            ("level", self.level.clone()),
            ("f", "json".to_string()),
        ];
        if let Some(cursor) = start_time {
            fields.push(("startTime", cursor.as_str().to_string()));
        }
        fields
    }
}

/// Issues one log query. `start_time` is the cursor of the previous page.
///
/// The returned page only carries a cursor when the server reported
/// `hasMore: true`.
pub async fn fetch_page(
    transport: &dyn FormTransport,
    url: &Url,
    token: &AccessToken,
    options: &QueryOptions,
    start_time: Option<&Cursor>,
) -> Result<LogPage, RemoteError> {
    let fields = options.form_fields(token, start_time);
    let body = transport.post_form(url, &fields).await?;
    let payload: LogQueryPayload = decode_envelope(&body)?;
    Ok(payload.into_page())
}
