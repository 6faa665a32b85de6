use std::fmt;

use serde::{Deserialize, Deserializer};

/// Short-lived token issued by the admin API. Never refreshed within a run.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of debug logs.
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Continuation marker returned by the log query endpoint (`endTime`).
///
/// The server sends a millisecond timestamp; it is kept as the exact text
/// that goes back out in the next `startTime` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Scalar::deserialize(deserializer).map(|scalar| Cursor(scalar.into_string()))
    }
}

/// One log entry as the server reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLogRecord {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub severity: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub method_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub time: String,
}

/// Success payload of the log query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQueryPayload {
    #[serde(default)]
    pub log_messages: Vec<RawLogRecord>,
    /// Absent or `null` means no more pages.
    #[serde(default)]
    pub has_more: Option<bool>,
    #[serde(default)]
    pub end_time: Option<Cursor>,
}

impl LogQueryPayload {
    /// A cursor is only handed out when the server says more data exists.
    pub fn into_page(self) -> LogPage {
        let cursor = if self.has_more.unwrap_or(false) {
            self.end_time
        } else {
            None
        };
        LogPage {
            records: self.log_messages,
            cursor,
        }
    }
}

/// One successfully fetched page and the cursor for the next one, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogPage {
    pub records: Vec<RawLogRecord>,
    pub cursor: Option<Cursor>,
}

/// JSON scalars the server uses interchangeably for identifiers and times.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(value) => value.to_string(),
            Scalar::Float(value) => value.to_string(),
            Scalar::Bool(value) => value.to_string(),
        }
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .unwrap_or_default())
}
