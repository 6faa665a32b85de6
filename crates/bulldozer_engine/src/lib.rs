//! Bulldozer engine: admin API clients, report output and the harvest driver.
mod auth;
mod clean;
mod endpoints;
mod envelope;
mod fetch;
mod harvest;
mod notify;
mod persist;
mod report;
mod transport;
mod types;

pub use auth::{authenticate, AuthError, DEFAULT_TOKEN_EXPIRATION_MINUTES};
pub use clean::{clean, CleanError};
pub use endpoints::{Credentials, Endpoints};
pub use envelope::{decode_envelope, Envelope, ServerError, TOKEN_EXPIRED_MESSAGE};
pub use fetch::{fetch_page, QueryOptions};
pub use harvest::{HarvestRequest, Harvester};
pub use notify::{
    DisabledNotifier, EmailSettings, Notifier, NotifyError, SendGridNotifier, SENDGRID_ENDPOINT,
};
pub use persist::{ensure_output_dir, write_atomically, PersistError};
pub use report::{write_report, ReportError, REPORT_HEADER};
pub use transport::{FetchSettings, FormTransport, ReqwestTransport};
pub use types::{FailureKind, RemoteError};
