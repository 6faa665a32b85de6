use std::path::PathBuf;

use crate::{AccessToken, Cursor};

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Authenticate,
    FetchPage {
        token: AccessToken,
        start_time: Option<Cursor>,
    },
    WriteReport,
    Notify { attachment: PathBuf },
    Clean { token: AccessToken },
}
