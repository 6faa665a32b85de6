use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run.
    Start,
    /// Token endpoint issued a token.
    Authenticated(crate::AccessToken),
    /// No token could be obtained.
    AuthFailed(String),
    /// One query page decoded successfully.
    PageFetched(crate::LogPage),
    /// Query failed at the transport level or the server reported an error.
    PageFailed(String),
    /// Report file is on disk.
    ReportWritten(PathBuf),
    ReportFailed(String),
    NotifyFinished(Result<(), String>),
    CleanFinished(Result<(), String>),
}
