use std::path::PathBuf;

use crate::{AccessToken, Cursor, FrequencyTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStage {
    #[default]
    Start,
    Authenticating,
    Harvesting,
    Writing,
    Notifying,
    Cleaning,
    Done,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StageStatus {
    #[default]
    NotRun,
    Succeeded,
    Failed(String),
    /// Requested, but an earlier stage made it pointless.
    Skipped,
}

impl StageStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageStatus::Failed(_))
    }
}

/// Outcome of every sub-stage of a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StageReport {
    pub auth: StageStatus,
    pub fetch: StageStatus,
    pub write: StageStatus,
    pub notify: StageStatus,
    pub clean: StageStatus,
}

/// Optional trailing stages requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub notify: bool,
    pub clean: bool,
}

/// State of one harvest run. Owns the run's frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HarvestState {
    pub(crate) stage: RunStage,
    pub(crate) options: RunOptions,
    pub(crate) table: FrequencyTable,
    pub(crate) token: Option<AccessToken>,
    pub(crate) last_cursor: Option<Cursor>,
    pub(crate) pages_fetched: usize,
    pub(crate) records_ingested: u64,
    pub(crate) statuses: StageReport,
    pub(crate) report_path: Option<PathBuf>,
}

impl HarvestState {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    pub fn table(&self) -> &FrequencyTable {
        &self.table
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn records_ingested(&self) -> u64 {
        self.records_ingested
    }

    pub fn statuses(&self) -> &StageReport {
        &self.statuses
    }

    pub fn report_path(&self) -> Option<&PathBuf> {
        self.report_path.as_ref()
    }

    pub fn into_result(self) -> RunResult {
        RunResult {
            stage: self.stage,
            statuses: self.statuses,
            pages_fetched: self.pages_fetched,
            records_ingested: self.records_ingested,
            report_path: self.report_path,
            table: self.table,
        }
    }
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub stage: RunStage,
    pub statuses: StageReport,
    pub pages_fetched: usize,
    pub records_ingested: u64,
    pub report_path: Option<PathBuf>,
    pub table: FrequencyTable,
}

impl RunResult {
    pub fn aborted(&self) -> bool {
        self.stage == RunStage::Aborted
    }
}
