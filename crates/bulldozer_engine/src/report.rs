use std::path::{Path, PathBuf};

use bulldozer_core::FrequencyTable;
use engine_logging::engine_debug;

use crate::persist::{write_atomically, PersistError};

pub const REPORT_HEADER: [&str; 6] = [
    "severity",
    "source",
    "code",
    "message",
    "method name",
    "frequency",
];

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Writes `table` to `path` as CSV, most frequent entries first.
///
/// Any existing file at `path` is replaced.
pub fn write_report(path: &Path, table: &FrequencyTable) -> Result<PathBuf, ReportError> {
    engine_debug!("writing to {}", path.display());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;
    for (key, frequency) in table.sorted_by_frequency() {
        let frequency = frequency.to_string();
        writer.write_record([
            key.severity.as_str(),
            key.source.as_str(),
            key.code.as_str(),
            key.message.as_str(),
            key.method_name.as_str(),
            frequency.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Persist(PersistError::Io(err.into_error())))?;

    write_atomically(path, &bytes)?;
    Ok(path.to_path_buf())
}
