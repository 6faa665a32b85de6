use crate::{FrequencyTable, LogKey, RawLogRecord};

/// Folds one page of records into `table`. Returns how many were counted.
pub fn aggregate(records: &[RawLogRecord], table: &mut FrequencyTable) -> usize {
    for record in records {
        table.record(LogKey::from_record(record));
    }
    records.len()
}
