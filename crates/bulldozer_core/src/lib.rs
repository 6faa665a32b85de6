//! Bulldozer core: log record model, aggregation and the pure harvest state machine.
mod aggregate;
mod effect;
mod key;
mod msg;
mod record;
mod state;
mod table;
mod update;

pub use aggregate::aggregate;
pub use effect::Effect;
pub use key::{clean_message, LogKey};
pub use msg::Msg;
pub use record::{AccessToken, Cursor, LogPage, LogQueryPayload, RawLogRecord};
pub use state::{HarvestState, RunOptions, RunResult, RunStage, StageReport, StageStatus};
pub use table::FrequencyTable;
pub use update::update;
