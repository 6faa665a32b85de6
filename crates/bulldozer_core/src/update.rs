use crate::{aggregate, Effect, HarvestState, Msg, RunStage, StageStatus};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not belong to the current stage are ignored.
pub fn update(mut state: HarvestState, msg: Msg) -> (HarvestState, Vec<Effect>) {
    let effects = match (state.stage, msg) {
        (RunStage::Start, Msg::Start) => {
            state.stage = RunStage::Authenticating;
            vec![Effect::Authenticate]
        }
        (RunStage::Authenticating, Msg::Authenticated(token)) => {
            state.statuses.auth = StageStatus::Succeeded;
            state.stage = RunStage::Harvesting;
            state.token = Some(token.clone());
            vec![Effect::FetchPage {
                token,
                start_time: None,
            }]
        }
        (RunStage::Authenticating, Msg::AuthFailed(reason)) => {
            state.statuses.auth = StageStatus::Failed(reason);
            state.stage = RunStage::Aborted;
            Vec::new()
        }
        (RunStage::Harvesting, Msg::PageFetched(page)) => {
            state.pages_fetched += 1;
            state.records_ingested += aggregate(&page.records, &mut state.table) as u64;
            state.statuses.fetch = StageStatus::Succeeded;

            // A cursor that was already requested would fetch the same page again.
            let next = page
                .cursor
                .filter(|cursor| state.last_cursor.as_ref() != Some(cursor));
            match (next, state.token.clone()) {
                (Some(cursor), Some(token)) => {
                    state.last_cursor = Some(cursor.clone());
                    vec![Effect::FetchPage {
                        token,
                        start_time: Some(cursor),
                    }]
                }
                _ => begin_writing(&mut state),
            }
        }
        (RunStage::Harvesting, Msg::PageFailed(reason)) => {
            state.statuses.fetch = StageStatus::Failed(reason);
            if state.pages_fetched == 0 {
                state.stage = RunStage::Aborted;
                Vec::new()
            } else {
                // Keep what earlier pages produced.
                begin_writing(&mut state)
            }
        }
        (RunStage::Writing, Msg::ReportWritten(path)) => {
            state.statuses.write = StageStatus::Succeeded;
            state.report_path = Some(path.clone());
            if state.options.notify {
                state.stage = RunStage::Notifying;
                vec![Effect::Notify { attachment: path }]
            } else {
                begin_cleaning(&mut state)
            }
        }
        (RunStage::Writing, Msg::ReportFailed(reason)) => {
            state.statuses.write = StageStatus::Failed(reason);
            // Without a report on disk there is nothing to send and nothing
            // may be deleted.
            if state.options.notify {
                state.statuses.notify = StageStatus::Skipped;
            }
            if state.options.clean {
                state.statuses.clean = StageStatus::Skipped;
            }
            state.stage = RunStage::Done;
            Vec::new()
        }
        (RunStage::Notifying, Msg::NotifyFinished(result)) => {
            state.statuses.notify = to_status(result);
            begin_cleaning(&mut state)
        }
        (RunStage::Cleaning, Msg::CleanFinished(result)) => {
            state.statuses.clean = to_status(result);
            state.stage = RunStage::Done;
            Vec::new()
        }
        _ => Vec::new(),
    };

    (state, effects)
}

fn begin_writing(state: &mut HarvestState) -> Vec<Effect> {
    state.stage = RunStage::Writing;
    vec![Effect::WriteReport]
}

fn begin_cleaning(state: &mut HarvestState) -> Vec<Effect> {
    match (state.options.clean, state.token.clone()) {
        (true, Some(token)) => {
            state.stage = RunStage::Cleaning;
            vec![Effect::Clean { token }]
        }
        _ => {
            state.stage = RunStage::Done;
            Vec::new()
        }
    }
}

fn to_status(result: Result<(), String>) -> StageStatus {
    match result {
        Ok(()) => StageStatus::Succeeded,
        Err(reason) => StageStatus::Failed(reason),
    }
}
