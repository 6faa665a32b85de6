use std::path::PathBuf;
use std::sync::Once;

use bulldozer_core::{
    update, AccessToken, Cursor, Effect, HarvestState, LogPage, Msg, RawLogRecord, RunOptions,
    RunStage, StageStatus,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn token() -> AccessToken {
    AccessToken::new("tok")
}

fn page(messages: &[&str], cursor: Option<&str>) -> LogPage {
    LogPage {
        records: messages
            .iter()
            .map(|m| RawLogRecord {
                severity: "WARNING".to_string(),
                message: m.to_string(),
                ..RawLogRecord::default()
            })
            .collect(),
        cursor: cursor.map(Cursor::new),
    }
}

fn authenticated(options: RunOptions) -> HarvestState {
    let (state, effects) = update(HarvestState::new(options), Msg::Start);
    assert_eq!(effects, vec![Effect::Authenticate]);
    let (state, effects) = update(state, Msg::Authenticated(token()));
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            token: token(),
            start_time: None
        }]
    );
    state
}

#[test]
fn rejected_credentials_abort_without_writing() {
    init_logging();
    let (state, _) = update(HarvestState::new(RunOptions::default()), Msg::Start);
    let (state, effects) = update(state, Msg::AuthFailed("Invalid credentials".into()));

    assert!(effects.is_empty());
    assert_eq!(state.stage(), RunStage::Aborted);
    assert_eq!(
        state.statuses().auth,
        StageStatus::Failed("Invalid credentials".into())
    );
    assert_eq!(state.statuses().write, StageStatus::NotRun);
}

#[test]
fn failed_first_page_aborts() {
    init_logging();
    let state = authenticated(RunOptions::default());
    let (state, effects) = update(state, Msg::PageFailed("unreachable".into()));

    assert!(effects.is_empty());
    assert_eq!(state.stage(), RunStage::Aborted);
    assert_eq!(state.pages_fetched(), 0);
}

#[test]
fn empty_successful_first_page_still_writes() {
    init_logging();
    let state = authenticated(RunOptions::default());
    let (state, effects) = update(state, Msg::PageFetched(page(&[], None)));

    assert_eq!(effects, vec![Effect::WriteReport]);
    assert_eq!(state.stage(), RunStage::Writing);
    assert!(state.table().is_empty());
}

#[test]
fn cursor_drives_next_fetch_until_server_reports_no_more() {
    init_logging();
    let state = authenticated(RunOptions::default());

    let (state, effects) = update(state, Msg::PageFetched(page(&["a", "b"], Some("T1"))));
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            token: token(),
            start_time: Some(Cursor::new("T1"))
        }]
    );

    let (state, effects) = update(state, Msg::PageFetched(page(&["a"], None)));
    assert_eq!(effects, vec![Effect::WriteReport]);
    assert_eq!(state.pages_fetched(), 2);
    assert_eq!(state.records_ingested(), 3);
    assert_eq!(state.table().len(), 2);
}

#[test]
fn repeated_cursor_does_not_refetch_the_same_page() {
    init_logging();
    let state = authenticated(RunOptions::default());
    let (state, _) = update(state, Msg::PageFetched(page(&["a"], Some("T1"))));
    let (state, effects) = update(state, Msg::PageFetched(page(&["b"], Some("T1"))));

    assert_eq!(effects, vec![Effect::WriteReport]);
    assert_eq!(state.pages_fetched(), 2);
}

#[test]
fn mid_harvest_failure_writes_what_was_gathered() {
    init_logging();
    let state = authenticated(RunOptions::default());
    let (state, _) = update(state, Msg::PageFetched(page(&["a"], Some("T1"))));
    let (state, effects) = update(state, Msg::PageFailed("Token expired".into()));

    assert_eq!(effects, vec![Effect::WriteReport]);
    assert_eq!(state.stage(), RunStage::Writing);
    assert_eq!(state.table().total(), 1);
    assert!(state.statuses().fetch.is_failed());
}

#[test]
fn notify_then_clean_after_report() {
    init_logging();
    let options = RunOptions {
        notify: true,
        clean: true,
    };
    let state = authenticated(options);
    let (state, _) = update(state, Msg::PageFetched(page(&["a"], None)));
    let path = PathBuf::from("key.csv");

    let (state, effects) = update(state, Msg::ReportWritten(path.clone()));
    assert_eq!(
        effects,
        vec![Effect::Notify {
            attachment: path.clone()
        }]
    );

    let (state, effects) = update(state, Msg::NotifyFinished(Err("no email settings".into())));
    assert_eq!(effects, vec![Effect::Clean { token: token() }]);

    let (state, effects) = update(state, Msg::CleanFinished(Ok(())));
    assert!(effects.is_empty());

    let result = state.into_result();
    assert_eq!(result.stage, RunStage::Done);
    assert_eq!(result.report_path, Some(path));
    assert!(result.statuses.notify.is_failed());
    assert_eq!(result.statuses.clean, StageStatus::Succeeded);
}

#[test]
fn clean_without_notify_goes_straight_to_cleaning() {
    init_logging();
    let options = RunOptions {
        notify: false,
        clean: true,
    };
    let state = authenticated(options);
    let (state, _) = update(state, Msg::PageFetched(page(&[], None)));
    let (state, effects) = update(state, Msg::ReportWritten(PathBuf::from("key.csv")));

    assert_eq!(effects, vec![Effect::Clean { token: token() }]);
    assert_eq!(state.stage(), RunStage::Cleaning);
}

#[test]
fn failed_report_skips_notify_and_clean() {
    init_logging();
    let options = RunOptions {
        notify: true,
        clean: true,
    };
    let state = authenticated(options);
    let (state, _) = update(state, Msg::PageFetched(page(&["a"], None)));
    let (state, effects) = update(state, Msg::ReportFailed("read-only".into()));

    assert!(effects.is_empty());
    assert_eq!(state.stage(), RunStage::Done);
    assert_eq!(state.statuses().notify, StageStatus::Skipped);
    assert_eq!(state.statuses().clean, StageStatus::Skipped);
}

#[test]
fn out_of_stage_messages_are_ignored() {
    init_logging();
    let state = HarvestState::new(RunOptions::default());
    let (state, effects) = update(state, Msg::PageFetched(page(&["a"], None)));

    assert!(effects.is_empty());
    assert_eq!(state.stage(), RunStage::Start);
    assert!(state.table().is_empty());
}
