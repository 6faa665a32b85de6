use std::collections::VecDeque;
use std::path::PathBuf;

use bulldozer_core::{update, Effect, HarvestState, Msg, RunOptions, RunResult};
use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{
    authenticate, clean, fetch_page, write_report, AuthError, Credentials, Endpoints, FailureKind,
    FormTransport, Notifier, QueryOptions, RemoteError, DEFAULT_TOKEN_EXPIRATION_MINUTES,
};

const EMAIL_BODY: &str = "Reading logs will not kill you but why take a chance?";

/// Everything one `ship` run needs to know.
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    /// Short machine key; names the report and the email subject.
    pub machine: String,
    pub credentials: Credentials,
    pub output_path: PathBuf,
    pub options: RunOptions,
}

/// Runs harvests against one transport, strictly one call at a time.
pub struct Harvester {
    transport: Box<dyn FormTransport>,
    notifier: Box<dyn Notifier>,
    query: QueryOptions,
    token_expiration_minutes: u32,
}

impl Harvester {
    pub fn new(transport: Box<dyn FormTransport>, notifier: Box<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            query: QueryOptions::default(),
            token_expiration_minutes: DEFAULT_TOKEN_EXPIRATION_MINUTES,
        }
    }

    pub fn with_query_options(mut self, query: QueryOptions) -> Self {
        self.query = query;
        self
    }

    pub fn with_token_expiration(mut self, minutes: u32) -> Self {
        self.token_expiration_minutes = minutes;
        self
    }

    /// Authenticate, page through the logs, write the report, then notify
    /// and clean if requested.
    pub async fn ship(&self, request: &HarvestRequest) -> RunResult {
        let endpoints = match Endpoints::for_base(&request.credentials.base_url) {
            Ok(endpoints) => endpoints,
            Err(err) => {
                engine_warn!("Invalid server url for {}: {}", request.machine, err);
                let (state, _) = update(HarvestState::new(request.options), Msg::Start);
                let (state, _) = update(state, Msg::AuthFailed(err.to_string()));
                return state.into_result();
            }
        };

        let mut state = HarvestState::new(request.options);
        let mut inbox = VecDeque::from([Msg::Start]);
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                let reply = self.execute(effect, &state, &endpoints, request).await;
                inbox.push_back(reply);
            }
        }

        let result = state.into_result();
        engine_info!(
            "{}: {:?} after {} page(s), {} record(s), {} distinct",
            request.machine,
            result.stage,
            result.pages_fetched,
            result.records_ingested,
            result.table.len()
        );
        result
    }

    async fn execute(
        &self,
        effect: Effect,
        state: &HarvestState,
        endpoints: &Endpoints,
        request: &HarvestRequest,
    ) -> Msg {
        match effect {
            Effect::Authenticate => {
                match authenticate(
                    self.transport.as_ref(),
                    &endpoints.generate_token,
                    &request.credentials,
                    self.token_expiration_minutes,
                )
                .await
                {
                    Ok(token) => Msg::Authenticated(token),
                    Err(err) => {
                        if matches!(err, AuthError::Unreachable(_)) {
                            engine_warn!("Unable to reach the server. Is it available? {}", err);
                        } else {
                            engine_warn!("{}", err);
                        }
                        engine_warn!(
                            "Could not generate a token with the username and password provided."
                        );
                        Msg::AuthFailed(err.to_string())
                    }
                }
            }
            Effect::FetchPage { token, start_time } => {
                if start_time.is_some() {
                    engine_debug!("fetching {} more log messages", self.query.page_size);
                } else {
                    engine_debug!("fetching {} log messages", self.query.page_size);
                }
                match fetch_page(
                    self.transport.as_ref(),
                    &endpoints.query_logs,
                    &token,
                    &self.query,
                    start_time.as_ref(),
                )
                .await
                {
                    Ok(page) => Msg::PageFetched(page),
                    Err(err) => {
                        log_remote_failure("Error returned by operation.", &err);
                        if state.pages_fetched() == 0 {
                            engine_debug!("Could not get logs. Exiting");
                        }
                        Msg::PageFailed(err.to_string())
                    }
                }
            }
            Effect::WriteReport => match write_report(&request.output_path, state.table()) {
                Ok(path) => Msg::ReportWritten(path),
                Err(err) => {
                    engine_warn!(
                        "Could not write {}: {}",
                        request.output_path.display(),
                        err
                    );
                    Msg::ReportFailed(err.to_string())
                }
            },
            Effect::Notify { attachment } => {
                engine_debug!("sending email");
                let subject = format!("{} ArcGIS Server logs", request.machine);
                match self
                    .notifier
                    .send_email(&subject, EMAIL_BODY, &attachment)
                    .await
                {
                    Ok(()) => Msg::NotifyFinished(Ok(())),
                    Err(err) => {
                        engine_warn!("Error sending email: {}", err);
                        Msg::NotifyFinished(Err(err.to_string()))
                    }
                }
            }
            Effect::Clean { token } => {
                match clean(self.transport.as_ref(), &endpoints.clean_logs, &token).await {
                    Ok(()) => {
                        engine_debug!("logs cleared");
                        Msg::CleanFinished(Ok(()))
                    }
                    Err(err) => {
                        log_remote_failure("Error cleaning logs.", &err.0);
                        Msg::CleanFinished(Err(err.to_string()))
                    }
                }
            }
        }
    }
}

fn log_remote_failure(context: &str, err: &RemoteError) {
    match err.kind {
        FailureKind::TokenExpired => {
            engine_warn!("{} Token expired; start a new run to re-authenticate.", context)
        }
        FailureKind::ServerReported => engine_warn!("{} {}", context, err.message),
        _ if err.is_transport() => {
            engine_warn!("Unable to reach the server. Is it available? {}", err)
        }
        _ => engine_warn!("{} {}", context, err),
    }
}
