//! bulldozer: writes ArcGIS Server logs to a CSV with frequencies.
//!
//! ```bash
//! bulldozer ship <machine> [--clean] [--email]
//! ```
mod cli;
mod config;

use anyhow::{Context, Result};
use bulldozer_core::{RunOptions, RunResult, StageStatus};
use bulldozer_engine::{
    DisabledNotifier, FetchSettings, HarvestRequest, Harvester, Notifier, ReqwestTransport,
    SendGridNotifier,
};
use clap::Parser;
use engine_logging::{engine_debug, engine_info, engine_warn, LogDestination};
use log::LevelFilter;

use cli::{Cli, Command, ShipArgs};
use config::{load_config, AppConfig, ConfigError};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let destination = match &cli.log_file {
        Some(path) => LogDestination::TerminalAndFile(path.clone()),
        None => LogDestination::Terminal,
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    engine_logging::initialize(destination, level);

    let config = load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        Command::Ship(args) => ship(&config, &args),
    }
}

fn ship(config: &AppConfig, args: &ShipArgs) -> Result<()> {
    let machine = match config.machine(&args.machine) {
        Ok(machine) => machine,
        Err(err @ ConfigError::UnknownMachine(_)) => {
            engine_warn!("{}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let credentials = match machine.credentials(&args.machine) {
        Ok(credentials) => credentials,
        Err(err @ ConfigError::InvalidUrl { .. }) => {
            engine_warn!("{}", err);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let settings = FetchSettings {
        accept_invalid_certs: config.accept_invalid_certs,
        ..FetchSettings::default()
    };
    let transport = ReqwestTransport::new(settings.clone()).context("building http client")?;
    let notifier = build_notifier(config, &settings, args.email);
    let harvester = Harvester::new(Box::new(transport), notifier)
        .with_token_expiration(config.token_expiration_minutes);

    let request = HarvestRequest {
        machine: args.machine.clone(),
        credentials,
        output_path: args.output_dir.join(format!("{}.csv", args.machine)),
        options: RunOptions {
            notify: args.email,
            clean: args.clean,
        },
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;
    let result = runtime.block_on(harvester.ship(&request));
    log_outcome(&result);

    engine_debug!("done");
    Ok(())
}

fn build_notifier(config: &AppConfig, settings: &FetchSettings, wanted: bool) -> Box<dyn Notifier> {
    if !wanted {
        return Box::new(DisabledNotifier);
    }
    let Some(email) = config.email.clone() else {
        return Box::new(DisabledNotifier);
    };
    match SendGridNotifier::new(email, settings) {
        Ok(notifier) => Box::new(notifier),
        Err(err) => {
            engine_warn!("{}", err);
            Box::new(DisabledNotifier)
        }
    }
}

fn log_outcome(result: &RunResult) {
    if result.aborted() {
        engine_warn!("Harvest aborted; no report written.");
        return;
    }
    match (&result.statuses.write, &result.report_path) {
        (StageStatus::Succeeded, Some(path)) => engine_info!(
            "Wrote {} distinct entries from {} records to {}",
            result.table.len(),
            result.records_ingested,
            path.display()
        ),
        (status, _) => engine_warn!("Report not written: {:?}", status),
    }
}
