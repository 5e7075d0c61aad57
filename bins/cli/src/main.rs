//! Khata command line driver.
//!
//! Loads the snapshot document, runs one engine operation, and saves the
//! result. All ledger rules live in `khata-core`.

mod cli;
mod commands;
mod store;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use khata_core::{Engine, LedgerError};
use khata_shared::{AppConfig, AppError, LogConfig};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            let err = AppError::from(err);
            eprintln!("error: {err}");
            return exit_code(err.exit_code());
        }
    };
    init_tracing(&config.log);

    let path = cli
        .snapshot
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.storage.snapshot_path));
    debug!(path = %path.display(), "Using snapshot document");

    let engine = Engine::new(config.engine);
    match commands::handle(&engine, &path, &cli.command, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (code, status) = classify(&err);
            error!(code, "{err:#}");
            eprintln!("error: {err:#}");
            exit_code(status)
        }
    }
}

fn init_tracing(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Maps a failure onto the application error taxonomy: `(error_code, exit_code)`.
fn classify(err: &anyhow::Error) -> (&'static str, i32) {
    if let Some(ledger) = err.downcast_ref::<LedgerError>() {
        let app = AppError::from(ledger.clone());
        return (app.error_code(), app.exit_code());
    }
    if let Some(app) = err.downcast_ref::<AppError>() {
        return (app.error_code(), app.exit_code());
    }
    ("INTERNAL_ERROR", 70)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
