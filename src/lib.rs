//! libgate library root.
//! Exposes the CLI parser, the high-level run() function and internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod server;
pub mod telemetry;
pub mod ui;
pub mod utils;

use chrono::NaiveDateTime;
use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::{AppError, AppResult};

/// Library clock for this invocation: the hidden `--now` override, or the
/// configured offset applied to the system clock.
fn resolve_now(cli: &Cli, cfg: &Config) -> AppResult<(NaiveDateTime, Option<NaiveDateTime>)> {
    match &cli.now {
        Some(raw) => {
            let pinned = utils::time::parse_datetime(raw)
                .ok_or_else(|| AppError::InvalidDate(raw.clone()))?;
            Ok((pinned, Some(pinned)))
        }
        None => Ok((cfg.now()?, None)),
    }
}

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let (now, pinned) = resolve_now(cli, cfg)?;

    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Check { .. } => cli::commands::check::handle(&cli.command, cfg, now),
        Commands::Inside { .. } => cli::commands::inside::handle(&cli.command, cfg),
        Commands::Stats { .. } => cli::commands::stats::handle(&cli.command, cfg, now),
        Commands::Sweep { .. } => cli::commands::sweep::handle(&cli.command, cfg, now),
        Commands::Report { .. } => cli::commands::report::handle(&cli.command, cfg),
        Commands::Import { .. } => cli::commands::import::handle(&cli.command, cfg),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg, pinned),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once; --db overrides the configured database
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
