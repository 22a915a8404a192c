use crate::cli::commands::open_existing;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sweep::{StartupCleanup, SweepLogic};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    if let Commands::Sweep { startup } = cmd {
        let pool = open_existing(cfg)?;

        if *startup {
            match SweepLogic::startup_cleanup(&pool.conn, cfg, now)? {
                StartupCleanup::NotNeeded => info(format!(
                    "Before {}:59, nothing to clean up.",
                    cfg.cleanup_after_hour
                )),
                StartupCleanup::NothingOpen => info("No open logs found."),
                StartupCleanup::Closed(n) => {
                    success(format!("{n} open log(s) closed at 23:59:59."))
                }
            }
            return Ok(());
        }

        match SweepLogic::auto_exit(&pool.conn, now)? {
            0 => info("No open logs found."),
            n => success(format!("{n} user(s) exited automatically.")),
        }
    }
    Ok(())
}
