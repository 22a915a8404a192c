use crate::cli::commands::open_existing;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attendance::{AttendanceLogic, CheckOutcome};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::{date, time};
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    if let Commands::Check { code, role, json } = cmd {
        let pool = open_existing(cfg)?;
        let outcome = AttendanceLogic::check(&pool.conn, cfg, code, role, now)?;

        if *json {
            let out = serde_json::to_string_pretty(&outcome)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{out}");
            return Ok(());
        }

        success(outcome.message());
        let v = outcome.visit();
        match &outcome {
            CheckOutcome::Entered(_) => println!(
                "   {} ({}) in at {} {}",
                v.full_reg_no,
                v.role,
                date::to_db(&v.entry_date),
                time::to_db(&v.entry_time)
            ),
            CheckOutcome::Exited(_) => {
                if let (Some(d), Some(t)) = (v.exit_date, v.exit_time) {
                    println!(
                        "   {} ({}) out at {} {}",
                        v.full_reg_no,
                        v.role,
                        date::to_db(&d),
                        time::to_db(&t)
                    );
                }
            }
        }
    }
    Ok(())
}
