use crate::core::sweep::SweepLogic;
use crate::errors::AppResult;
use crate::server::AppState;
use chrono::NaiveDateTime;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Background task closing every open log at the configured time each day.
/// Failures are logged and the task keeps running.
pub fn spawn_auto_exit(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = match time_to_next_run(&state) {
                Ok((next, wait)) => {
                    info!(%next, "auto-exit scheduled");
                    wait
                }
                Err(e) => {
                    error!(error = %e, "cannot schedule auto-exit, retrying in an hour");
                    Duration::from_secs(3600)
                }
            };

            tokio::time::sleep(wait).await;

            match run_once(&state) {
                Ok(0) => info!("auto-exit: no open logs found"),
                Ok(n) => info!(closed = n, "auto-exit: users exited automatically"),
                Err(e) => error!(error = %e, "auto-exit failed"),
            }
        }
    })
}

fn time_to_next_run(state: &AppState) -> AppResult<(NaiveDateTime, Duration)> {
    let now = state.config.now()?;
    let next = SweepLogic::next_run(now, state.config.auto_exit_at()?);
    let wait = (next - now).to_std().unwrap_or(Duration::from_secs(1));
    Ok((next, wait))
}

fn run_once(state: &AppState) -> AppResult<usize> {
    let now = state.config.now()?;
    let db = state.db()?;
    SweepLogic::auto_exit(&db.conn, now)
}
