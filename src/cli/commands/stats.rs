use crate::cli::commands::open_existing;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::stats::StatsLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, warning};
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::date;
use chrono::NaiveDateTime;

pub fn handle(cmd: &Commands, cfg: &Config, now: NaiveDateTime) -> AppResult<()> {
    if let Commands::Stats { json } = cmd {
        let pool = open_existing(cfg)?;
        let today = now.date();
        let s = StatsLogic::live_stats(&pool.conn, today)?;

        if *json {
            let out =
                serde_json::to_string_pretty(&s).map_err(|e| AppError::Other(e.to_string()))?;
            println!("{out}");
            return Ok(());
        }

        header(format!("Library stats for {}", date::to_db(&today)));
        println!("{CYAN}• Entries today:{RESET}    {GREEN}{}{RESET}", s.total_entries_today);
        println!("{CYAN}• Unique visitors:{RESET}  {GREEN}{}{RESET}", s.unique_visitors_today);
        println!("{CYAN}• Currently inside:{RESET} {GREEN}{}{RESET}", s.currently_inside);
        println!("{CYAN}• Peak hour:{RESET}        {}", s.peak_hour_today);

        let stale = StatsLogic::stale_open(&pool.conn, today)?;
        if stale > 0 {
            warning(format!(
                "{stale} open log(s) from earlier days; run `libgate sweep`"
            ));
        }
    }
    Ok(())
}
