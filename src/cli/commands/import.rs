use crate::cli::commands::open_existing;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::{ImportLogic, Roster};
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use std::fs::File;
use std::io::BufReader;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { roster, file } = cmd {
        let pool = open_existing(cfg)?;
        let input = BufReader::new(File::open(file)?);

        let summary = match roster {
            Roster::Students => ImportLogic::import_students(&pool.conn, input, &cfg.email_domain)?,
            Roster::Faculty => ImportLogic::import_faculty(&pool.conn, input)?,
        };

        success(format!("Import finished: {}", ImportLogic::describe(&summary)));
        for e in &summary.errors {
            warning(e);
        }
    }
    Ok(())
}
