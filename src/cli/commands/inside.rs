use crate::cli::commands::open_existing;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Inside { json } = cmd {
        let pool = open_existing(cfg)?;
        let occupants = queries::users_inside(&pool.conn)?;

        if *json {
            let out = serde_json::to_string_pretty(&occupants)
                .map_err(|e| AppError::Other(e.to_string()))?;
            println!("{out}");
            return Ok(());
        }

        if occupants.is_empty() {
            info("Nobody is inside.");
            return Ok(());
        }

        header(format!("Currently inside: {}", occupants.len()));
        let mut table = Table::new(&["Registration No", "Name"]);
        for o in occupants {
            table.add_row(vec![o.full_reg_no, o.name]);
        }
        print!("{}", table.render());
    }
    Ok(())
}
