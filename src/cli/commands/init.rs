use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_str = db_path.to_string_lossy().to_string();

    info("Initializing libgate…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {db_str}");

    let pool = open_db(&db_str)?;

    // internal log is best effort
    if let Err(e) = audit(&pool.conn, "init", &db_str, "Database initialized") {
        warning(format!("Failed to write internal log: {e}"));
    }

    success(format!("Database initialized at {db_str}"));
    Ok(())
}
