pub mod check;
pub mod config;
pub mod db;
pub mod import;
pub mod init;
pub mod inside;
pub mod log;
pub mod report;
pub mod serve;
pub mod stats;
pub mod sweep;

use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use std::path::Path;

/// Open the configured database; commands other than `init` need it to exist.
pub(crate) fn open_existing(cfg: &Config) -> AppResult<DbPool> {
    if cfg.database != ":memory:" && !Path::new(&cfg.database).exists() {
        return Err(AppError::Other(format!(
            "database not found at {} (run `libgate init` first)",
            cfg.database
        )));
    }
    open_db(&cfg.database)
}
