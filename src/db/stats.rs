use crate::db::pool::DbPool;
use crate::db::queries::OPEN_LOG;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROSTERS
    //
    let students: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
    let faculty: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM faculty", [], |row| row.get(0))?;
    println!("{CYAN}• Roster:{RESET} {students} students, {faculty} faculty");

    //
    // 3) VISITS
    //
    let visits: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?;
    let open: i64 = pool.conn.query_row(
        &format!("SELECT COUNT(*) FROM logs WHERE {OPEN_LOG}"),
        [],
        |row| row.get(0),
    )?;
    println!("{CYAN}• Visits:{RESET} {GREEN}{visits}{RESET} ({open} still open)");

    //
    // 4) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row("SELECT MIN(entry_date) FROM logs", [], |row| row.get(0))
        .optional()?
        .flatten();
    let last_date: Option<String> = pool
        .conn
        .query_row("SELECT MAX(entry_date) FROM logs", [], |row| row.get(0))
        .optional()?
        .flatten();

    let placeholder = format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", first_date.unwrap_or_else(|| placeholder.clone()));
    println!("    to:   {}", last_date.unwrap_or(placeholder));

    println!();
    Ok(())
}
