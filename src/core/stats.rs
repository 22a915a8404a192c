use crate::db::queries::{self, OPEN_LOG};
use crate::errors::AppResult;
use crate::models::stats::LiveStats;
use crate::utils::{date, time::hour_label};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

pub struct StatsLogic;

impl StatsLogic {
    pub fn live_stats(conn: &Connection, today: NaiveDate) -> AppResult<LiveStats> {
        let day = date::to_db(&today);

        let (total, unique): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT full_reg_no) FROM logs WHERE entry_date = ?1",
            [&day],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        // ties go to the later hour
        let peak: Option<i64> = conn
            .query_row(
                "SELECT CAST(substr(entry_time, 1, 2) AS INTEGER) AS hour
                   FROM logs
                  WHERE entry_date = ?1
                  GROUP BY hour
                  ORDER BY COUNT(*) DESC, hour DESC
                  LIMIT 1",
                [&day],
                |row| row.get(0),
            )
            .optional()?;

        Ok(LiveStats {
            total_entries_today: total,
            unique_visitors_today: unique,
            currently_inside: queries::count_open(conn)?,
            peak_hour_today: peak
                .map(|h| hour_label(h as u32))
                .unwrap_or_else(|| "N/A".to_string()),
        })
    }

    /// Open logs left over from earlier days (missed sweeps).
    pub fn stale_open(conn: &Connection, today: NaiveDate) -> AppResult<i64> {
        Ok(conn.query_row(
            &format!("SELECT COUNT(*) FROM logs WHERE {OPEN_LOG} AND entry_date < ?1"),
            [date::to_db(&today)],
            |row| row.get(0),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;

    fn insert(conn: &Connection, reg: &str, day: &str, at: &str, exit: Option<&str>) {
        conn.execute(
            "INSERT INTO logs (full_reg_no, name, entry_date, entry_time, exit_date, exit_time, role)
             VALUES (?1, 'X', ?2, ?3, ?4, ?5, 'Student')",
            rusqlite::params![reg, day, at, exit.map(|_| day), exit],
        )
        .unwrap();
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 15).unwrap()
    }

    #[test]
    fn empty_day_reports_na() {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();

        let s = StatsLogic::live_stats(&pool.conn, today()).unwrap();
        assert_eq!(s.total_entries_today, 0);
        assert_eq!(s.unique_visitors_today, 0);
        assert_eq!(s.currently_inside, 0);
        assert_eq!(s.peak_hour_today, "N/A");
    }

    #[test]
    fn counts_and_peak_hour() {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        let c = &pool.conn;

        insert(c, "A", "2025-09-15", "09:10:00", Some("10:00:00"));
        insert(c, "A", "2025-09-15", "14:05:00", None);
        insert(c, "B", "2025-09-15", "09:40:00", Some("11:00:00"));
        insert(c, "C", "2025-09-15", "14:30:00", Some("15:00:00"));
        // yesterday, still open
        insert(c, "D", "2025-09-14", "15:00:00", None);

        let s = StatsLogic::live_stats(c, today()).unwrap();
        assert_eq!(s.total_entries_today, 4);
        assert_eq!(s.unique_visitors_today, 3);
        assert_eq!(s.currently_inside, 2);
        // 9 and 14 both have two entries
        assert_eq!(s.peak_hour_today, "2 PM");

        assert_eq!(StatsLogic::stale_open(c, today()).unwrap(), 1);
    }
}
