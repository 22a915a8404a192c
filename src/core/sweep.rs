//! Forced exits: the daily auto-exit sweep and the startup cleanup.

use crate::config::Config;
use crate::db::log::audit;
use crate::db::queries;
use crate::errors::AppResult;
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupCleanup {
    /// Started before the cutoff hour: nothing to do.
    NotNeeded,
    /// After the cutoff, but nobody was left inside.
    NothingOpen,
    /// After the cutoff; this many open logs were closed.
    Closed(usize),
}

pub struct SweepLogic;

impl SweepLogic {
    /// Close every open log with `now`. Returns how many were closed.
    pub fn auto_exit(conn: &Connection, now: NaiveDateTime) -> AppResult<usize> {
        let count = queries::close_all_open(conn, &now.date(), &now.time())?;

        let message = if count > 0 {
            format!("{count} users exited automatically")
        } else {
            "No open logs found".to_string()
        };
        audit(
            conn,
            "auto_exit",
            &now.format("%Y-%m-%d %H:%M:%S").to_string(),
            &message,
        )?;

        Ok(count)
    }

    /// When the process starts after `cleanup_after_hour`, the sweep for
    /// today may have been missed: close leftovers at 23:59:59 today.
    pub fn startup_cleanup(
        conn: &Connection,
        cfg: &Config,
        now: NaiveDateTime,
    ) -> AppResult<StartupCleanup> {
        if now.hour() <= cfg.cleanup_after_hour {
            return Ok(StartupCleanup::NotNeeded);
        }

        if queries::count_open(conn)? == 0 {
            return Ok(StartupCleanup::NothingOpen);
        }

        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        let count = queries::close_all_open(conn, &now.date(), &end_of_day)?;
        audit(
            conn,
            "startup_cleanup",
            &now.date().to_string(),
            &format!("{count} open logs closed at 23:59:59"),
        )?;

        Ok(StartupCleanup::Closed(count))
    }

    /// Next occurrence of the daily sweep strictly after `now`.
    pub fn next_run(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
        let today = now.date().and_time(at);
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attendance::AttendanceLogic;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn setup_with_two_inside() -> (DbPool, Config) {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        queries::upsert_student(&pool.conn, "2023PUCS11111", "Asha", "CSE", 1, "a@poornima.edu.in")
            .unwrap();
        queries::upsert_student(&pool.conn, "2023PUCS22222", "Ravi", "ECE", 2, "r@poornima.edu.in")
            .unwrap();
        let cfg = Config::with_database(":memory:");
        AttendanceLogic::check(&pool.conn, &cfg, "11111", "Student", at(15, 9, 0)).unwrap();
        AttendanceLogic::check(&pool.conn, &cfg, "22222", "Student", at(15, 10, 0)).unwrap();
        (pool, cfg)
    }

    #[test]
    fn auto_exit_closes_everyone() {
        let (pool, _) = setup_with_two_inside();

        assert_eq!(SweepLogic::auto_exit(&pool.conn, at(15, 16, 30)).unwrap(), 2);
        assert_eq!(queries::count_open(&pool.conn).unwrap(), 0);

        let v = queries::visit_by_id(&pool.conn, 1).unwrap().unwrap();
        assert_eq!(v.exit_time.unwrap().to_string(), "16:30:00");

        // nothing left on the second run
        assert_eq!(SweepLogic::auto_exit(&pool.conn, at(15, 16, 31)).unwrap(), 0);
    }

    #[test]
    fn startup_cleanup_only_after_cutoff_hour() {
        let (pool, cfg) = setup_with_two_inside();

        assert_eq!(
            SweepLogic::startup_cleanup(&pool.conn, &cfg, at(15, 16, 59)).unwrap(),
            StartupCleanup::NotNeeded
        );
        assert_eq!(queries::count_open(&pool.conn).unwrap(), 2);

        assert_eq!(
            SweepLogic::startup_cleanup(&pool.conn, &cfg, at(15, 17, 0)).unwrap(),
            StartupCleanup::Closed(2)
        );
        let v = queries::visit_by_id(&pool.conn, 2).unwrap().unwrap();
        assert_eq!(v.exit_time.unwrap().to_string(), "23:59:59");

        assert_eq!(
            SweepLogic::startup_cleanup(&pool.conn, &cfg, at(15, 18, 0)).unwrap(),
            StartupCleanup::NothingOpen
        );
    }

    #[test]
    fn next_run_rolls_over_to_tomorrow() {
        let at_1630 = NaiveTime::from_hms_opt(16, 30, 0).unwrap();
        assert_eq!(SweepLogic::next_run(at(15, 9, 0), at_1630), at(15, 16, 30));
        assert_eq!(SweepLogic::next_run(at(15, 16, 30), at_1630), at(16, 16, 30));
        assert_eq!(SweepLogic::next_run(at(15, 23, 0), at_1630), at(16, 16, 30));
    }
}
