//! Desk logic: validate a registration code, resolve the person and toggle
//! their presence (entry when outside, exit when inside).

use crate::config::Config;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use crate::models::role::Role;
use crate::models::visit::Visit;
use chrono::{NaiveDateTime, Timelike};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "visit", rename_all = "snake_case")]
pub enum CheckOutcome {
    Entered(Visit),
    Exited(Visit),
}

impl CheckOutcome {
    pub fn visit(&self) -> &Visit {
        match self {
            CheckOutcome::Entered(v) | CheckOutcome::Exited(v) => v,
        }
    }

    pub fn message(&self) -> String {
        match self {
            CheckOutcome::Entered(v) => format!("Welcome! {} entered the library.", v.name),
            CheckOutcome::Exited(v) => format!("Goodbye! {} exited the library.", v.name),
        }
    }
}

pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Check the shape of the typed code for the selected role.
    /// Returns the trimmed code and the parsed role.
    pub fn validate_code(cfg: &Config, code: &str, role: &str) -> AppResult<(String, Role)> {
        let code = code.trim();
        let role = role.trim();

        if role.is_empty() {
            return Err(AppError::Validation("Please select a role.".to_string()));
        }
        if code.is_empty() {
            return Err(AppError::Validation(
                "Please enter registration code and select role.".to_string(),
            ));
        }

        let role = Role::from_input(role)
            .ok_or_else(|| AppError::Validation("Invalid role selected.".to_string()))?;

        let expected_len = match role {
            Role::Student => cfg.student_code_len,
            Role::Faculty => cfg.faculty_code_len,
        };

        if code.len() != expected_len || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "Enter a valid {expected_len}-digit code for {role}."
            )));
        }

        Ok((code.to_string(), role))
    }

    /// Resolve a validated code to a roster entry.
    pub fn find_member(conn: &Connection, code: &str, role: Role) -> AppResult<Member> {
        let found = match role {
            Role::Student => queries::find_student_by_suffix(conn, code)?,
            Role::Faculty => match code.parse::<i64>() {
                Ok(n) => queries::find_faculty(conn, n)?,
                Err(_) => None,
            },
        };

        found.ok_or_else(|| AppError::MemberNotFound(role.to_string()))
    }

    /// Toggle the presence of the person identified by `code`/`role` at `now`.
    pub fn check(
        conn: &Connection,
        cfg: &Config,
        code: &str,
        role: &str,
        now: NaiveDateTime,
    ) -> AppResult<CheckOutcome> {
        let (code, role) = Self::validate_code(cfg, code, role)?;

        // IMMEDIATE: take the write lock before reading the open log so the
        // sweep task cannot close it between the read and the update.
        let tx = rusqlite::Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

        let member = Self::find_member(&tx, &code, role)?;

        let outcome = match queries::open_visit(&tx, &member.full_reg_no)? {
            Some(open) => {
                if open.role != role {
                    return Err(AppError::RoleMismatch(open.role.to_string()));
                }
                queries::close_visits_for(&tx, &member.full_reg_no, &now.date(), &now.time())?;
                let closed = queries::visit_by_id(&tx, open.log_id)?
                    .ok_or_else(|| AppError::Other(format!("log {} vanished", open.log_id)))?;
                CheckOutcome::Exited(closed)
            }
            None => {
                let hour = now.hour();
                if hour < cfg.open_hour || hour >= cfg.close_hour {
                    return Err(AppError::LibraryClosed(cfg.hours_label()));
                }

                let log_id = queries::insert_visit(
                    &tx,
                    &member,
                    role,
                    &now.date(),
                    &now.time(),
                    &cfg.default_reason,
                )?;

                let opened = queries::visit_by_id(&tx, log_id)?
                    .ok_or_else(|| AppError::Other(format!("log {log_id} vanished")))?;
                CheckOutcome::Entered(opened)
            }
        };

        tx.commit()?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::pool::DbPool;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn setup() -> (DbPool, Config) {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        queries::upsert_student(
            &pool.conn,
            "2023PUCS12345",
            "Asha Verma",
            "CSE",
            2,
            "asha@poornima.edu.in",
        )
        .unwrap();
        queries::upsert_faculty(&pool.conn, 4021, "Dr. Rao", "Physics").unwrap();
        (pool, Config::with_database(":memory:"))
    }

    #[test]
    fn validation_messages_follow_role_rules() {
        let cfg = Config::with_database(":memory:");

        let err = AttendanceLogic::validate_code(&cfg, "12345", "").unwrap_err();
        assert_eq!(err.to_string(), "Please select a role.");

        let err = AttendanceLogic::validate_code(&cfg, "  ", "Student").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please enter registration code and select role."
        );

        let err = AttendanceLogic::validate_code(&cfg, "1234", "Student").unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid 5-digit code for Student.");

        let err = AttendanceLogic::validate_code(&cfg, "12a4", "Faculty").unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid 4-digit code for Faculty.");

        let err = AttendanceLogic::validate_code(&cfg, "1234", "Visitor").unwrap_err();
        assert_eq!(err.to_string(), "Invalid role selected.");

        let (code, role) = AttendanceLogic::validate_code(&cfg, " 12345 ", "student").unwrap();
        assert_eq!(code, "12345");
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn student_toggles_in_then_out() {
        let (pool, cfg) = setup();

        let first = AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(10, 0)).unwrap();
        assert!(matches!(first, CheckOutcome::Entered(_)));
        assert_eq!(first.message(), "Welcome! Asha Verma entered the library.");
        assert_eq!(first.visit().branch, "CSE");
        assert_eq!(first.visit().year, "2");
        assert_eq!(first.visit().reason, "Self Study");
        assert_eq!(queries::users_inside(&pool.conn).unwrap().len(), 1);

        let second =
            AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(12, 15)).unwrap();
        assert_eq!(second.message(), "Goodbye! Asha Verma exited the library.");
        let v = second.visit();
        assert!(!v.is_open());
        assert_eq!(v.exit_time.unwrap().to_string(), "12:15:00");
        assert!(queries::users_inside(&pool.conn).unwrap().is_empty());
    }

    #[test]
    fn faculty_matches_full_number_only() {
        let (pool, cfg) = setup();

        let ok = AttendanceLogic::check(&pool.conn, &cfg, "4021", "Faculty", at(9, 0)).unwrap();
        assert_eq!(ok.visit().full_reg_no, "4021");
        assert_eq!(ok.visit().branch, "N/A");
        assert_eq!(ok.visit().year, "N/A");

        let err = AttendanceLogic::check(&pool.conn, &cfg, "4022", "Faculty", at(9, 0)).unwrap_err();
        assert_eq!(err.to_string(), "No Faculty found with that code.");
    }

    #[test]
    fn exit_requires_the_entry_role() {
        let (pool, cfg) = setup();
        queries::upsert_student(&pool.conn, "2022PUME02345", "Kiran", "ME", 3, "k@poornima.edu.in")
            .unwrap();

        AttendanceLogic::check(&pool.conn, &cfg, "02345", "Student", at(10, 0)).unwrap();
        let open = queries::open_visit(&pool.conn, "2022PUME02345").unwrap().unwrap();
        assert_eq!(open.role, Role::Student);

        // visit recorded under the other role
        pool.conn
            .execute(
                "UPDATE logs SET role = 'Faculty' WHERE full_reg_no = '2022PUME02345'",
                [],
            )
            .unwrap();
        let err =
            AttendanceLogic::check(&pool.conn, &cfg, "02345", "Student", at(11, 0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Exit denied. You entered as Faculty and must exit with the same role."
        );
        assert_eq!(queries::count_open(&pool.conn).unwrap(), 1);
    }

    #[test]
    fn entry_outside_opening_hours_is_refused() {
        let (pool, cfg) = setup();

        let early = AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(6, 59));
        assert!(matches!(early, Err(AppError::LibraryClosed(_))));

        let late = AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(20, 0));
        assert_eq!(
            late.unwrap_err().to_string(),
            "Library closed. Hours: 7 AM - 8 PM"
        );

        assert!(AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(7, 0)).is_ok());
    }

    #[test]
    fn exit_is_allowed_after_closing_time() {
        let (pool, cfg) = setup();
        AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(19, 30)).unwrap();
        let out = AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(21, 0)).unwrap();
        assert!(matches!(out, CheckOutcome::Exited(_)));
    }

    #[test]
    fn unknown_student_is_reported() {
        let (pool, cfg) = setup();
        let err =
            AttendanceLogic::check(&pool.conn, &cfg, "99999", "Student", at(10, 0)).unwrap_err();
        assert_eq!(err.to_string(), "No Student found with that code.");
        assert!(err.is_user_error());
    }

    #[test]
    fn users_inside_lists_latest_entry_first() {
        let (pool, cfg) = setup();
        queries::upsert_student(
            &pool.conn,
            "2022PUEC54321",
            "Ravi Kumar",
            "ECE",
            3,
            "r@poornima.edu.in",
        )
        .unwrap();

        AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(9, 0)).unwrap();
        AttendanceLogic::check(&pool.conn, &cfg, "54321", "Student", at(10, 0)).unwrap();

        let inside = queries::users_inside(&pool.conn).unwrap();
        assert_eq!(inside.len(), 2);
        assert_eq!(inside[0].full_reg_no, "2022PUEC54321");
        assert_eq!(inside[0].name, "Ravi Kumar");
        assert_eq!(inside[1].full_reg_no, "2023PUCS12345");
    }

    #[test]
    fn second_open_log_is_rejected_as_already_inside() {
        let (pool, cfg) = setup();
        AttendanceLogic::check(&pool.conn, &cfg, "12345", "Student", at(9, 0)).unwrap();

        let member = AttendanceLogic::find_member(&pool.conn, "12345", Role::Student).unwrap();
        let now = at(9, 5);
        let err = queries::insert_visit(
            &pool.conn,
            &member,
            Role::Student,
            &now.date(),
            &now.time(),
            "Self Study",
        )
        .unwrap_err();

        assert!(matches!(err, AppError::AlreadyInside(_)));
        assert_eq!(
            err.to_string(),
            "Asha Verma is already inside. Cannot enter again without exiting!"
        );
        assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
        assert_eq!(queries::count_open(&pool.conn).unwrap(), 1);
    }
}
