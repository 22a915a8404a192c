use crate::errors::{AppError, AppResult};
use crate::models::member::Member;
use crate::models::role::Role;
use crate::models::visit::{Occupant, Visit};
use crate::utils::{date, time};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params};

/// SQL predicate selecting open logs (person still inside).
pub const OPEN_LOG: &str = "(exit_date IS NULL OR exit_date = '')";

const VISIT_COLUMNS: &str = "log_id, full_reg_no, name, branch, year, entry_date, entry_time, \
     exit_date, exit_time, role, reason";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn opt_text(row: &Row, col: &str) -> Result<Option<String>> {
    Ok(row
        .get::<_, Option<String>>(col)?
        .filter(|s| !s.trim().is_empty()))
}

pub fn map_visit(row: &Row) -> Result<Visit> {
    let entry_date_str: String = row.get("entry_date")?;
    let entry_date = date::parse_date(&entry_date_str)
        .ok_or_else(|| conversion_error(5, AppError::InvalidDate(entry_date_str.clone())))?;

    let entry_time_str: String = row.get("entry_time")?;
    let entry_time = time::parse_time(&entry_time_str)
        .ok_or_else(|| conversion_error(6, AppError::InvalidTime(entry_time_str.clone())))?;

    let exit_date = match opt_text(row, "exit_date")? {
        Some(s) => Some(
            date::parse_date(&s).ok_or_else(|| conversion_error(7, AppError::InvalidDate(s)))?,
        ),
        None => None,
    };

    let exit_time = match opt_text(row, "exit_time")? {
        Some(s) => Some(
            time::parse_time(&s).ok_or_else(|| conversion_error(8, AppError::InvalidTime(s)))?,
        ),
        None => None,
    };

    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str)
        .ok_or_else(|| conversion_error(9, AppError::InvalidRole(role_str.clone())))?;

    Ok(Visit {
        log_id: row.get("log_id")?,
        full_reg_no: row.get("full_reg_no")?,
        name: opt_text(row, "name")?.unwrap_or_default(),
        branch: opt_text(row, "branch")?.unwrap_or_else(|| "N/A".to_string()),
        year: opt_text(row, "year")?.unwrap_or_else(|| "N/A".to_string()),
        entry_date,
        entry_time,
        exit_date,
        exit_time,
        role,
        reason: opt_text(row, "reason")?.unwrap_or_default(),
    })
}

// ---------------------------
// Rosters
// ---------------------------

/// First student whose full registration number ends with `suffix`.
pub fn find_student_by_suffix(conn: &Connection, suffix: &str) -> AppResult<Option<Member>> {
    let pattern = format!("%{suffix}");
    let member = conn
        .query_row(
            "SELECT full_reg_no, name, branch, year FROM students
             WHERE full_reg_no LIKE ?1
             ORDER BY full_reg_no ASC
             LIMIT 1",
            [pattern],
            |row| {
                Ok(Member {
                    full_reg_no: row.get(0)?,
                    name: row.get(1)?,
                    branch: row.get(2)?,
                    year: row.get(3)?,
                    role: Role::Student,
                })
            },
        )
        .optional()?;
    Ok(member)
}

pub fn find_faculty(conn: &Connection, reg_no: i64) -> AppResult<Option<Member>> {
    let member = conn
        .query_row(
            "SELECT full_reg_no, name FROM faculty WHERE full_reg_no = ?1",
            [reg_no],
            |row| {
                // department stays on the roster; visits log Branch as N/A
                Ok(Member {
                    full_reg_no: row.get::<_, i64>(0)?.to_string(),
                    name: row.get(1)?,
                    branch: None,
                    year: None,
                    role: Role::Faculty,
                })
            },
        )
        .optional()?;
    Ok(member)
}

fn exists(conn: &Connection, sql: &str, key: &dyn rusqlite::ToSql) -> Result<bool> {
    Ok(conn
        .query_row(sql, [key], |_| Ok(()))
        .optional()?
        .is_some())
}

/// Insert or update a student. Returns `true` when a new row was inserted.
pub fn upsert_student(
    conn: &Connection,
    full_reg_no: &str,
    name: &str,
    branch: &str,
    year: i64,
    email: &str,
) -> AppResult<bool> {
    let existed = exists(
        conn,
        "SELECT 1 FROM students WHERE full_reg_no = ?1",
        &full_reg_no,
    )?;

    conn.execute(
        "INSERT INTO students (full_reg_no, name, branch, year, email)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(full_reg_no) DO UPDATE SET
             name = excluded.name,
             branch = excluded.branch,
             year = excluded.year,
             email = excluded.email",
        params![full_reg_no, name, branch, year, email],
    )?;

    Ok(!existed)
}

/// Insert or update a faculty member. Returns `true` when a new row was inserted.
pub fn upsert_faculty(
    conn: &Connection,
    full_reg_no: i64,
    name: &str,
    department: &str,
) -> AppResult<bool> {
    let existed = exists(
        conn,
        "SELECT 1 FROM faculty WHERE full_reg_no = ?1",
        &full_reg_no,
    )?;

    conn.execute(
        "INSERT INTO faculty (full_reg_no, name, department)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(full_reg_no) DO UPDATE SET
             name = excluded.name,
             department = excluded.department",
        params![full_reg_no, name, department],
    )?;

    Ok(!existed)
}

// ---------------------------
// Visits
// ---------------------------

pub fn open_visit(conn: &Connection, full_reg_no: &str) -> AppResult<Option<Visit>> {
    let sql = format!(
        "SELECT {VISIT_COLUMNS} FROM logs
         WHERE full_reg_no = ?1 AND {OPEN_LOG}
         ORDER BY log_id DESC
         LIMIT 1"
    );
    Ok(conn.query_row(&sql, [full_reg_no], map_visit).optional()?)
}

pub fn visit_by_id(conn: &Connection, log_id: i64) -> AppResult<Option<Visit>> {
    let sql = format!("SELECT {VISIT_COLUMNS} FROM logs WHERE log_id = ?1");
    Ok(conn.query_row(&sql, [log_id], map_visit).optional()?)
}

/// Everyone currently inside, most recent entry first.
pub fn users_inside(conn: &Connection) -> AppResult<Vec<Occupant>> {
    let sql = format!(
        "SELECT full_reg_no, COALESCE(name, '') FROM logs
         WHERE {OPEN_LOG}
         ORDER BY log_id DESC"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(Occupant {
            full_reg_no: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_visit(
    conn: &Connection,
    member: &Member,
    role: Role,
    entry_date: &NaiveDate,
    entry_time: &NaiveTime,
    reason: &str,
) -> AppResult<i64> {
    let inserted = conn.execute(
        "INSERT INTO logs (full_reg_no, name, branch, year, entry_date, entry_time, role, reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            member.full_reg_no,
            member.name,
            member.branch_or_na(),
            member.year_or_na(),
            date::to_db(entry_date),
            time::to_db(entry_time),
            role.to_db_str(),
            reason,
        ],
    );

    match inserted {
        Ok(_) => Ok(conn.last_insert_rowid()),
        // idx_logs_one_open: an open log already exists for this person
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(AppError::AlreadyInside(member.name.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Stamp the exit on one person's open log(s). Returns rows updated.
pub fn close_visits_for(
    conn: &Connection,
    full_reg_no: &str,
    exit_date: &NaiveDate,
    exit_time: &NaiveTime,
) -> AppResult<usize> {
    let sql = format!(
        "UPDATE logs SET exit_date = ?1, exit_time = ?2
         WHERE full_reg_no = ?3 AND {OPEN_LOG}"
    );
    Ok(conn.execute(
        &sql,
        params![date::to_db(exit_date), time::to_db(exit_time), full_reg_no],
    )?)
}

/// Stamp the exit on every open log. Returns rows updated.
pub fn close_all_open(
    conn: &Connection,
    exit_date: &NaiveDate,
    exit_time: &NaiveTime,
) -> AppResult<usize> {
    let sql = format!("UPDATE logs SET exit_date = ?1, exit_time = ?2 WHERE {OPEN_LOG}");
    Ok(conn.execute(&sql, params![date::to_db(exit_date), time::to_db(exit_time)])?)
}

pub fn count_open(conn: &Connection) -> AppResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM logs WHERE {OPEN_LOG}");
    Ok(conn.query_row(&sql, [], |row| row.get(0))?)
}

pub fn count_visits(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM logs", [], |row| row.get(0))?)
}

/// Visits whose entry date falls inside `bounds` (inclusive), or all visits.
/// Ordered by entry date and time, oldest first.
pub fn load_visits(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<Visit>> {
    let mut out = Vec::new();

    match bounds {
        None => {
            let sql = format!(
                "SELECT {VISIT_COLUMNS} FROM logs ORDER BY entry_date ASC, entry_time ASC, log_id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], map_visit)?;
            for r in rows {
                out.push(r?);
            }
        }
        Some((start, end)) => {
            let sql = format!(
                "SELECT {VISIT_COLUMNS} FROM logs
                 WHERE entry_date BETWEEN ?1 AND ?2
                 ORDER BY entry_date ASC, entry_time ASC, log_id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![date::to_db(&start), date::to_db(&end)], map_visit)?;
            for r in rows {
                out.push(r?);
            }
        }
    }

    Ok(out)
}
