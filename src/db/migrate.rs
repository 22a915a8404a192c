//! Versioned schema migrations.
//!
//! Every migration runs at most once; applied versions are recorded in the
//! `log` table with `operation = 'migration_applied'`.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result};

struct Migration {
    version: &'static str,
    description: &'static str,
    apply: fn(&Connection) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250601_0001_create_rosters",
        description: "Created students and faculty tables",
        apply: create_rosters,
    },
    Migration {
        version: "20250601_0002_create_logs",
        description: "Created logs table",
        apply: create_logs,
    },
    Migration {
        version: "20250915_0003_add_reason_to_logs",
        description: "Added reason column to logs",
        apply: add_reason_to_logs,
    },
    Migration {
        version: "20250915_0004_index_open_logs",
        description: "Indexed logs by registration number and exit date",
        apply: index_logs,
    },
    Migration {
        version: "20251002_0005_unique_open_log",
        description: "At most one open log per registration number",
        apply: unique_open_log,
    },
];

/// Ensure that the `log` table exists; it doubles as the migration ledger.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn create_rosters(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            full_reg_no TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            branch      TEXT,
            year        INTEGER CHECK (year BETWEEN 1 AND 5),
            email       TEXT
        );

        CREATE TABLE IF NOT EXISTS faculty (
            full_reg_no INTEGER PRIMARY KEY,
            name        TEXT NOT NULL,
            department  TEXT
        );
        "#,
    )
}

fn create_logs(conn: &Connection) -> Result<()> {
    // `reason` arrives with 0003 so that databases created before it
    // follow the same upgrade path as fresh ones.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS logs (
            log_id      INTEGER PRIMARY KEY AUTOINCREMENT,
            full_reg_no TEXT NOT NULL,
            name        TEXT,
            branch      TEXT,
            year        TEXT,
            entry_date  TEXT NOT NULL,
            entry_time  TEXT NOT NULL,
            exit_date   TEXT,
            exit_time   TEXT,
            role        TEXT NOT NULL CHECK (role IN ('Student','Faculty'))
        );

        CREATE INDEX IF NOT EXISTS idx_logs_entry_date ON logs(entry_date);
        "#,
    )
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn add_reason_to_logs(conn: &Connection) -> Result<()> {
    if column_exists(conn, "logs", "reason")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE logs ADD COLUMN reason TEXT NOT NULL DEFAULT 'Self Study'",
        [],
    )?;
    Ok(())
}

fn index_logs(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_logs_reg_exit ON logs(full_reg_no, exit_date);",
    )
}

/// Older databases may hold several open logs for one person; all but the
/// newest are closed at their own entry time before the index is built.
fn unique_open_log(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        UPDATE logs
           SET exit_date = entry_date, exit_time = entry_time
         WHERE (exit_date IS NULL OR exit_date = '')
           AND log_id NOT IN (
               SELECT MAX(log_id) FROM logs
                WHERE exit_date IS NULL OR exit_date = ''
                GROUP BY full_reg_no
           );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_logs_one_open
            ON logs(full_reg_no)
            WHERE exit_date IS NULL OR exit_date = '';
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions not yet applied to this database.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut pending = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            pending.push(m.version);
        }
    }
    Ok(pending)
}

/// Public entry point: run all pending migrations, each in its own
/// transaction. Returns the versions applied by this call.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut applied = Vec::new();

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        (m.apply)(&tx).map_err(|e| AppError::Migration(format!("{}: {e}", m.version)))?;
        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;
        tx.commit()?;

        applied.push(m.version);
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        let first = run_pending_migrations(&conn).unwrap();
        assert_eq!(first.len(), MIGRATIONS.len());
        assert!(pending_migrations(&conn).unwrap().is_empty());

        let second = run_pending_migrations(&conn).unwrap();
        assert!(second.is_empty());

        assert!(column_exists(&conn, "logs", "reason").unwrap());
        assert!(column_exists(&conn, "students", "email").unwrap());
    }

    #[test]
    fn duplicate_open_logs_are_collapsed_before_indexing() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_log_table(&conn).unwrap();
        create_logs(&conn).unwrap();
        add_reason_to_logs(&conn).unwrap();
        for t in ["09:00:00", "11:00:00"] {
            conn.execute(
                "INSERT INTO logs (full_reg_no, name, entry_date, entry_time, role)
                 VALUES ('2023PUCS12345', 'Asha', '2025-09-15', ?1, 'Student')",
                [t],
            )
            .unwrap();
        }

        run_pending_migrations(&conn).unwrap();

        let open: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM logs WHERE exit_date IS NULL",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(open, 1);

        let dup = conn.execute(
            "INSERT INTO logs (full_reg_no, name, entry_date, entry_time, role)
             VALUES ('2023PUCS12345', 'Asha', '2025-09-16', '10:00:00', 'Student')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn legacy_logs_table_gains_reason_column() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_log_table(&conn).unwrap();
        create_logs(&conn).unwrap();
        conn.execute(
            "INSERT INTO logs (full_reg_no, name, entry_date, entry_time, role)
             VALUES ('2023PUCS12345', 'Asha', '2025-09-15', '10:00:00', 'Student')",
            [],
        )
        .unwrap();

        run_pending_migrations(&conn).unwrap();

        let reason: String = conn
            .query_row("SELECT reason FROM logs", [], |r| r.get(0))
            .unwrap();
        assert_eq!(reason, "Self Study");
    }
}
