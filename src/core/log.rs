use crate::db::log::{LogEntry, load_log};
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use std::sync::OnceLock;

const OP_MAX_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    match ANSI.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Colour of an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "auto_exit" | "startup_cleanup" => Colour::Yellow,
        "import" => Colour::Blue,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

/// Visible text truncated to `max` chars, operation word recoloured.
fn render_op(e: &LogEntry, max: usize) -> String {
    let visible = op_target(e);
    let visible = if visible.chars().count() > max {
        let mut s: String = visible.chars().take(max.saturating_sub(3)).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    let color = color_for_operation(&e.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let entries = load_log(conn)?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| op_target(e).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_MAX_WIDTH);
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let dates: Vec<String> = entries.iter().map(|e| display_date(&e.date)).collect();
        let date_w = dates.iter().map(String::len).max().unwrap_or(10);

        println!("📜 Internal log:\n");

        for (e, date) in entries.iter().zip(dates) {
            let op = render_op(e, OP_MAX_WIDTH);
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id, date, op, padding, e.message,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: &str, target: &str) -> LogEntry {
        LogEntry {
            id: 1,
            date: "2025-09-15T10:00:00+05:30".into(),
            operation: op.into(),
            target: target.into(),
            message: "m".into(),
        }
    }

    #[test]
    fn long_targets_are_truncated() {
        let e = entry("import", &"x".repeat(80));
        let shown = strip_ansi(&render_op(&e, OP_MAX_WIDTH));
        assert_eq!(shown.chars().count(), OP_MAX_WIDTH);
        assert!(shown.starts_with("import ("));
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn operation_without_target_is_bare() {
        let e = entry("auto_exit", "");
        assert_eq!(strip_ansi(&render_op(&e, OP_MAX_WIDTH)), "auto_exit");
    }
}
