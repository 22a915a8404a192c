//! Administrative reports over the `logs` table.
//!
//! A [`Report`] is a header row plus string cells, ready to be written as a
//! spreadsheet (or CSV/JSON) by the export layer.

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::visit::Visit;
use crate::utils::{date, time};
use chrono::NaiveDate;
use clap::ValueEnum;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;

pub const STILL_INSIDE: &str = "Still Inside";

pub const LOG_HEADERS: [&str; 8] = [
    "Registration No",
    "Name",
    "Branch",
    "Year",
    "Entry Date",
    "Entry Time",
    "Exit Date",
    "Exit Time",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    DailyStudentCount,
    DailySummary,
    WeeklySummary,
    FullLogDump,
}

impl ReportKind {
    /// Path segment used by the HTTP routes (`/report/<slug>`).
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::DailyStudentCount => "daily_student_count",
            ReportKind::DailySummary => "daily_summary",
            ReportKind::WeeklySummary => "weekly_summary",
            ReportKind::FullLogDump => "full_log_dump",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        Self::value_variants()
            .iter()
            .copied()
            .find(|k| k.slug() == s)
    }

    pub fn needs_date(&self) -> bool {
        !matches!(self, ReportKind::FullLogDump)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    /// Suggested download name, always ending in `.xlsx`.
    pub filename: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    fn new(kind: ReportKind, filename: String, headers: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            kind,
            filename,
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// Columns whose cells are written as numbers in spreadsheets.
    pub fn is_numeric_column(&self, col: usize) -> bool {
        matches!(
            self.headers.get(col).map(String::as_str),
            Some("Year") | Some("Unique Student Count")
        )
    }

    /// Download name with the extension swapped for another format.
    pub fn filename_with_ext(&self, ext: &str) -> String {
        match self.filename.rsplit_once('.') {
            Some((stem, _)) => format!("{stem}.{ext}"),
            None => format!("{}.{ext}", self.filename),
        }
    }
}

/// One report row in the column order of [`LOG_HEADERS`].
pub fn visit_row(v: &Visit) -> Vec<String> {
    vec![
        v.full_reg_no.clone(),
        v.name.clone(),
        v.branch.clone(),
        v.year.clone(),
        date::to_report(&v.entry_date),
        time::to_db(&v.entry_time),
        v.exit_date
            .map(|d| date::to_report(&d))
            .unwrap_or_else(|| STILL_INSIDE.to_string()),
        v.exit_time
            .map(|t| time::to_db(&t))
            .unwrap_or_else(|| STILL_INSIDE.to_string()),
    ]
}

pub struct ReportLogic;

impl ReportLogic {
    /// Build the report of the given kind. `date` is the raw `YYYY-MM-DD`
    /// value supplied by the caller; ignored for the full dump.
    pub fn build(conn: &Connection, kind: ReportKind, date: Option<&str>) -> AppResult<Report> {
        if queries::count_visits(conn)? == 0 {
            return Err(AppError::EmptyLog);
        }

        if !kind.needs_date() {
            return Self::full_log_dump(conn);
        }

        let day = Self::parse_report_date(date)?;
        match kind {
            ReportKind::DailyStudentCount => Self::daily_student_count(conn, day),
            ReportKind::DailySummary => Self::daily_summary(conn, day),
            ReportKind::WeeklySummary => Self::weekly_summary(conn, day),
            ReportKind::FullLogDump => Self::full_log_dump(conn),
        }
    }

    pub fn parse_report_date(raw: Option<&str>) -> AppResult<NaiveDate> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(AppError::MissingReportDate)?;
        date::parse_date(raw).ok_or(AppError::InvalidReportDate)
    }

    fn visits_of_day(conn: &Connection, day: NaiveDate) -> AppResult<Vec<Visit>> {
        let visits = queries::load_visits(conn, Some((day, day)))?;
        if visits.is_empty() {
            return Err(AppError::NoEntries(format!(
                "No library entries found for {}.",
                date::to_db(&day)
            )));
        }
        Ok(visits)
    }

    pub fn daily_student_count(conn: &Connection, day: NaiveDate) -> AppResult<Report> {
        let visits = Self::visits_of_day(conn, day)?;
        let unique: HashSet<&str> = visits.iter().map(|v| v.full_reg_no.as_str()).collect();

        Ok(Report::new(
            ReportKind::DailyStudentCount,
            format!("daily_student_count_{}.xlsx", date::to_db(&day)),
            &["Date", "Unique Student Count"],
            vec![vec![date::to_report(&day), unique.len().to_string()]],
        ))
    }

    pub fn daily_summary(conn: &Connection, day: NaiveDate) -> AppResult<Report> {
        let visits = Self::visits_of_day(conn, day)?;

        Ok(Report::new(
            ReportKind::DailySummary,
            format!("daily_summary_{}.xlsx", date::to_db(&day)),
            &LOG_HEADERS,
            visits.iter().map(visit_row).collect(),
        ))
    }

    pub fn weekly_summary(conn: &Connection, day: NaiveDate) -> AppResult<Report> {
        let (monday, sunday) = date::week_bounds(day);
        let visits = queries::load_visits(conn, Some((monday, sunday)))?;
        if visits.is_empty() {
            return Err(AppError::NoEntries(format!(
                "No library entries found for the week of {}.",
                date::to_db(&monday)
            )));
        }

        Ok(Report::new(
            ReportKind::WeeklySummary,
            format!(
                "weekly_report_{}_to_{}.xlsx",
                monday.format("%Y%m%d"),
                sunday.format("%Y%m%d")
            ),
            &LOG_HEADERS,
            visits.iter().map(visit_row).collect(),
        ))
    }

    /// Every visit, newest entry first.
    pub fn full_log_dump(conn: &Connection) -> AppResult<Report> {
        let mut visits = queries::load_visits(conn, None)?;
        if visits.is_empty() {
            return Err(AppError::EmptyLog);
        }
        visits.reverse();

        Ok(Report::new(
            ReportKind::FullLogDump,
            "full_library_log_dump.xlsx".to_string(),
            &LOG_HEADERS,
            visits.iter().map(visit_row).collect(),
        ))
    }
}
