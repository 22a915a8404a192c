//! Roster import from CSV: students and faculty are upserted by their
//! registration number, invalid rows are skipped and reported.

use crate::db::log::audit;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use clap::ValueEnum;
use regex::Regex;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Roster {
    Students,
    Faculty,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.updated += 1;
        }
    }

    fn skip(&mut self, row: usize, reason: impl AsRef<str>) {
        self.skipped += 1;
        self.errors.push(format!("Row {row}: {}", reason.as_ref()));
    }
}

#[derive(Debug, Deserialize)]
struct StudentRecord {
    full_reg_no: Option<String>,
    name: Option<String>,
    branch: Option<String>,
    year: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FacultyRecord {
    full_reg_no: Option<String>,
    name: Option<String>,
    department: Option<String>,
}

fn text(v: Option<String>) -> String {
    v.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Integer part of a spreadsheet-ish number: "3" and "3.0" both give 3.
fn int_part(v: &str) -> Option<i64> {
    let v = v.trim();
    let head = v.split('.').next().unwrap_or(v);
    head.parse().ok()
}

fn email_pattern(domain: &str) -> AppResult<Regex> {
    let domain = if domain.starts_with('@') {
        domain.to_string()
    } else {
        format!("@{domain}")
    };
    Regex::new(&format!(r"(?i){}$", regex::escape(&domain)))
        .map_err(|e| AppError::Import(e.to_string()))
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

pub struct ImportLogic;

impl ImportLogic {
    /// Columns: `full_reg_no,name,branch,year,email`.
    pub fn import_students<R: Read>(
        conn: &Connection,
        input: R,
        email_domain: &str,
    ) -> AppResult<ImportSummary> {
        let email_ok = email_pattern(email_domain)?;
        let mut rdr = reader(input);
        let mut summary = ImportSummary::default();

        let tx = conn.unchecked_transaction()?;

        for (idx, rec) in rdr.deserialize::<StudentRecord>().enumerate() {
            let row = idx + 2;
            let rec = match rec {
                Ok(r) => r,
                Err(e) => {
                    summary.skip(row, format!("Unreadable row -> {e}"));
                    continue;
                }
            };

            let full_reg_no = text(rec.full_reg_no);
            if full_reg_no.is_empty() {
                summary.skip(row, "'full_reg_no' is missing.");
                continue;
            }

            let year = match rec.year.as_deref().and_then(int_part) {
                Some(y) if (1..=5).contains(&y) => y,
                _ => {
                    summary.skip(row, "'year' must be between 1 and 5.");
                    continue;
                }
            };

            let email = text(rec.email);
            if !email_ok.is_match(&email) {
                summary.skip(row, format!("Email must end with {email_domain}."));
                continue;
            }

            match queries::upsert_student(
                &tx,
                &full_reg_no,
                &text(rec.name),
                &text(rec.branch),
                year,
                &email,
            ) {
                Ok(inserted) => summary.record(inserted),
                Err(e) => summary.skip(row, format!("Database error -> {e}")),
            }
        }

        audit(&tx, "import", "students", &Self::describe(&summary))?;
        tx.commit()?;
        Ok(summary)
    }

    /// Columns: `full_reg_no,name,department`.
    pub fn import_faculty<R: Read>(conn: &Connection, input: R) -> AppResult<ImportSummary> {
        let mut rdr = reader(input);
        let mut summary = ImportSummary::default();

        let tx = conn.unchecked_transaction()?;

        for (idx, rec) in rdr.deserialize::<FacultyRecord>().enumerate() {
            let row = idx + 2;
            let rec = match rec {
                Ok(r) => r,
                Err(e) => {
                    summary.skip(row, format!("Unreadable row -> {e}"));
                    continue;
                }
            };

            let raw = text(rec.full_reg_no);
            if raw.is_empty() {
                summary.skip(row, "'full_reg_no' is missing.");
                continue;
            }
            let Some(reg_no) = int_part(&raw) else {
                summary.skip(row, "'full_reg_no' must be numeric.");
                continue;
            };

            match queries::upsert_faculty(&tx, reg_no, &text(rec.name), &text(rec.department)) {
                Ok(inserted) => summary.record(inserted),
                Err(e) => summary.skip(row, format!("Database error -> {e}")),
            }
        }

        audit(&tx, "import", "faculty", &Self::describe(&summary))?;
        tx.commit()?;
        Ok(summary)
    }

    pub fn describe(summary: &ImportSummary) -> String {
        format!(
            "{} inserted, {} updated, {} skipped",
            summary.inserted, summary.updated, summary.skipped
        )
    }
}
