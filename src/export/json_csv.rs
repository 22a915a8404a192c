// src/export/json_csv.rs

use crate::core::report::Report;
use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Rows as JSON objects keyed by column header.
pub(crate) fn report_to_json(report: &Report) -> Value {
    let rows = report
        .rows
        .iter()
        .map(|row| {
            let obj: Map<String, Value> = report
                .headers
                .iter()
                .zip(row)
                .map(|(h, cell)| (h.clone(), Value::String(cell.clone())))
                .collect();
            Value::Object(obj)
        })
        .collect();
    Value::Array(rows)
}

/// Export JSON pretty-printed.
pub(crate) fn export_json(report: &Report, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(&report_to_json(report))
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}

/// Export CSV, header row first.
pub(crate) fn export_csv(report: &Report, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;

    wtr.write_record(&report.headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    for row in &report.rows {
        wtr.write_record(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.flush()?;

    notify_export_success("CSV", path);
    Ok(())
}
