// src/export/mod.rs

mod excel_date;
mod fs_utils;
mod json_csv;
mod xlsx;

pub use xlsx::{XLSX_MIME, xlsx_bytes};

use crate::core::report::Report;
use crate::errors::AppResult;
use crate::ui::messages::success;
use clap::ValueEnum;
use fs_utils::ensure_writable;
use std::path::{Path, PathBuf};

/// Common completion message for every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Write `report` to `file`, or to the report's own file name in the
    /// current directory. Returns the path written.
    pub fn export(
        report: &Report,
        format: ExportFormat,
        file: Option<&str>,
        force: bool,
    ) -> AppResult<PathBuf> {
        let path = match file {
            Some(f) => PathBuf::from(f),
            None => PathBuf::from(report.filename_with_ext(format.as_str())),
        };

        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Xlsx => xlsx::export_xlsx(report, &path)?,
            ExportFormat::Csv => json_csv::export_csv(report, &path)?,
            ExportFormat::Json => json_csv::export_json(report, &path)?,
        }

        Ok(path)
    }
}
