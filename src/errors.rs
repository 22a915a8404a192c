//! Unified application error type.
//! All modules (db, core, cli, server) return AppError to keep the error
//! handling consistent and easy to manage.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // ---------------------------
    // Desk (check-in / check-out) rejections
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("No {0} found with that code.")]
    MemberNotFound(String),

    #[error("Exit denied. You entered as {0} and must exit with the same role.")]
    RoleMismatch(String),

    #[error("{0} is already inside. Cannot enter again without exiting!")]
    AlreadyInside(String),

    #[error("Library closed. Hours: {0}")]
    LibraryClosed(String),

    // ---------------------------
    // Report errors
    // ---------------------------
    #[error("A 'date' parameter is required. Format: YYYY-MM-DD")]
    MissingReportDate,

    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidReportDate,

    #[error("Could not connect to the database or the log is empty.")]
    EmptyLog,

    #[error("{0}")]
    NoEntries(String),

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    // ---------------------------
    // Import errors
    // ---------------------------
    #[error("Import error: {0}")]
    Import(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Server
    // ---------------------------
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for errors caused by what the person at the desk (or the report
    /// caller) typed, as opposed to storage or runtime failures.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidRole(_)
                | AppError::InvalidDate(_)
                | AppError::MemberNotFound(_)
                | AppError::RoleMismatch(_)
                | AppError::AlreadyInside(_)
                | AppError::LibraryClosed(_)
                | AppError::MissingReportDate
                | AppError::InvalidReportDate
                | AppError::NoEntries(_)
                | AppError::UnknownReport(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidRole(_)
            | AppError::InvalidDate(_)
            | AppError::InvalidTime(_)
            | AppError::MissingReportDate
            | AppError::InvalidReportDate => StatusCode::BAD_REQUEST,
            AppError::MemberNotFound(_) | AppError::NoEntries(_) | AppError::UnknownReport(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::RoleMismatch(_) | AppError::LibraryClosed(_) => StatusCode::FORBIDDEN,
            AppError::AlreadyInside(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
