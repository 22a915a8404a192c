use crate::core::attendance::{AttendanceLogic, CheckOutcome};
use crate::core::report::{ReportKind, ReportLogic};
use crate::core::stats::StatsLogic;
use crate::db::queries;
use crate::errors::AppError;
use crate::export::{XLSX_MIME, xlsx_bytes};
use crate::models::stats::LiveStats;
use crate::models::visit::Occupant;
use crate::server::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/api/inside", get(inside_endpoint))
        .route("/api/stats", get(stats_endpoint))
        .route("/api/check", post(check_endpoint))
        .route("/report/:kind", get(report_endpoint))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default, alias = "registry_last_digits")]
    pub code: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub message: String,
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub date: Option<String>,
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn inside_endpoint(State(state): State<AppState>) -> Result<Json<Vec<Occupant>>, AppError> {
    let db = state.db()?;
    Ok(Json(queries::users_inside(&db.conn)?))
}

async fn stats_endpoint(State(state): State<AppState>) -> Result<Json<LiveStats>, AppError> {
    let today = state.now()?.date();
    let db = state.db()?;
    Ok(Json(StatsLogic::live_stats(&db.conn, today)?))
}

async fn check_endpoint(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, AppError> {
    let now = state.now()?;
    let db = state.db()?;

    let outcome = AttendanceLogic::check(&db.conn, &state.config, &req.code, &req.role, now)
        .inspect_err(|e| {
            if !e.is_user_error() {
                warn!(error = %e, "check failed");
            }
        })?;

    let v = outcome.visit();
    info!(reg_no = %v.full_reg_no, role = %v.role, log_id = v.log_id, "{}", outcome.message());

    Ok(Json(CheckResponse {
        message: outcome.message(),
        outcome,
    }))
}

async fn report_endpoint(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let kind = ReportKind::from_slug(&kind).ok_or(AppError::UnknownReport(kind))?;

    let report = {
        let db = state.db()?;
        ReportLogic::build(&db.conn, kind, query.date.as_deref())?
    };
    let bytes = xlsx_bytes(&report)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.filename),
            ),
        ],
        bytes,
    ))
}
