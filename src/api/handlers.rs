use super::AppState;
use crate::error::{LogtailError, Result};
use crate::logs::{self, LineCount};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /logs/{identifier}`
#[derive(Debug, Default, Deserialize)]
pub struct TailQuery {
    /// Number of lines to return from the end of the log
    pub tail: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Backend API!".to_string(),
        timestamp: now_iso(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Backend is running".to_string(),
    })
}

/// GET /api/hello/{name}
pub async fn hello(Path(name): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello, {}!", name),
        timestamp: now_iso(),
    })
}

/// GET /logs - sorted list of known service identifiers
pub async fn list_logs(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.list_identifiers())
}

/// GET /logs/{identifier}?tail=k - last k lines of a service log as plain text
///
/// The line count is validated before the identifier is resolved, and both
/// before the file is touched.
pub async fn tail_log(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    query: std::result::Result<Query<TailQuery>, QueryRejection>,
) -> Result<String> {
    let Query(query) = query.map_err(|e| LogtailError::InvalidQuery(e.body_text()))?;

    let lines = match query.tail {
        Some(value) => LineCount::new(value)?,
        None => LineCount::default(),
    };

    let path = state.registry.resolve(&identifier)?;

    tracing::debug!(
        "Tailing {} lines of '{}' from {}",
        lines.get(),
        identifier,
        path.display()
    );

    Ok(logs::tail(path, lines).await)
}
