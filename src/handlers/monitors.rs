use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

use super::AppError;

#[derive(Debug, Serialize)]
pub struct ResetStatus {
    pub monitor: String,
    pub reset: bool,
}

// ─── POST /api/monitors/:name/reset ──────────────────────────────
/// Clears the sample window and histogram of one monitor.

pub async fn reset_monitor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ResetStatus>, AppError> {
    if !state.monitors.reset(&name) {
        return Err(AppError::NotFound(format!("monitor '{name}' not found")));
    }
    Ok(Json(ResetStatus {
        monitor: name,
        reset: true,
    }))
}
