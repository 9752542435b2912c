pub mod benchmark;
pub mod monitors;
pub mod products;
pub mod users;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use splitscope::Split;

// ─── Shared response envelope ────────────────────────────────────

/// Every API response carries its own timing breakdown so clients can see
/// per-request latency without parsing headers.
#[derive(Debug, Clone, Serialize)]
pub struct TimedResponse<T: Serialize> {
    pub data: T,
    pub timing: RequestTiming,
}

/// Microsecond-precision breakdown of where wall-clock time was spent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RequestTiming {
    /// Total handler wall time (μs)
    pub total_us: u64,
    /// Time spent inside the store round-trip (μs)
    pub store_us: u64,
    /// Decoding / validation / routing overhead (μs)
    pub overhead_us: u64,
}

impl RequestTiming {
    pub fn from_splits(total: Split, store: Split) -> Self {
        let total_us = total.running_for / 1_000;
        let store_us = store.running_for / 1_000;
        Self {
            total_us,
            store_us,
            overhead_us: total_us.saturating_sub(store_us),
        }
    }
}

// ─── Unified error type ──────────────────────────────────────────

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    AlreadyRunning,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::AlreadyRunning => {
                (StatusCode::CONFLICT, "Benchmark already running".into())
            }
        };

        let body = serde_json::json!({
            "error":  message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
