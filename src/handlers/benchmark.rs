use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::load_generator::LoadPlan;
use crate::AppState;

use super::AppError;

// ─── Request / response types ────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LoadRequest {
    /// Concurrent tasks generating load
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// How long the run lasts (seconds)
    #[serde(default = "default_duration")]
    pub duration_secs: u64,

    /// Percentage of operations that are reads (0–100)
    #[serde(default = "default_read_pct")]
    pub read_pct: u8,
}

fn default_concurrency() -> u32 {
    10
}
fn default_duration() -> u64 {
    30
}
fn default_read_pct() -> u8 {
    70
}

impl LoadRequest {
    fn into_plan(self) -> Result<LoadPlan, AppError> {
        if !(1..=500).contains(&self.concurrency) {
            return Err(AppError::BadRequest(
                "concurrency must be between 1 and 500".into(),
            ));
        }
        if !(1..=300).contains(&self.duration_secs) {
            return Err(AppError::BadRequest(
                "duration_secs must be between 1 and 300".into(),
            ));
        }
        if self.read_pct > 100 {
            return Err(AppError::BadRequest(
                "read_pct must be between 0 and 100".into(),
            ));
        }
        Ok(LoadPlan {
            concurrency: self.concurrency,
            duration_secs: self.duration_secs,
            read_pct: self.read_pct,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct LoadStatus {
    pub running: bool,
    pub message: String,
}

// ─── POST /api/benchmark/start ───────────────────────────────────

pub async fn start_benchmark(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoadRequest>,
) -> Result<Json<LoadStatus>, AppError> {
    // Only one run at a time
    if state.load_running.load(Ordering::SeqCst) {
        return Err(AppError::AlreadyRunning);
    }
    let plan = request.into_plan()?;

    // Fresh statistics for the new run
    for name in state.monitors.hub.names() {
        state.monitors.reset(&name);
    }

    state.load_running.store(true, Ordering::SeqCst);
    let message = plan.to_string();
    tracing::info!(%plan, "load run started");

    let handle = tokio::spawn(crate::load_generator::run(
        plan,
        state.load_running.clone(),
        state.monitors.clone(),
        state.store.clone(),
    ));
    *state.load_handle.lock().await = Some(handle);

    Ok(Json(LoadStatus {
        running: true,
        message,
    }))
}

// ─── POST /api/benchmark/stop ────────────────────────────────────

pub async fn stop_benchmark(State(state): State<Arc<AppState>>) -> Json<LoadStatus> {
    if !state.load_running.swap(false, Ordering::SeqCst) {
        return Json(LoadStatus {
            running: false,
            message: "No load run in progress".into(),
        });
    }

    // Wait for the workers so the next run starts from a clean slate
    if let Some(handle) = state.load_handle.lock().await.take() {
        let _ = handle.await;
    }
    tracing::info!("load run stopped");

    Json(LoadStatus {
        running: false,
        message: "Load run stopped".into(),
    })
}

// ─── GET /api/benchmark/status ───────────────────────────────────

pub async fn benchmark_status(State(state): State<Arc<AppState>>) -> Json<LoadStatus> {
    let running = state.load_running.load(Ordering::SeqCst);
    Json(LoadStatus {
        running,
        message: if running { "Load run in progress" } else { "Idle" }.into(),
    })
}
