use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use splitscope::Stopwatch;
use std::sync::Arc;

use crate::calls;
use crate::store::Fields;
use crate::AppState;

use super::{AppError, RequestTiming, TimedResponse};

// ─── Domain types ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub prefs: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "default_prefs")]
    pub prefs: String,
}

fn default_role() -> String {
    "viewer".into()
}
fn default_prefs() -> String {
    r#"{"alerts":true,"tz":"UTC"}"#.into()
}

// ─── GET /api/users/:id ──────────────────────────────────────────

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimedResponse<User>>, AppError> {
    let started = Stopwatch::start();
    let key = format!("user:{id}");

    let (map, store_split) = calls::timed(
        &state.monitors,
        "store.hgetall",
        state.store.hgetall(&key),
    )
    .await;

    if map.is_empty() {
        return Err(AppError::NotFound(format!("user '{id}' not found")));
    }

    let user = calls::timed_sync(&state.monitors, "codec.user", || user_from_map(&map));

    Ok(Json(TimedResponse {
        data: user,
        timing: RequestTiming::from_splits(started.stop(), store_split),
    }))
}

// ─── POST /api/users ─────────────────────────────────────────────

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Json<TimedResponse<User>>, AppError> {
    let started = Stopwatch::start();

    if req.name.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest(
            "name must be non-empty and email must contain '@'".into(),
        ));
    }

    let user = User {
        id: format!("usr_{}", &uuid::Uuid::new_v4().to_string()[..8]),
        name: req.name,
        email: req.email,
        role: req.role,
        prefs: req.prefs,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let key = format!("user:{}", user.id);
    let fields = calls::timed_sync(&state.monitors, "codec.user", || user_to_map(&user));
    let ((), store_split) = calls::timed(
        &state.monitors,
        "store.hset",
        state.store.hset(&key, fields),
    )
    .await;

    Ok(Json(TimedResponse {
        data: user,
        timing: RequestTiming::from_splits(started.stop(), store_split),
    }))
}

// ─── Helpers ─────────────────────────────────────────────────────

fn user_from_map(map: &Fields) -> User {
    User {
        id: map.get("id").cloned().unwrap_or_default(),
        name: map.get("name").cloned().unwrap_or_default(),
        email: map.get("email").cloned().unwrap_or_default(),
        role: map.get("role").cloned().unwrap_or_default(),
        prefs: map.get("prefs").cloned().unwrap_or_default(),
        created_at: map.get("created_at").cloned().unwrap_or_default(),
    }
}

fn user_to_map(user: &User) -> Fields {
    [
        ("id", &user.id),
        ("name", &user.name),
        ("email", &user.email),
        ("role", &user.role),
        ("prefs", &user.prefs),
        ("created_at", &user.created_at),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.clone()))
    .collect()
}
