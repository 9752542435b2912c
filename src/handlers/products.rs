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

// ─── Domain type ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    /// Price in cents (e.g. 12999 = $129.99)
    pub price: u64,
    pub stock: u32,
    pub category: String,
    pub description: String,
}

// ─── GET /api/products/:id ───────────────────────────────────────

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimedResponse<Product>>, AppError> {
    let started = Stopwatch::start();
    let key = format!("product:{id}");

    let (map, store_split) = calls::timed(
        &state.monitors,
        "store.hgetall",
        state.store.hgetall(&key),
    )
    .await;

    if map.is_empty() {
        return Err(AppError::NotFound(format!("product '{id}' not found")));
    }

    let product = calls::timed_sync(&state.monitors, "codec.product", || {
        product_from_map(&map)
    });

    Ok(Json(TimedResponse {
        data: product,
        timing: RequestTiming::from_splits(started.stop(), store_split),
    }))
}

// ─── Helpers ─────────────────────────────────────────────────────

fn product_from_map(map: &Fields) -> Product {
    Product {
        id: map.get("id").cloned().unwrap_or_default(),
        title: map.get("title").cloned().unwrap_or_default(),
        price: map
            .get("price")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        stock: map
            .get("stock")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        category: map.get("category").cloned().unwrap_or_default(),
        description: map.get("description").cloned().unwrap_or_default(),
    }
}
