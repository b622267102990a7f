use crate::models::{HealthResponse, StatsResponse};
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "OK".into(),
    })
}

/// GET /stats
pub async fn memo_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.memo.stats().into())
}
