use crate::counter::Counter;
use crate::models::{CachedCount, RawCount};
use crate::state::AppState;
use axum::{extract::State, Json};
use std::convert::Infallible;
use tracing::info;

/// GET /cache
pub async fn cached_count(State(state): State<AppState>) -> Json<CachedCount> {
    info!("GET: counter=cache (memoized)");

    let counter = state.counters.get("cache").await;
    let result = state
        .memo
        .call(Counter::OWNER, "increment", &(), || {
            let counter = counter.clone();
            async move {
                Ok::<_, Infallible>(CachedCount {
                    cached: counter.increment(),
                })
            }
        })
        .await;

    match result {
        Ok(count) => Json(count),
        Err(never) => match never {},
    }
}

/// GET /raw
pub async fn raw_count(State(state): State<AppState>) -> Json<RawCount> {
    info!("GET: counter=raw");

    let counter = state.counters.get("raw").await;
    Json(RawCount {
        raw: counter.increment(),
    })
}
