use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    nodes: usize,
    segments: usize,
    transit_key: bool,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let graph = state.store.snapshot();
    Json(HealthResponse {
        status: "ok",
        nodes: graph.node_count(),
        segments: graph.segment_count(),
        transit_key: state.transit.has_key(),
    })
}
