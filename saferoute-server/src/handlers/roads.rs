use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use saferoute_core::{IngestReport, parse_road_geojson};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Merges a `GeoJSON` road batch into the shared graph
pub async fn roads_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<IngestReport>, ApiError> {
    let batch = parse_road_geojson(&body)?;

    let report = tokio::task::spawn_blocking(move || {
        state.store.merge(batch, &state.config.safety)
    })
    .await?;

    info!(
        "Merged road batch: {} of {} features inserted, graph now {} segments",
        report.segments_inserted, report.features_read, report.segment_count
    );
    Ok(Json(report))
}
