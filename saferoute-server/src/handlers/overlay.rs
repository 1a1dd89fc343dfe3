use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use geo::{Coord, Rect};
use geojson::FeatureCollection;
use saferoute_core::overlay::overlay_geojson;
use saferoute_core::routing::{Preferences, RouteMode, compute_weights};
use serde::Deserialize;

use super::route::resolve_hour;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct OverlayParams {
    min_lon: Option<f64>,
    min_lat: Option<f64>,
    max_lon: Option<f64>,
    max_lat: Option<f64>,
    hour: Option<u32>,
    cctv: Option<u8>,
    blind: Option<u8>,
}

impl OverlayParams {
    fn bounds(&self) -> Result<Option<Rect<f64>>, ApiError> {
        match (self.min_lon, self.min_lat, self.max_lon, self.max_lat) {
            (None, None, None, None) => Ok(None),
            (Some(min_lon), Some(min_lat), Some(max_lon), Some(max_lat)) => Ok(Some(Rect::new(
                Coord { x: min_lon, y: min_lat },
                Coord { x: max_lon, y: max_lat },
            ))),
            _ => Err(ApiError::BadRequest(
                "bounding box needs all of min_lon, min_lat, max_lon, max_lat".to_string(),
            )),
        }
    }

    fn preferences(&self) -> Preferences {
        let defaults = Preferences::default();
        Preferences {
            cctv: self.cctv.unwrap_or(defaults.cctv),
            blind: self.blind.unwrap_or(defaults.blind),
        }
    }
}

pub async fn overlay_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OverlayParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let bounds = params.bounds()?;
    let hour = resolve_hour(params.hour)?;
    let weights = compute_weights(
        params.preferences(),
        hour,
        RouteMode::Safe,
        &state.config.safety.weights,
    );

    let graph = state.store.snapshot();
    let overlay = tokio::task::spawn_blocking(move || {
        overlay_geojson(&graph, &weights, &state.config.safety.overlay, bounds)
    })
    .await?;
    Ok(Json(overlay))
}
