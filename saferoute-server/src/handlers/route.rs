use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use geo::Coord;
use geojson::Feature;
use saferoute_core::config::WeightConfig;
use saferoute_core::routing::{Preferences, RouteMode, WeightVector, compute_weights, current_hour};
use saferoute_core::{Cost, find_walking_path};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RouteRequestBody {
    /// `[longitude, latitude]`
    pub start: [f64; 2],
    pub end: [f64; 2],
    #[serde(default)]
    pub mode: RouteMode,
    #[serde(default)]
    pub preferences: Preferences,
    /// Hour of day used for the lighting weight, local time when absent
    pub hour: Option<u32>,
}

impl RouteRequestBody {
    pub fn endpoints(&self) -> Result<(Coord<f64>, Coord<f64>), ApiError> {
        Ok((to_coord(self.start)?, to_coord(self.end)?))
    }

    pub fn weights(&self, config: &WeightConfig) -> Result<WeightVector, ApiError> {
        let hour = resolve_hour(self.hour)?;
        Ok(compute_weights(self.preferences, hour, self.mode, config))
    }
}

pub(crate) fn resolve_hour(hour: Option<u32>) -> Result<u32, ApiError> {
    match hour {
        Some(hour) if hour > 23 => Err(ApiError::BadRequest(format!(
            "hour must be within 0-23, got {hour}"
        ))),
        Some(hour) => Ok(hour),
        None => Ok(current_hour()),
    }
}

fn to_coord([lon, lat]: [f64; 2]) -> Result<Coord<f64>, ApiError> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(ApiError::BadRequest(format!(
            "invalid coordinate [{lon}, {lat}]"
        )));
    }
    Ok(Coord { x: lon, y: lat })
}

#[derive(Serialize)]
pub struct RouteResponse {
    found: bool,
    cost: Cost,
    length: f64,
    weights: WeightVector,
    path: Feature,
}

pub async fn route_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RouteRequestBody>,
) -> Result<Json<RouteResponse>, ApiError> {
    let (start, end) = body.endpoints()?;
    let weights = body.weights(&state.config.safety.weights)?;
    let graph = state.store.snapshot();

    let path = tokio::task::spawn_blocking(move || {
        find_walking_path(&graph, start, end, &weights, &state.config.safety.cost)
    })
    .await?;

    Ok(Json(RouteResponse {
        found: !path.is_empty(),
        cost: path.cost(),
        length: path.length(),
        weights,
        path: path.to_feature(),
    }))
}
