use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use geojson::FeatureCollection;
use saferoute_core::transit::splice_itineraries;
use saferoute_core::{Itinerary, TransitQuery};
use serde::Serialize;
use tracing::debug;

use super::RouteRequestBody;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ItinerarySummary {
    total_time: u32,
    total_distance: f64,
    payment: u32,
    synthetic: bool,
    geojson: FeatureCollection,
}

impl ItinerarySummary {
    fn from_itinerary(itinerary: &Itinerary) -> Result<Self, ApiError> {
        Ok(Self {
            total_time: itinerary.total_time,
            total_distance: itinerary.total_distance,
            payment: itinerary.payment,
            synthetic: itinerary.synthetic,
            geojson: itinerary.to_geojson()?,
        })
    }
}

#[derive(Serialize)]
pub struct ItineraryResponse {
    itineraries: Vec<ItinerarySummary>,
}

/// Transit itineraries with safety-aware walking legs.
///
/// Starting a newer itinerary request makes this one stale; a stale request
/// answers 409 instead of its result.
pub async fn itinerary_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RouteRequestBody>,
) -> Result<Json<ItineraryResponse>, ApiError> {
    let (start, end) = body.endpoints()?;
    let weights = body.weights(&state.config.safety.weights)?;
    let query = TransitQuery::new(start, end);
    // Rejected requests must not supersede valid ones
    let ticket = state.tracker.begin();

    let itineraries = state
        .transit
        .itineraries_or_fallback(&query, &state.config.safety.fallback)
        .await;
    if !state.tracker.is_current(&ticket) {
        debug!("Dropping itinerary request {}", ticket.generation());
        return Err(ApiError::Superseded);
    }

    let graph = state.store.snapshot();
    let cost = state.config.safety.cost.clone();
    let spliced = tokio::task::spawn_blocking(move || {
        splice_itineraries(itineraries, &graph, &weights, &cost)
    })
    .await?;
    if !state.tracker.is_current(&ticket) {
        debug!("Dropping itinerary request {}", ticket.generation());
        return Err(ApiError::Superseded);
    }

    let itineraries = spliced
        .iter()
        .map(ItinerarySummary::from_itinerary)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ItineraryResponse { itineraries }))
}
