use log::debug;
use rayon::prelude::*;

use super::itinerary::Itinerary;
use crate::config::CostConfig;
use crate::model::StreetGraph;
use crate::routing::{WeightVector, find_walking_path};

/// Attaches a safety-aware walking path to every walking segment.
///
/// Vehicle segments are left as they are. A walking segment for which no
/// path exists keeps `safe_path == None`, so consumers draw its straight
/// line instead.
pub fn splice_itinerary(
    mut itinerary: Itinerary,
    graph: &StreetGraph,
    weights: &WeightVector,
    config: &CostConfig,
) -> Itinerary {
    itinerary
        .segments
        .par_iter_mut()
        .filter(|segment| segment.mode.is_walking())
        .for_each(|segment| {
            let path = find_walking_path(graph, segment.start, segment.end, weights, config);
            if path.is_empty() {
                debug!(
                    "Walking segment {:?} -> {:?} keeps its straight line",
                    segment.start, segment.end
                );
                segment.safe_path = None;
            } else {
                segment.safe_path = Some(path);
            }
        });
    itinerary
}

pub fn splice_itineraries(
    itineraries: Vec<Itinerary>,
    graph: &StreetGraph,
    weights: &WeightVector,
    config: &CostConfig,
) -> Vec<Itinerary> {
    itineraries
        .into_iter()
        .map(|itinerary| splice_itinerary(itinerary, graph, weights, config))
        .collect()
}
