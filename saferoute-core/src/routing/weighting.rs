use crate::Cost;
use crate::config::CostConfig;
use crate::model::StreetEdge;

use super::weights::WeightVector;

/// Edge weight used by the shortest-path search. Implementations must
/// return strictly positive costs.
pub trait Weighting {
    fn edge_cost(&self, edge: &StreetEdge) -> Cost;
}

/// Cost of traversing `edge` under `weights`.
///
/// Surveillance and lighting reduce the cost of a segment, blind spots
/// increase it. The result never drops below `config.min_cost`, which keeps
/// every edge weight positive for Dijkstra.
pub fn edge_cost(edge: &StreetEdge, weights: &WeightVector, config: &CostConfig) -> Cost {
    let raw = edge.length
        - f64::from(edge.surveillance) * weights.cctv * config.cctv_factor
        - f64::from(edge.lighting) * weights.light * config.light_factor
        + edge.blind_score * weights.blind * config.blind_factor;

    raw.max(config.min_cost.max(f64::EPSILON))
}

/// [`edge_cost`] bound to one request's weight vector
#[derive(Debug, Clone, Copy)]
pub struct SafetyWeighting<'a> {
    weights: WeightVector,
    config: &'a CostConfig,
}

impl<'a> SafetyWeighting<'a> {
    pub fn new(weights: WeightVector, config: &'a CostConfig) -> Self {
        Self { weights, config }
    }

    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }
}

impl Weighting for SafetyWeighting<'_> {
    fn edge_cost(&self, edge: &StreetEdge) -> Cost {
        edge_cost(edge, &self.weights, self.config)
    }
}
