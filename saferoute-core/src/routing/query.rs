use geo::Coord;
use log::debug;

use super::{SafetyWeighting, WalkingPath, WeightVector, shortest_path};
use crate::config::CostConfig;
use crate::model::StreetGraph;

/// Walking route between two arbitrary coordinates.
///
/// Both coordinates are snapped to their nearest street node first. An empty
/// graph, or endpoints in different components, give an empty path.
pub fn find_walking_path(
    graph: &StreetGraph,
    start: Coord<f64>,
    end: Coord<f64>,
    weights: &WeightVector,
    config: &CostConfig,
) -> WalkingPath {
    let (Some(source), Some(target)) = (graph.nearest_node(start), graph.nearest_node(end)) else {
        debug!("Cannot snap route endpoints: street graph is empty");
        return WalkingPath::empty();
    };

    let path = shortest_path(graph, &SafetyWeighting::new(*weights, config), source, target);
    if path.is_empty() {
        debug!("No walking path between {source:?} and {target:?}");
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SafetyConfig;
    use crate::loading::{RoadFeature, build_street_graph};

    fn road(link: &str, from: &str, to: &str, coords: &[(f64, f64)]) -> RoadFeature {
        RoadFeature {
            link_id: Some(link.to_string()),
            from_node: Some(from.to_string()),
            to_node: Some(to.to_string()),
            geometry: coords.iter().map(|&(x, y)| Coord { x, y }).collect(),
            ..RoadFeature::default()
        }
    }

    #[test]
    fn empty_graph_means_no_route() {
        let path = find_walking_path(
            &StreetGraph::new(),
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            &WeightVector::ZERO,
            &CostConfig::default(),
        );
        assert!(path.is_empty());
    }

    #[test]
    fn snaps_to_nearest_nodes() {
        let batch = vec![
            road("a", "1", "2", &[(127.000, 37.500), (127.001, 37.500)]),
            road("b", "2", "3", &[(127.001, 37.500), (127.002, 37.500)]),
        ];
        let (graph, _) = build_street_graph([batch], &SafetyConfig::default());
        let path = find_walking_path(
            &graph,
            Coord { x: 126.9999, y: 37.5001 },
            Coord { x: 127.0021, y: 37.4999 },
            &WeightVector::ZERO,
            &CostConfig::default(),
        );
        assert_eq!(path.link_ids(), ["a", "b"]);
    }
}
