//! Snapping of arbitrary coordinates to street nodes.
//!
//! Distances are planar, measured directly in degrees. This is an accepted
//! approximation at city scale.

use geo::{Coord, CoordsIter};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::network::StreetGraph;

fn planar_distance_2(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

impl StreetGraph {
    /// Finds the node owning the edge vertex closest to `query`.
    ///
    /// The vertex belongs to a segment with two endpoints; the endpoint whose
    /// own position is closer to the query wins, ties going to the lower
    /// index. Returns `None` only when the graph has no edges.
    pub fn nearest_node(&self, query: Coord<f64>) -> Option<NodeIndex> {
        let vertex = self.rtree_ref().nearest_neighbor(&[query.x, query.y])?;
        let (a, b) = vertex.data;
        Some(self.closer_endpoint(query, a, b))
    }

    /// Reference implementation scanning every vertex of every edge.
    /// Quadratic; used to cross-check the index.
    pub fn nearest_node_scan(&self, query: Coord<f64>) -> Option<NodeIndex> {
        let mut best: Option<(f64, NodeIndex, NodeIndex)> = None;
        for edge in self.graph.edge_references() {
            if edge.source() > edge.target() {
                continue;
            }
            for coord in edge.weight().geometry.coords_iter() {
                let distance = planar_distance_2(query, coord);
                if best.is_none_or(|(min, _, _)| distance < min) {
                    best = Some((distance, edge.source(), edge.target()));
                }
            }
        }
        best.map(|(_, a, b)| self.closer_endpoint(query, a, b))
    }

    fn closer_endpoint(&self, query: Coord<f64>, a: NodeIndex, b: NodeIndex) -> NodeIndex {
        let distance_to = |node: NodeIndex| {
            self.node(node)
                .map_or(f64::INFINITY, |n| planar_distance_2(query, n.geometry.into()))
        };
        let (da, db) = (distance_to(a), distance_to(b));
        if db < da || (db == da && b < a) { b } else { a }
    }
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

    fn network() -> StreetGraph {
        let batch = vec![
            road("a", "1", "2", &[(0.0, 0.0), (0.4, 0.1), (1.0, 0.0)]),
            road("b", "2", "3", &[(1.0, 0.0), (1.2, 0.7), (1.0, 1.0)]),
            road("c", "3", "4", &[(1.0, 1.0), (0.0, 1.0)]),
            road("d", "5", "6", &[(3.0, 3.0), (3.3, 3.1), (4.0, 3.0)]),
        ];
        build_street_graph([batch], &SafetyConfig::default()).0
    }

    #[test]
    fn empty_graph_has_no_nearest_node() {
        let graph = StreetGraph::new();
        assert_eq!(graph.nearest_node(Coord { x: 0.0, y: 0.0 }), None);
        assert_eq!(graph.nearest_node_scan(Coord { x: 0.0, y: 0.0 }), None);
    }

    #[test]
    fn non_empty_graph_always_resolves() {
        let graph = network();
        let far = Coord { x: -500.0, y: 80.0 };
        assert!(graph.nearest_node(far).is_some());
    }

    #[test]
    fn vertex_snaps_to_closer_endpoint() {
        let graph = network();
        // closest vertex is the interior (1.2, 0.7) of segment 2-3, node 3 is nearer
        let node = graph.nearest_node(Coord { x: 1.25, y: 0.75 }).unwrap();
        assert_eq!(graph.node(node).unwrap().id, "3");
        // interior (3.3, 3.1) of segment 5-6, node 5 is nearer
        let node = graph.nearest_node(Coord { x: 3.3, y: 3.15 }).unwrap();
        assert_eq!(graph.node(node).unwrap().id, "5");
    }

    #[test]
    fn index_agrees_with_full_scan() {
        let graph = network();
        let queries = [
            (0.1, 0.05),
            (0.45, 0.2),
            (0.9, -0.3),
            (1.3, 0.6),
            (0.6, 1.1),
            (2.9, 2.8),
            (3.9, 3.2),
            (2.2, 2.1),
        ];
        for (x, y) in queries {
            let query = Coord { x, y };
            assert_eq!(
                graph.nearest_node(query),
                graph.nearest_node_scan(query),
                "query {query:?}"
            );
        }
    }
}
