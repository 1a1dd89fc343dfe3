use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use itertools::Itertools;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::state::State;
use crate::model::StreetGraph;
use crate::routing::{WalkingPath, Weighting};
use crate::Cost;

/// Dijkstra's algorithm for a single source and target in the walking network.
///
/// Returns the traversed geometry from `start` to `target`, each edge
/// contributing its coordinates in travel direction. An unreachable target
/// yields an empty path. Identical inputs always produce identical output.
pub fn shortest_path<W: Weighting>(
    graph: &StreetGraph,
    weighting: &W,
    start: NodeIndex,
    target: NodeIndex,
) -> WalkingPath {
    let (Some(start_node), Some(_)) = (graph.node(start), graph.node(target)) else {
        log::debug!("Shortest path requested for unknown nodes {start:?} -> {target:?}");
        return WalkingPath::empty();
    };

    if start == target {
        return WalkingPath::new(vec![start_node.geometry.into()], Vec::new(), 0.0, 0.0);
    }

    let node_count = graph.node_count();
    let mut distances: Vec<Cost> = vec![Cost::INFINITY; node_count];
    let mut predecessors: Vec<Option<EdgeIndex>> = vec![None; node_count];
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::with_capacity(node_count.min(1000) / 4);

    // Start node has distance 0
    distances[start.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: start,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if settled.put(node.index()) {
            continue;
        }

        // Check if we've reached the target
        if node == target {
            break;
        }

        // Examine neighbors
        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let next_cost = cost + weighting.edge_cost(edge.weight());
            if next_cost < distances[next.index()] {
                distances[next.index()] = next_cost;
                predecessors[next.index()] = Some(edge.id());
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    if !distances[target.index()].is_finite() {
        return WalkingPath::empty();
    }

    // Follow predecessors backward from target to start
    let mut edge_path = Vec::new();
    let mut current = target;
    while current != start {
        let Some(edge) = predecessors[current.index()] else {
            return WalkingPath::empty();
        };
        edge_path.push(edge);
        current = match graph.graph.edge_endpoints(edge) {
            Some((source, _)) => source,
            None => return WalkingPath::empty(),
        };
    }
    edge_path.reverse();

    let edges: Vec<_> = edge_path
        .iter()
        .filter_map(|&edge| graph.graph.edge_weight(edge))
        .collect();

    let coords = edges
        .iter()
        .flat_map(|edge| edge.geometry.0.iter().copied())
        .dedup()
        .collect();
    let link_ids = edges.iter().map(|edge| edge.link_id.clone()).collect();
    let length = edges.iter().map(|edge| edge.length).sum();

    WalkingPath::new(coords, link_ids, distances[target.index()], length)
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;
    use crate::config::{CostConfig, SafetyConfig};
    use crate::loading::{RoadFeature, build_street_graph};
    use crate::routing::{SafetyWeighting, WeightVector};

    fn road(link: &str, from: &str, to: &str, length: f64, coords: &[(f64, f64)]) -> RoadFeature {
        RoadFeature {
            link_id: Some(link.to_string()),
            from_node: Some(from.to_string()),
            to_node: Some(to.to_string()),
            length: Some(length),
            geometry: coords.iter().map(|&(x, y)| Coord { x, y }).collect(),
            ..RoadFeature::default()
        }
    }

    fn triangle(ac_length: f64) -> StreetGraph {
        let batch = vec![
            road("ab", "A", "B", 5.0, &[(0.0, 0.0), (1.0, 1.0)]),
            road("bc", "B", "C", 5.0, &[(1.0, 1.0), (2.0, 0.0)]),
            road("ac", "A", "C", ac_length, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]),
        ];
        build_street_graph([batch], &SafetyConfig::default()).0
    }

    fn solve(graph: &StreetGraph, weights: WeightVector, from: &str, to: &str) -> WalkingPath {
        let config = CostConfig::default();
        shortest_path(
            graph,
            &SafetyWeighting::new(weights, &config),
            graph.node_index(from).unwrap(),
            graph.node_index(to).unwrap(),
        )
    }

    #[test]
    fn triangle_prefers_shorter_direct_edge() {
        let graph = triangle(7.0);
        let path = solve(&graph, WeightVector::ZERO, "A", "C");
        assert_eq!(path.link_ids(), ["ac"]);
        assert_eq!(path.length(), 7.0);
        assert_eq!(
            path.coords(),
            [
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 1.0, y: 0.0 },
                Coord { x: 2.0, y: 0.0 }
            ]
        );
    }

    #[test]
    fn triangle_takes_detour_when_shorter() {
        let graph = triangle(12.0);
        let path = solve(&graph, WeightVector::ZERO, "A", "C");
        assert_eq!(path.link_ids(), ["ab", "bc"]);
        assert_eq!(path.length(), 10.0);
        // shared vertex at B appears once
        assert_eq!(path.coords().len(), 3);
    }

    #[test]
    fn geometry_follows_travel_direction() {
        let graph = triangle(7.0);
        let path = solve(&graph, WeightVector::ZERO, "C", "A");
        assert_eq!(path.coords().first(), Some(&Coord { x: 2.0, y: 0.0 }));
        assert_eq!(path.coords().last(), Some(&Coord { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn disconnected_target_gives_empty_path() {
        let batch = vec![
            road("ab", "A", "B", 5.0, &[(0.0, 0.0), (1.0, 0.0)]),
            road("cd", "C", "D", 5.0, &[(5.0, 5.0), (6.0, 5.0)]),
        ];
        let (graph, _) = build_street_graph([batch], &SafetyConfig::default());
        assert!(solve(&graph, WeightVector::ZERO, "A", "D").is_empty());
        assert!(!solve(&graph, WeightVector::ZERO, "C", "D").is_empty());
    }

    #[test]
    fn same_start_and_target_is_a_single_point() {
        let graph = triangle(7.0);
        let path = solve(&graph, WeightVector::ZERO, "B", "B");
        assert_eq!(path.coords(), [Coord { x: 1.0, y: 1.0 }]);
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn safety_weights_can_prefer_a_longer_street() {
        let mut lit = road("lit", "A", "C", 150.0, &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        lit.surveillance = Some(4);
        lit.lighting = Some(6);
        let mut dark = road("dark", "A", "B", 60.0, &[(0.0, 0.0), (1.0, 0.0)]);
        dark.width = Some(3.0);
        let mut dark2 = road("dark2", "B", "C", 60.0, &[(1.0, 0.0), (1.0, 1.0)]);
        dark2.width = Some(3.0);
        let (graph, _) = build_street_graph([vec![lit, dark, dark2]], &SafetyConfig::default());

        let fast = solve(&graph, WeightVector::ZERO, "A", "C");
        assert_eq!(fast.link_ids(), ["dark", "dark2"]);

        let safe = solve(&graph, WeightVector::new(7.5, 4.5, 6.0), "A", "C");
        assert_eq!(safe.link_ids(), ["lit"]);
    }

    #[test]
    fn zero_weights_match_minimum_length_on_a_grid() {
        // 4x4 grid with irregular lengths, every row and column connected
        let mut batch = Vec::new();
        for row in 0..4 {
            for col in 0..4 {
                let id = |r: i32, c: i32| format!("{r}-{c}");
                let here = (f64::from(col), f64::from(row));
                if col < 3 {
                    let len = f64::from(((row * 7 + col * 3) % 5) + 1) * 10.0;
                    batch.push(road(
                        &format!("h{row}{col}"),
                        &id(row, col),
                        &id(row, col + 1),
                        len,
                        &[here, (here.0 + 1.0, here.1)],
                    ));
                }
                if row < 3 {
                    let len = f64::from(((row * 5 + col * 11) % 4) + 1) * 10.0;
                    batch.push(road(
                        &format!("v{row}{col}"),
                        &id(row, col),
                        &id(row + 1, col),
                        len,
                        &[here, (here.0, here.1 + 1.0)],
                    ));
                }
            }
        }
        let (graph, _) = build_street_graph([batch], &SafetyConfig::default());
        let path = solve(&graph, WeightVector::ZERO, "0-0", "3-3");
        let reference = petgraph::algo::dijkstra(
            &graph.graph,
            graph.node_index("0-0").unwrap(),
            graph.node_index("3-3"),
            |edge| edge.weight().length,
        );
        let expected = reference[&graph.node_index("3-3").unwrap()];
        assert!((path.length() - expected).abs() < 1e-9);
        assert!((path.cost() - expected).abs() < 1e-9);
    }

    #[test]
    fn deterministic_output() {
        let graph = triangle(10.0);
        let weights = WeightVector::new(0.6, 4.5, 6.0);
        let first = solve(&graph, weights, "A", "C");
        for _ in 0..10 {
            assert_eq!(solve(&graph, weights, "A", "C"), first);
        }
    }
}
