use geo::{Coord, CoordsIter, Point};
use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::components::{StreetEdge, StreetNode};

/// Edge vertex tagged with the two endpoints of the segment it belongs to
pub type IndexedPoint = GeomWithData<[f64; 2], (NodeIndex, NodeIndex)>;

/// Street network graph
///
/// Undirected in effect: every segment exists in both directions with
/// mirrored attributes. Instances are built by the loading module and shared
/// read-only once indexed.
#[derive(Debug, Clone, Default)]
pub struct StreetGraph {
    pub graph: DiGraph<StreetNode, StreetEdge>,
    node_lookup: HashMap<String, NodeIndex>,
    rtree: RTree<IndexedPoint>,
    batches_merged: usize,
}

impl StreetGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edges, twice the number of road segments
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn segment_count(&self) -> usize {
        self.graph.edge_count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    pub fn node(&self, node: NodeIndex) -> Option<&StreetNode> {
        self.graph.node_weight(node)
    }

    pub fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<&StreetEdge> {
        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
    }

    /// Outgoing edges of a node
    pub fn edges(&self, node: NodeIndex) -> impl Iterator<Item = EdgeReference<'_, StreetEdge>> {
        self.graph.edges(node)
    }

    /// Sequence number for the next ingested batch
    pub(crate) fn next_batch(&mut self) -> usize {
        self.batches_merged += 1;
        self.batches_merged
    }

    pub(crate) fn rtree_ref(&self) -> &RTree<IndexedPoint> {
        &self.rtree
    }

    /// Returns the node registered under `id`, creating it at `position`
    /// when missing. Existing nodes keep their first known position.
    pub(crate) fn ensure_node(&mut self, id: &str, position: Coord<f64>) -> NodeIndex {
        if let Some(&node) = self.node_lookup.get(id) {
            return node;
        }
        let node = self.graph.add_node(StreetNode {
            id: id.to_string(),
            geometry: Point::from(position),
        });
        self.node_lookup.insert(id.to_string(), node);
        node
    }

    /// Inserts a segment in both directions. `edge.geometry` must be oriented
    /// from `from` to `to`. A segment already present between the same pair
    /// of nodes is overwritten in both directions at once.
    pub(crate) fn insert_segment(&mut self, from: NodeIndex, to: NodeIndex, edge: StreetEdge) {
        let reversed = edge.reversed();
        self.graph.update_edge(from, to, edge);
        self.graph.update_edge(to, from, reversed);
    }

    /// Rebuilds the vertex index used for snapping. Must be called after the
    /// last insertion and before the graph is shared.
    pub(crate) fn rebuild_index(&mut self) {
        let points: Vec<IndexedPoint> = self
            .graph
            .edge_references()
            .filter(|edge| edge.source() <= edge.target())
            .flat_map(|edge| {
                let endpoints = (edge.source(), edge.target());
                edge.weight()
                    .geometry
                    .coords_iter()
                    .map(move |coord| IndexedPoint::new([coord.x, coord.y], endpoints))
            })
            .collect();
        self.rtree = RTree::bulk_load(points);
    }

    /// Number of connected components, counting isolated nodes
    pub fn connected_components(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}
