//! Shared street graph with atomic snapshot replacement.
//!
//! Readers take an `Arc` snapshot and keep using it for the whole request.
//! Writers are serialized, build the next graph off to the side and publish
//! it with a single pointer swap, so a partially merged graph is never
//! observable.

use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, RwLock};

use crate::config::SafetyConfig;
use crate::loading::{IngestReport, RoadFeature, ingest_features};
use crate::model::StreetGraph;

#[derive(Debug, Default)]
pub struct GraphStore {
    current: RwLock<Arc<StreetGraph>>,
    writer: Mutex<()>,
}

impl GraphStore {
    pub fn new(graph: StreetGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
            writer: Mutex::new(()),
        }
    }

    /// Immutable view of the graph as of now
    pub fn snapshot(&self) -> Arc<StreetGraph> {
        Arc::clone(&self.current.read())
    }

    /// Merges a batch into a copy of the current graph and publishes it
    pub fn merge(&self, batch: Vec<RoadFeature>, config: &SafetyConfig) -> IngestReport {
        let _writer = self.writer.lock();
        let mut next = StreetGraph::clone(&self.snapshot());
        let report = ingest_features(&mut next, batch, config);
        *self.current.write() = Arc::new(next);
        report
    }

    /// Publishes a freshly built graph, discarding the current one
    pub fn replace(&self, graph: StreetGraph) {
        let _writer = self.writer.lock();
        info!(
            "Replacing street graph: {} nodes, {} segments",
            graph.node_count(),
            graph.segment_count()
        );
        *self.current.write() = Arc::new(graph);
    }
}

#[cfg(test)]
mod tests {
    use geo::Coord;

    use super::*;

    fn road(link: String, from: String, to: String, x: f64) -> RoadFeature {
        RoadFeature {
            link_id: Some(link),
            from_node: Some(from),
            to_node: Some(to),
            geometry: vec![Coord { x, y: 0.0 }, Coord { x: x + 1.0, y: 0.0 }],
            ..RoadFeature::default()
        }
    }

    #[test]
    fn snapshots_are_unaffected_by_later_merges() {
        let store = GraphStore::default();
        let config = SafetyConfig::default();
        let before = store.snapshot();

        store.merge(
            vec![road("a".into(), "1".into(), "2".into(), 0.0)],
            &config,
        );

        assert!(before.is_empty());
        assert_eq!(store.snapshot().segment_count(), 1);
        assert!(store.snapshot().nearest_node(Coord { x: 0.0, y: 0.0 }).is_some());
    }

    #[test]
    fn concurrent_merges_lose_no_updates() {
        let store = GraphStore::default();
        let config = SafetyConfig::default();

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let store = &store;
                let config = &config;
                scope.spawn(move || {
                    for i in 0..5 {
                        let n = worker * 100 + i;
                        store.merge(
                            vec![road(
                                format!("l{n}"),
                                format!("n{n}"),
                                format!("n{}", n + 1),
                                f64::from(n),
                            )],
                            config,
                        );
                    }
                });
            }
        });

        assert_eq!(store.snapshot().segment_count(), 40);
    }

    #[test]
    fn replace_swaps_whole_graph() {
        let store = GraphStore::default();
        let config = SafetyConfig::default();
        store.merge(
            vec![road("a".into(), "1".into(), "2".into(), 0.0)],
            &config,
        );
        store.replace(StreetGraph::new());
        assert!(store.snapshot().is_empty());
    }
}
