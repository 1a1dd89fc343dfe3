use geo::LineString;
use log::{debug, info, warn};
use serde::Serialize;

use super::raw_types::RoadFeature;
use crate::config::{BlindScoreConfig, SafetyConfig};
use crate::model::{StreetEdge, StreetGraph};

/// Summary of one ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub features_read: usize,
    pub segments_inserted: usize,
    /// Features for which at least one endpoint identifier was synthesized.
    /// Such endpoints never connect to other features.
    pub synthesized_endpoints: usize,
    pub rejected: usize,
    pub node_count: usize,
    pub segment_count: usize,
    pub components: usize,
}

impl IngestReport {
    fn absorb(&mut self, other: &IngestReport) {
        self.features_read += other.features_read;
        self.segments_inserted += other.segments_inserted;
        self.synthesized_endpoints += other.synthesized_endpoints;
        self.rejected += other.rejected;
        self.node_count = other.node_count;
        self.segment_count = other.segment_count;
        self.components = other.components;
    }
}

/// Blind score of a segment without an explicit one.
///
/// Penalties for missing surveillance, missing lighting and narrowness are
/// summed; wide roads override the sum to zero.
pub fn derive_blind_score(
    surveillance: u32,
    lighting: u32,
    width: f64,
    config: &BlindScoreConfig,
) -> f64 {
    let mut score = 0.0;
    if surveillance == 0 {
        score += config.no_cctv_penalty;
    }
    if lighting == 0 {
        score += config.no_light_penalty;
    }
    if width < config.narrow_width {
        score += config.narrow_penalty;
    }
    if width >= config.wide_width {
        score = 0.0;
    }
    score
}

/// Builds a new street graph from one or more batches
pub fn build_street_graph<I>(batches: I, config: &SafetyConfig) -> (StreetGraph, IngestReport)
where
    I: IntoIterator<Item = Vec<RoadFeature>>,
{
    let mut graph = StreetGraph::new();
    let mut report = IngestReport::default();
    for batch in batches {
        let batch_report = ingest_features(&mut graph, batch, config);
        report.absorb(&batch_report);
    }
    (graph, report)
}

/// Merges a batch of road features into `graph`.
///
/// Merging is append-only: nodes and segments are never removed, a segment
/// between an already connected pair of nodes replaces the attributes of the
/// previous one. The spatial index is rebuilt before returning.
pub fn ingest_features(
    graph: &mut StreetGraph,
    features: Vec<RoadFeature>,
    config: &SafetyConfig,
) -> IngestReport {
    let batch = graph.next_batch();
    let mut report = IngestReport {
        features_read: features.len(),
        ..IngestReport::default()
    };

    for (idx, feature) in features.into_iter().enumerate() {
        let (Some(&first), Some(&last)) = (feature.geometry.first(), feature.geometry.last())
        else {
            report.rejected += 1;
            continue;
        };
        if feature.geometry.len() < 2 {
            debug!("Rejecting feature {idx} of batch {batch}: single-vertex geometry");
            report.rejected += 1;
            continue;
        }
        if config.ingest.require_node_ids && !feature.has_node_ids() {
            report.rejected += 1;
            continue;
        }

        let link_id = feature
            .link_id
            .clone()
            .unwrap_or_else(|| format!("batch{batch}-{idx}"));
        if !feature.has_node_ids() {
            report.synthesized_endpoints += 1;
        }
        let from_id = feature
            .from_node
            .clone()
            .unwrap_or_else(|| format!("n_{link_id}_s"));
        let to_id = feature
            .to_node
            .clone()
            .unwrap_or_else(|| format!("n_{link_id}_e"));

        if from_id == to_id {
            debug!("Rejecting loop segment {link_id} at node {from_id}");
            report.rejected += 1;
            continue;
        }

        let from = graph.ensure_node(&from_id, first);
        let to = graph.ensure_node(&to_id, last);
        graph.insert_segment(from, to, street_edge(link_id, feature, config));
        report.segments_inserted += 1;
    }

    graph.rebuild_index();

    report.node_count = graph.node_count();
    report.segment_count = graph.segment_count();
    report.components = graph.connected_components();

    if config.ingest.require_node_ids && report.rejected > 0 {
        warn!(
            "{} road features rejected: missing explicit node identifiers or invalid geometry",
            report.rejected
        );
    }
    if report.synthesized_endpoints > 0 {
        warn!(
            "{} of {} road features lack explicit node identifiers. Their endpoints \
        were synthesized and do not connect to neighbouring roads.",
            report.synthesized_endpoints, report.features_read
        );
    }
    if report.components > 1 {
        warn!(
            "Street graph has {} disconnected components; routes between them are impossible",
            report.components
        );
    }
    info!(
        "Ingested batch {batch}: {} segments inserted, graph has {} nodes and {} segments",
        report.segments_inserted, report.node_count, report.segment_count
    );

    report
}

fn street_edge(link_id: String, feature: RoadFeature, config: &SafetyConfig) -> StreetEdge {
    let width = feature.width.unwrap_or(config.defaults.width);
    let surveillance = feature.surveillance.unwrap_or(0);
    let lighting = feature.lighting.unwrap_or(0);
    // An explicit zero is kept as supplied rather than re-derived
    let blind_score = feature
        .blind_score
        .unwrap_or_else(|| derive_blind_score(surveillance, lighting, width, &config.blind_score));

    StreetEdge {
        link_id,
        length: feature.length.unwrap_or(config.defaults.length),
        lighting,
        surveillance,
        width,
        blind_score,
        feed_blind_score: feature.blind_score,
        dark_score: feature.dark_score.unwrap_or(0.0),
        geometry: LineString::new(feature.geometry),
    }
}
