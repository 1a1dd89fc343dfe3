//! Per-street safety classification for map display.
//!
//! The display score is separate from the routing cost: it rewards lamps and
//! cameras and penalizes dark and blind streets, then buckets the result.
//! Only scores reported by the feed are penalized; a street without one is
//! not charged the blind score derived at ingestion.

use geo::{Intersects, Rect};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, json};

use crate::config::OverlayConfig;
use crate::model::{StreetEdge, StreetGraph};
use crate::routing::WeightVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    High,
    Medium,
    Low,
}

impl SafetyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SafetyLevel::High => "high",
            SafetyLevel::Medium => "medium",
            SafetyLevel::Low => "low",
        }
    }
}

/// Display score of one street under the given weights
pub fn safety_score(edge: &StreetEdge, weights: &WeightVector, config: &OverlayConfig) -> f64 {
    f64::from(edge.lighting) * weights.light + f64::from(edge.surveillance) * weights.cctv
        - edge.dark_score * weights.light * config.dark_factor
        - edge.feed_blind_score.unwrap_or(0.0) * weights.blind * config.blind_factor
}

pub fn classify(score: f64, config: &OverlayConfig) -> SafetyLevel {
    if score > config.high_threshold {
        SafetyLevel::High
    } else if score > config.medium_threshold {
        SafetyLevel::Medium
    } else {
        SafetyLevel::Low
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayEdge<'a> {
    pub edge: &'a StreetEdge,
    pub score: f64,
    pub level: SafetyLevel,
}

/// Classifies every street once, skipping the mirrored direction. With a
/// bounding box only streets touching it are kept.
pub fn classify_edges<'a>(
    graph: &'a StreetGraph,
    weights: &WeightVector,
    config: &OverlayConfig,
    bounds: Option<Rect<f64>>,
) -> Vec<OverlayEdge<'a>> {
    graph
        .graph
        .edge_references()
        .filter(|edge| edge.source() < edge.target())
        .map(|edge| edge.weight())
        .filter(|edge| bounds.is_none_or(|rect| rect.intersects(&edge.geometry)))
        .map(|edge| {
            let score = safety_score(edge, weights, config);
            OverlayEdge {
                edge,
                score,
                level: classify(score, config),
            }
        })
        .collect()
}

/// `GeoJSON` overlay, one `LineString` feature per street
pub fn overlay_geojson(
    graph: &StreetGraph,
    weights: &WeightVector,
    config: &OverlayConfig,
    bounds: Option<Rect<f64>>,
) -> FeatureCollection {
    let features = classify_edges(graph, weights, config, bounds)
        .into_iter()
        .map(|item| {
            let mut properties = Map::new();
            properties.insert("link_id".to_string(), json!(item.edge.link_id));
            properties.insert("level".to_string(), json!(item.level.as_str()));
            properties.insert("score".to_string(), json!(item.score));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(GeoJsonValue::from(&item.edge.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}
