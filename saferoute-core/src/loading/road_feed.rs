//! GeoJSON road feed parsing
//!
//! Road feeds are collections of line features whose properties carry the
//! infrastructure attributes. Property names follow the source data sets,
//! several aliases are accepted for each attribute. Malformed attributes are
//! treated as absent and never reject the feature.

use std::path::Path;

use geo::Coord;
use geojson::{Feature, GeoJson};
use itertools::Itertools;
use log::{debug, info, warn};
use serde_json::{Map, Value as JsonValue};

use super::raw_types::RoadFeature;
use crate::Error;

const LINK_ID_KEYS: &[&str] = &["link_id", "LINK_ID"];
const FROM_NODE_KEYS: &[&str] = &["F_NODE", "f_node", "start_node"];
const TO_NODE_KEYS: &[&str] = &["T_NODE", "t_node", "end_node"];
const LENGTH_KEYS: &[&str] = &["LENGTH", "length", "length_m"];
const WIDTH_KEYS: &[&str] = &["width", "road_width"];
const CCTV_KEYS: &[&str] = &["cctv_cnt"];
const LAMP_KEYS: &[&str] = &["lamp_cnt"];
const DARK_KEYS: &[&str] = &["dark_score"];
const BLIND_KEYS: &[&str] = &["blind_score"];

/// Reads a road feed from a GeoJSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not GeoJSON
pub fn load_road_file(path: &Path) -> Result<Vec<RoadFeature>, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open road feed '{}': {}", path.display(), e),
        )
    })?;
    let features = parse_road_geojson(&text)?;
    info!(
        "Loaded {} road features from {}",
        features.len(),
        path.display()
    );
    Ok(features)
}

/// Parses a `FeatureCollection`, a single `Feature` or a bare JSON array of
/// features into road features. Features without line geometry are skipped.
///
/// # Errors
///
/// Returns an error if the document is not JSON or not a feature container
pub fn parse_road_geojson(text: &str) -> Result<Vec<RoadFeature>, Error> {
    let value: JsonValue = serde_json::from_str(text)?;

    let features: Vec<Feature> = match value {
        JsonValue::Array(items) => items
            .into_iter()
            .filter_map(|item| match Feature::from_json_value(item) {
                Ok(feature) => Some(feature),
                Err(e) => {
                    warn!("Skipping malformed road feature: {e}");
                    None
                }
            })
            .collect(),
        value => match GeoJson::from_json_value(value)? {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(Error::InvalidData(
                    "Road feed must contain features, found a bare geometry".to_string(),
                ));
            }
        },
    };

    let total = features.len();
    let roads: Vec<RoadFeature> = features.into_iter().filter_map(road_from_feature).collect();
    if roads.len() < total {
        debug!(
            "{} of {total} features had no line geometry and were skipped",
            total - roads.len()
        );
    }
    Ok(roads)
}

fn road_from_feature(feature: Feature) -> Option<RoadFeature> {
    let geometry = feature.geometry.and_then(|geometry| {
        geo::Geometry::<f64>::try_from(geometry)
            .map_err(|e| warn!("Skipping road feature with invalid geometry: {e}"))
            .ok()
    })?;

    let vertices: Vec<Coord<f64>> = match geometry {
        geo::Geometry::LineString(line) => line.0,
        geo::Geometry::MultiLineString(lines) => lines
            .0
            .into_iter()
            .flat_map(|line| line.0)
            .dedup()
            .collect(),
        _ => return None,
    };

    let empty = Map::new();
    let props = feature.properties.as_ref().unwrap_or(&empty);

    Some(RoadFeature {
        link_id: lookup(props, LINK_ID_KEYS).and_then(identifier),
        from_node: lookup(props, FROM_NODE_KEYS).and_then(identifier),
        to_node: lookup(props, TO_NODE_KEYS).and_then(identifier),
        length: lookup(props, LENGTH_KEYS)
            .and_then(number)
            .filter(|v| *v > 0.0),
        width: lookup(props, WIDTH_KEYS)
            .and_then(number)
            .filter(|v| *v > 0.0),
        surveillance: lookup(props, CCTV_KEYS).and_then(count),
        lighting: lookup(props, LAMP_KEYS).and_then(count),
        dark_score: lookup(props, DARK_KEYS).and_then(number),
        blind_score: lookup(props, BLIND_KEYS).and_then(number),
        geometry: vertices,
    })
}

/// First non-null value among the aliases of an attribute
fn lookup<'a>(props: &'a Map<String, JsonValue>, keys: &[&str]) -> Option<&'a JsonValue> {
    keys.iter()
        .filter_map(|key| props.get(*key))
        .find(|value| !value.is_null())
}

/// Finite number, possibly encoded as a string
fn number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn count(value: &JsonValue) -> Option<u32> {
    number(value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round().min(f64::from(u32::MAX)) as u32)
}

/// Node and link identifiers are strings in some feeds and integers in others
fn identifier(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collection_with_aliases_and_defaults() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "LineString", "coordinates": [[127.0, 37.5], [127.001, 37.5]]},
                    "properties": {"link_id": 42, "F_NODE": 1001, "T_NODE": "1002",
                                   "LENGTH": 88.5, "road_width": "3.5", "cctv_cnt": 2, "lamp_cnt": null}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [127.0, 37.5]},
                    "properties": {}
                }
            ]
        }"#;

        let roads = parse_road_geojson(text).unwrap();
        assert_eq!(roads.len(), 1);
        let road = &roads[0];
        assert_eq!(road.link_id.as_deref(), Some("42"));
        assert_eq!(road.from_node.as_deref(), Some("1001"));
        assert_eq!(road.to_node.as_deref(), Some("1002"));
        assert_eq!(road.length, Some(88.5));
        assert_eq!(road.width, Some(3.5));
        assert_eq!(road.surveillance, Some(2));
        assert_eq!(road.lighting, None);
        assert_eq!(road.blind_score, None);
        assert_eq!(road.geometry.len(), 2);
    }

    #[test]
    fn malformed_attributes_are_absent_not_fatal() {
        let text = r#"[
            {"type": "Feature",
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 0.0]]},
             "properties": {"LENGTH": "n/a", "width": -2, "cctv_cnt": "lots", "lamp_cnt": -1}}
        ]"#;

        let roads = parse_road_geojson(text).unwrap();
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].length, None);
        assert_eq!(roads[0].width, None);
        assert_eq!(roads[0].surveillance, None);
        assert_eq!(roads[0].lighting, None);
        assert!(!roads[0].has_node_ids());
    }

    #[test]
    fn multilinestring_parts_are_chained() {
        let text = r#"{"type": "Feature",
            "geometry": {"type": "MultiLineString",
                         "coordinates": [[[0.0, 0.0], [1.0, 0.0]], [[1.0, 0.0], [2.0, 0.0]]]},
            "properties": {"link_id": "m"}}"#;

        let roads = parse_road_geojson(text).unwrap();
        assert_eq!(roads[0].geometry.len(), 3);
    }

    #[test]
    fn bare_geometry_is_rejected() {
        let text = r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#;
        assert!(matches!(
            parse_road_geojson(text),
            Err(Error::InvalidData(_))
        ));
    }
}
