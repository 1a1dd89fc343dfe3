use geo::{Coord, LineString};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use serde_json::{Map, json};

use crate::Cost;

/// Result of a walking route search.
///
/// An empty path means "no route available": the endpoints could not be
/// snapped or lie in different components. It is a normal outcome, not an
/// error.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WalkingPath {
    coords: Vec<Coord<f64>>,
    link_ids: Vec<String>,
    cost: Cost,
    length: f64,
}

impl WalkingPath {
    pub(crate) fn new(coords: Vec<Coord<f64>>, link_ids: Vec<String>, cost: Cost, length: f64) -> Self {
        Self {
            coords,
            link_ids,
            cost,
            length,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    pub fn into_coords(self) -> Vec<Coord<f64>> {
        self.coords
    }

    /// Road links traversed, in travel order
    pub fn link_ids(&self) -> &[String] {
        &self.link_ids
    }

    /// Sum of the weighted edge costs
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Physical length in meters
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn to_line_string(&self) -> Option<LineString<f64>> {
        (!self.is_empty()).then(|| LineString::new(self.coords.clone()))
    }

    /// `GeoJSON` feature of the path; geometry is null for an empty path
    pub fn to_feature(&self) -> Feature {
        let geometry = self
            .to_line_string()
            .map(|line| Geometry::new(GeoJsonValue::from(&line)));

        let mut properties = Map::new();
        properties.insert("found".to_string(), json!(!self.is_empty()));
        properties.insert("cost".to_string(), json!(self.cost));
        properties.insert("length".to_string(), json!(self.length));
        properties.insert("link_ids".to_string(), json!(self.link_ids));

        Feature {
            bbox: None,
            geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}
