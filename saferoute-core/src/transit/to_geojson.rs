use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::itinerary::{Itinerary, Segment, TravelMode};
use crate::Error;

impl Itinerary {
    /// Converts the itinerary to a `GeoJSON` `FeatureCollection`, one feature
    /// per segment in travel order.
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        let features = self
            .segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| create_segment_feature(idx, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FeatureCollection {
            features,
            bbox: None,
            foreign_members: None,
        })
    }

    pub fn to_geojson_string(&self) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson()?).map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn leg_type(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Walk => "walk",
        TravelMode::Bus => "bus",
        TravelMode::Subway => "subway",
        TravelMode::Other => "other",
    }
}

fn create_segment_feature(leg_idx: usize, segment: &Segment) -> Result<Feature, Error> {
    let geometry = Geometry::new(GeoJsonValue::from(&segment.display_line()));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": leg_type(segment.mode),
            "leg_index": leg_idx,
            "section_time": segment.section_time,
            "distance": segment.distance,
            "stop_count": segment.stops.len(),
            "safe_path": segment.safe_path.is_some(),
            "safe_cost": segment.safe_path.as_ref().map(|path| path.cost()),
            "safe_length": segment.safe_path.as_ref().map(|path| path.length()),
        }
    });

    Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
