use geo::Coord;

/// A road segment as delivered by the road-data feed, before defaults are
/// applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoadFeature {
    pub link_id: Option<String>,
    /// Explicit topological identifier of the first vertex
    pub from_node: Option<String>,
    /// Explicit topological identifier of the last vertex
    pub to_node: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub surveillance: Option<u32>,
    pub lighting: Option<u32>,
    pub dark_score: Option<f64>,
    pub blind_score: Option<f64>,
    /// Ordered (longitude, latitude) vertex chain
    pub geometry: Vec<Coord<f64>>,
}

impl RoadFeature {
    pub fn has_node_ids(&self) -> bool {
        self.from_node.is_some() && self.to_node.is_some()
    }
}
