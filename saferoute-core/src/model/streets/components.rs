//! Street network components - nodes and edges

use geo::{LineString, Point};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Identifier from the road feed, or synthesized from the link id
    pub id: String,
    /// Node coordinates
    pub geometry: Point<f64>,
}

/// Street graph edge (road segment)
///
/// Every segment is stored twice, once per direction, with identical
/// attributes and the geometry oriented from the edge source to its target.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetEdge {
    pub link_id: String,
    /// Length in meters
    pub length: f64,
    /// Number of street lamps along the segment
    pub lighting: u32,
    /// Number of surveillance cameras along the segment
    pub surveillance: u32,
    /// Road width in meters
    pub width: f64,
    /// Low-visibility risk, supplied by the feed or derived at ingestion
    pub blind_score: f64,
    /// Blind score exactly as the feed reported it. Display scoring uses
    /// this one, not the derived value.
    pub feed_blind_score: Option<f64>,
    /// Darkness indicator carried through from the feed, zero when absent
    pub dark_score: f64,
    pub geometry: LineString<f64>,
}

impl StreetEdge {
    /// Same segment seen from the other end
    pub fn reversed(&self) -> Self {
        let mut geometry = self.geometry.clone();
        geometry.0.reverse();
        Self {
            geometry,
            link_id: self.link_id.clone(),
            ..*self
        }
    }

    /// Equality of everything except orientation-dependent geometry
    pub fn same_attributes(&self, other: &Self) -> bool {
        self.link_id == other.link_id
            && self.length == other.length
            && self.lighting == other.lighting
            && self.surveillance == other.surveillance
            && self.width == other.width
            && self.blind_score == other.blind_score
            && self.feed_blind_score == other.feed_blind_score
            && self.dark_score == other.dark_score
    }
}
