use geo::{Coord, Haversine, Length, LineString};
use serde::{Deserialize, Serialize};

use crate::config::FallbackConfig;
use crate::routing::WalkingPath;

/// Mode of one itinerary segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walk,
    Bus,
    Subway,
    Other,
}

impl TravelMode {
    /// Maps the provider's traffic type code
    pub fn from_traffic_type(code: i64) -> Self {
        match code {
            1 => TravelMode::Subway,
            2 => TravelMode::Bus,
            3 => TravelMode::Walk,
            _ => TravelMode::Other,
        }
    }

    pub fn is_walking(self) -> bool {
        self == TravelMode::Walk
    }
}

/// Start and end of a route request, (longitude, latitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitQuery {
    pub start: Coord<f64>,
    pub end: Coord<f64>,
}

impl TransitQuery {
    pub fn new(start: Coord<f64>, end: Coord<f64>) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub mode: TravelMode,
    pub start: Coord<f64>,
    pub end: Coord<f64>,
    /// Ordered stop positions, vehicle segments only
    pub stops: Vec<Coord<f64>>,
    /// Minutes
    pub section_time: u32,
    /// Meters
    pub distance: f64,
    /// Safety-aware walking path attached by splicing. `None` on a walking
    /// segment means no route was found and the straight line between
    /// `start` and `end` should be shown instead.
    pub safe_path: Option<WalkingPath>,
}

impl Segment {
    pub fn walking(start: Coord<f64>, end: Coord<f64>, section_time: u32, distance: f64) -> Self {
        Self {
            mode: TravelMode::Walk,
            start,
            end,
            stops: Vec::new(),
            section_time,
            distance,
            safe_path: None,
        }
    }

    /// Geometry to display: the attached walking path, the stop chain of a
    /// vehicle segment, or the straight line between the endpoints
    pub fn display_line(&self) -> LineString<f64> {
        if let Some(path) = self.safe_path.as_ref().and_then(WalkingPath::to_line_string) {
            return path;
        }
        if !self.mode.is_walking() && self.stops.len() >= 2 {
            return LineString::new(self.stops.clone());
        }
        LineString::new(vec![self.start, self.end])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub segments: Vec<Segment>,
    /// Minutes
    pub total_time: u32,
    /// Meters
    pub total_distance: f64,
    pub payment: u32,
    /// True when synthesized locally because the provider was unavailable
    pub synthetic: bool,
}

impl Itinerary {
    /// Single walking segment spanning the request, used whenever the transit
    /// provider cannot deliver an itinerary
    pub fn fallback(query: &TransitQuery, config: &FallbackConfig) -> Self {
        let distance = Haversine.length(&LineString::new(vec![query.start, query.end]));
        let speed = if config.walking_speed_mps > 0.0 {
            config.walking_speed_mps
        } else {
            FallbackConfig::default().walking_speed_mps
        };
        let minutes = ((distance / speed / 60.0).ceil() as u32).max(config.min_minutes);

        Self {
            segments: vec![Segment::walking(query.start, query.end, minutes, distance)],
            total_time: minutes,
            total_distance: distance,
            payment: 0,
            synthetic: true,
        }
    }

    pub fn walking_segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|segment| segment.mode.is_walking())
    }
}
