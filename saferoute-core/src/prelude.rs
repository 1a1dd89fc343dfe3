pub use crate::config::SafetyConfig;
pub use crate::loading::{IngestReport, RoadFeature, build_street_graph, ingest_features};
pub use crate::model::{StreetEdge, StreetGraph, StreetNode};
pub use crate::overlay::{SafetyLevel, overlay_geojson};
pub use crate::routing::{
    Preferences, RouteMode, WalkingPath, WeightVector, compute_weights, current_hour,
    find_walking_path,
};
pub use crate::session::{RequestTicket, RequestTracker};
pub use crate::store::GraphStore;
pub use crate::transit::{Itinerary, Segment, TransitQuery, TravelMode, splice_itinerary};

pub use crate::Cost;
pub use crate::StreetNodeId;
