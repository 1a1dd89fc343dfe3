//! This module is responsible for loading road data (GeoJSON road feeds)
//! and building the routable street graph.

mod builder;
pub mod road_feed;
mod raw_types;

pub use builder::{IngestReport, build_street_graph, derive_blind_score, ingest_features};
pub use road_feed::{load_road_file, parse_road_geojson};
pub use raw_types::RoadFeature;
