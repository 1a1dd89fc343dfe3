//! Safety-aware pedestrian routing.
//!
//! Builds a routable street graph from road-segment records annotated with
//! lighting, surveillance and width, computes time- and preference-dependent
//! edge costs, snaps coordinates to the network, solves single-pair shortest
//! paths and splices them into itineraries produced by an external transit
//! provider.

pub mod config;
pub mod error;
pub mod loading;
pub mod model;
pub mod overlay;
pub mod prelude;
pub mod routing;
pub mod session;
pub mod store;
pub mod transit;

pub use config::SafetyConfig;
pub use error::Error;
pub use loading::{IngestReport, RoadFeature, ingest_features, parse_road_geojson};
pub use model::{StreetEdge, StreetGraph, StreetNode};
pub use routing::{WalkingPath, find_walking_path};
pub use session::{RequestTicket, RequestTracker};
pub use store::GraphStore;
pub use transit::{Itinerary, TransitQuery};

/// Index of a node inside the petgraph storage
pub type StreetNodeId = petgraph::graph::NodeIndex;

/// Cost of traversing an edge, in the same unit as edge length (meters)
pub type Cost = f64;
