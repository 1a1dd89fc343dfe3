//! Safety-aware walking route computation

pub mod dijkstra;
mod query;
mod walking_path;
pub mod weighting;
pub mod weights;

pub use dijkstra::shortest_path;
pub use query::find_walking_path;
pub use walking_path::WalkingPath;
pub use weighting::{SafetyWeighting, Weighting, edge_cost};
pub use weights::{Preferences, RouteMode, WeightVector, compute_weights, current_hour, is_daytime};
