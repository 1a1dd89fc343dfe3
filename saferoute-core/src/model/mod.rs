//! Data model for safety-aware pedestrian routing
//!
//! Contains the street graph and its components.

pub mod streets;

pub use streets::network::StreetGraph;
pub use streets::{StreetEdge, StreetNode};
