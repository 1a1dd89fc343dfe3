//! Pedestrian street network model

pub mod components;
mod locator;
pub mod network;

pub use components::{StreetEdge, StreetNode};
pub use network::{IndexedPoint, StreetGraph};
