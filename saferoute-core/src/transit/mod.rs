//! Multi-modal itineraries from the external transit provider and splicing
//! of safety-aware walking paths into them.

mod itinerary;
pub mod odsay;
mod splicer;
mod to_geojson;

pub use itinerary::{Itinerary, Segment, TransitQuery, TravelMode};
pub use odsay::parse_odsay_response;
pub use splicer::{splice_itineraries, splice_itinerary};
