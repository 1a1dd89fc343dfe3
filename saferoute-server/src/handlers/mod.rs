mod health;
mod itinerary;
mod overlay;
mod roads;
mod route;

pub use health::health_handler;
pub use itinerary::itinerary_handler;
pub use overlay::overlay_handler;
pub use roads::roads_handler;
pub use route::{RouteRequestBody, route_handler};
