use saferoute_core::{GraphStore, RequestTracker, StreetGraph};

use crate::config::ServerConfig;
use crate::transit_client::TransitClient;

pub struct AppState {
    pub store: GraphStore,
    pub tracker: RequestTracker,
    pub config: ServerConfig,
    pub transit: TransitClient,
}

impl AppState {
    pub fn new(config: ServerConfig, graph: StreetGraph) -> Self {
        Self {
            store: GraphStore::new(graph),
            tracker: RequestTracker::new(),
            transit: TransitClient::new(config.transit.clone()),
            config,
        }
    }
}
