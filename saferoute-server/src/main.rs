use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use saferoute_core::loading::{build_street_graph, load_road_file};
use saferoute_core::{SafetyConfig, StreetGraph};
use saferoute_server::app;
use saferoute_server::config::ServerConfig;
use saferoute_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Safety-aware pedestrian routing server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `[server] listen`
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// GeoJSON road files loaded before serving
    #[arg(short, long = "roads")]
    roads: Vec<PathBuf>,

    /// Use the alternate safety weight coefficients
    #[arg(long)]
    alternate_weights: bool,
}

fn preload(paths: &[PathBuf], config: &SafetyConfig) -> Result<StreetGraph, saferoute_core::Error> {
    let batches = paths
        .iter()
        .map(|path| {
            info!("Loading roads from {}", path.display());
            load_road_file(path)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (graph, report) = build_street_graph(batches, config);
    info!(
        "Street graph ready: {} nodes, {} segments, {} components ({} features rejected)",
        report.node_count, report.segment_count, report.components, report.rejected
    );
    Ok(graph)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for shutdown signal: {error}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if args.alternate_weights {
        config.safety.weights = SafetyConfig::alternate().weights;
    }

    let graph = preload(&args.roads, &config.safety)?;
    let settings = config.server.clone();
    let state = Arc::new(AppState::new(config, graph));
    if !state.transit.has_key() {
        warn!("No transit API key configured, itineraries will be walking only");
    }

    let listener = tokio::net::TcpListener::bind(settings.listen).await?;
    info!("Listening on {}", settings.listen);

    axum::serve(listener, app(state, &settings))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
