use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod constants;
mod curve;
mod dataset;
mod locations;
mod map_context;
mod marker;
mod model;
mod popup;
mod server;
mod settings;
mod utils;

use dataset::DataSource;
use map_context::{load_and_render, MapContext, MapView};
use server::{start_server, AppState};
use settings::Settings;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    tracing::info!("AI supply chain map v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load settings")?;
    if !Settings::config_path().exists() {
        // First run: write the defaults so they can be edited
        if let Err(e) = settings.save() {
            tracing::warn!("Failed to save default settings: {}", e);
        }
    }
    tracing::info!(
        port = settings.port,
        curve_samples = settings.curve_samples,
        data_file = settings.data_file.as_deref().unwrap_or("<embedded>"),
        "Settings loaded from {}",
        Settings::config_path().display()
    );

    let source = DataSource::from_settings(settings.data_file.as_deref());
    let mut map = MapContext::new(MapView::default());
    let sites = load_and_render(&mut map, &source, &settings.curve()).await;
    if map.is_empty() {
        tracing::warn!("Nothing rendered; serving an empty map");
    }

    let listener = server::bind(settings.port).await?;
    let url = format!("http://{}", listener.local_addr()?);
    if settings.auto_open_browser {
        if let Err(e) = utils::open_map_in_browser(&url) {
            tracing::warn!("Could not open browser at {}: {:#}", url, e);
        }
    }

    let state = AppState::new(map, sites, settings);
    start_server(state, listener).await
}
