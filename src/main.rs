// Main entry point - Dependency injection and session setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use crate::application::collaborators::MapAdapter;
use crate::application::dispatcher::DebouncedDispatcher;
use crate::application::session::EchogramSession;
use crate::application::trajectory_service::TrajectoryService;
use crate::domain::selection::SelectionState;
use crate::infrastructure::config::load_client_config;
use crate::infrastructure::file_presenter::FilePresenter;
use crate::infrastructure::geojson_map::GeoJsonMapAdapter;
use crate::infrastructure::http_repository::HttpAcousticRepository;
use crate::presentation::commands::HELP;
use crate::presentation::console::read_commands;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_client_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(HttpAcousticRepository::new(
        config.backend.base_url.clone(),
        config.backend.request_timeout(),
    )?);
    tracing::info!("Using echogram backend at {}", repository.base_url());

    // Load the trajectory; nothing else works without it
    let dataset = match TrajectoryService::new(repository.clone()).load().await {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!("Error loading acoustic data: {}", e);
            eprintln!("Error loading data. Check the backend and restart.");
            return Err(e.into());
        }
    };

    let mut map = GeoJsonMapAdapter::new(config.output.dir.join("trajectory.geojson"));
    map.draw_trajectory(&dataset.trajectory)?;
    println!("{}", dataset.summary());

    // Session owns the selection for the rest of the run
    let channel = dataset.initial_channel(config.render.channel_index);
    let state = SelectionState::new(channel, config.render.vmin, config.render.vmax);
    let session = EchogramSession::new(
        dataset,
        state,
        DebouncedDispatcher::new(config.render.debounce()),
        repository,
        Box::new(FilePresenter::new(config.output.dir.clone())),
    );

    println!("{}", HELP);
    let input = tokio::spawn(read_commands(BufReader::new(tokio::io::stdin()), session.sender()));
    let state = session.run().await;
    input.abort();

    if state.has_selection() {
        tracing::info!(
            "Last selection: point {}, channel {}, color scale {}..{}",
            state.current_point_index(),
            state.channel_index(),
            state.vmin(),
            state.vmax()
        );
    }
    Ok(())
}
