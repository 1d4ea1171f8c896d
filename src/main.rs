use std::env;
use std::sync::Arc;

use dotenv::dotenv;
use log::{error, info, warn};

use overland::config::EngineConfig;
use overland::geo::Projector;
use overland::grid::roads::load_roads_csv;
use overland::grid::CostGrid;
use overland::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load `.env` file, if any.
    let _ = dotenv();
    env_logger::init();

    let config = EngineConfig::default();

    let dem_path = env::var("OVERLAND_DEM").unwrap_or_else(|_| "data/dem.csv".to_string());
    let roads_path = env::var("OVERLAND_ROADS").unwrap_or_else(|_| "data/roads.csv".to_string());
    let addr = env::var("OVERLAND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    let projector =
        Projector::new(config.utm_zone, config.utm_north).expect("configured UTM zone is valid");

    // A missing DEM is fatal; there is nothing to plan over without it.
    let mut grid = match CostGrid::from_dem_csv(&dem_path) {
        Ok(grid) => grid,
        Err(err) => {
            error!("Could not load DEM from {dem_path}: {err:?}");
            std::process::exit(1);
        }
    };

    // Missing roads only lose the road discount.
    match load_roads_csv(&roads_path) {
        Ok(roads) => grid.apply_roads(&roads, config.road_spacing, config.road_reduction),
        Err(err) => warn!("Roads file unavailable ({err:?}), skipping road cost reduction"),
    }

    info!(
        "Cost grid ready: {}x{} cells, UTM zone {}",
        grid.height(),
        grid.width(),
        projector.zone()
    );

    let period = config.update_period;
    let state = Arc::new(AppState::new(config, projector, grid));

    tokio::spawn(server::ws::broadcast_positions(Arc::clone(&state), period));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Serving on {addr}");
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
