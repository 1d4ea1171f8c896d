//! The HTTP and WebSocket surface.
//!
//! Handlers are thin: they validate the wire shells, take the engine
//! or mission lock for the duration of a CPU-bound call (never across
//! an await), and translate results back to JSON. All shared state
//! lives in [`AppState`]; there are no globals.

#[doc(hidden)]
pub mod error;
pub mod model;
#[doc(hidden)]
mod test;
pub mod ws;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::config::EngineConfig;
use crate::geo::{GeoPoint, Projector};
use crate::grid::CostGrid;
use crate::mission::error::MissionError;
use crate::mission::MissionTracker;
use crate::plan::Planner;
use crate::server::error::ApiError;
use crate::server::model::{
    AddEnemyResponse, Coordinates, EnemyRequest, PathPoint, Position, Route, RouteRequest,
    RouteResponse, StartMissionRequest, Success, ThreatAreaBody,
};
use crate::threat::{Enemy, ThreatEngine};
use tokio::sync::broadcast;

/// The cost grid and the threat engine share one lock: threat
/// admission rewrites the overlay, planning writes the penalty layer,
/// and either is atomic with respect to the other.
pub struct Engine {
    pub grid: CostGrid,
    pub threats: ThreatEngine,
}

/// A planned route kept around so a mission can be started against it.
#[derive(Debug, Clone)]
pub struct StoredRoute {
    pub id: String,
    pub waypoints: Vec<GeoPoint>,
}

pub struct AppState {
    pub config: EngineConfig,
    pub projector: Projector,
    pub planner: Planner,
    pub engine: Mutex<Engine>,
    /// Replaced wholesale by every planning call.
    pub routes: Mutex<HashMap<String, StoredRoute>>,
    pub mission: MissionTracker,
    pub broadcast: broadcast::Sender<Position>,
}

impl AppState {
    pub fn new(config: EngineConfig, projector: Projector, grid: CostGrid) -> Self {
        let (broadcast, _) = broadcast::channel(32);

        AppState {
            projector,
            planner: Planner::new(config.path_penalty, config.penalty_radius),
            engine: Mutex::new(Engine {
                grid,
                threats: ThreatEngine::new(&config),
            }),
            routes: Mutex::new(HashMap::new()),
            mission: MissionTracker::new(config.speed_kmh, config.update_period),
            broadcast,
            config,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/plan-route", post(plan_route))
        .route("/api/start-mission", post(start_mission))
        .route("/api/stop-mission", post(stop_mission))
        .route("/api/blue-force-position", get(blue_force_position))
        .route("/api/add-enemy", post(add_enemy))
        .route("/api/add-threat-area", post(add_threat_area))
        .route("/ws/position", get(ws::position_ws))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any)
                .allow_origin(Any),
        )
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let start = GeoPoint::from(request.start);
    let end = GeoPoint::from(request.end);

    let planned = {
        let mut engine = state.engine.lock().unwrap();
        let Engine { grid, .. } = &mut *engine;
        state
            .planner
            .find_paths(grid, &state.projector, &start, &end, state.config.max_paths)
            .map_err(|err| ApiError::BadRequest(format!("{err:?}")))?
    };

    if planned.is_empty() {
        warn!("No route between {start:?} and {end:?}");
    }

    let mut stored = HashMap::new();
    let mut routes = Vec::new();

    for (k, route) in planned.into_iter().enumerate() {
        let id = format!("generated-route-{k}");

        stored.insert(
            id.clone(),
            StoredRoute {
                id: id.clone(),
                waypoints: route.points.clone(),
            },
        );

        routes.push(Route {
            id,
            path: route
                .points
                .iter()
                .zip(&route.threat_scores)
                .map(|(&point, &threat_score)| PathPoint {
                    coordinates: Coordinates::from(point),
                    threat_score,
                })
                .collect(),
            distance: route.distance,
            risk_score: route.risk_score,
        });
    }

    // Older plans are forgotten together with their ids.
    *state.routes.lock().unwrap() = stored;

    Ok(Json(RouteResponse { routes }))
}

async fn start_mission(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartMissionRequest>,
) -> Result<Json<Success>, ApiError> {
    let route = {
        let routes = state.routes.lock().unwrap();
        routes
            .get(&request.route_id)
            .cloned()
            .ok_or(ApiError::RouteNotFound)?
    };

    info!("Starting mission on {}", route.id);
    state
        .mission
        .start(&route.id, &route.waypoints)
        .map_err(|err| match err {
            MissionError::AlreadyMoving => ApiError::AlreadyMoving,
            MissionError::InvalidRoute => {
                ApiError::BadRequest("Route has fewer than two waypoints".to_string())
            }
        })?;

    Ok(Json(Success { success: true }))
}

async fn stop_mission(State(state): State<Arc<AppState>>) -> Json<Success> {
    state.mission.stop();
    Json(Success { success: true })
}

async fn blue_force_position(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Position>, ApiError> {
    state
        .mission
        .current_position()
        .map(|position| Json(Position::from(position)))
        .ok_or(ApiError::NoActiveMission)
}

async fn add_enemy(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnemyRequest>,
) -> Result<Json<AddEnemyResponse>, ApiError> {
    let threat_areas = admit_enemy(&state, request)?;
    Ok(Json(AddEnemyResponse {
        success: true,
        threat_areas,
    }))
}

/// Alias of [`add_enemy`] that answers with a bare success flag.
async fn add_threat_area(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EnemyRequest>,
) -> Result<Json<Success>, ApiError> {
    admit_enemy(&state, request)?;
    Ok(Json(Success { success: true }))
}

fn admit_enemy(
    state: &AppState,
    request: EnemyRequest,
) -> Result<Vec<ThreatAreaBody>, ApiError> {
    let enemy = Enemy::admit(request.into_report(), &state.projector)
        .map_err(|err| ApiError::BadRequest(format!("{err:?}")))?;

    // A changed threat picture pauses any mission in flight.
    state.mission.stop();

    let mut engine = state.engine.lock().unwrap();
    let Engine { grid, threats } = &mut *engine;
    let areas = threats.admit(enemy, grid);

    Ok(areas
        .iter()
        .map(|area| ThreatAreaBody::from_area(area, &state.projector))
        .collect())
}
