//! Multi-path planning by penalty re-planning.
//!
//! One A* run yields the least-cost path. To produce geographically
//! distinct alternatives, every cell near an already-found path is
//! surcharged on the grid's transient penalty layer before the next
//! run, which makes overlapping alternatives strictly dominated. The
//! penalty layer is restored to zero before returning, on every exit
//! path.

mod astar;

use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::geo::error::GeoError;
use crate::geo::{haversine_distance, GeoPoint, Projector};
use crate::grid::{CostGrid, GridIndex};

/// One planned route, grid-native and geodetic at once.
#[derive(Debug, Clone)]
pub struct PlannedRoute {
    /// The grid cells visited, consecutive cells 8-adjacent.
    pub nodes: Vec<GridIndex>,
    /// The same path as geodetic points; altitude echoes the DEM.
    pub points: Vec<GeoPoint>,
    /// Polygon-overlay value at each cell at the moment of planning.
    pub threat_scores: Vec<f64>,
    /// Accumulated A* move cost.
    pub cost: f64,
    /// Haversine length of the geodetic path, meters.
    pub distance: f64,
    /// Sum of the per-point threat scores.
    pub risk_score: f64,
    /// Share of path cells riding a road, percent.
    pub road_share: f64,
}

/// Planner tunables; see the engine configuration for defaults.
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    /// Additive cost stamped around found paths between runs.
    pub penalty: f64,
    /// Stamp radius, meters.
    pub radius: f64,
}

impl Planner {
    pub fn new(penalty: f64, radius: f64) -> Self {
        Planner { penalty, radius }
    }

    /// Finds up to `k` distinct least-cost paths between two geodetic
    /// points, cheapest first.
    ///
    /// An unreachable goal, an endpoint outside the raster, or an
    /// endpoint on an impassable cell yields an empty list rather than
    /// an error; only malformed geodetic input fails.
    pub fn find_paths(
        &self,
        grid: &mut CostGrid,
        projector: &Projector,
        start: &GeoPoint,
        end: &GeoPoint,
        k: usize,
    ) -> Result<Vec<PlannedRoute>, GeoError> {
        let (start_cell, start_in) = grid.nearest_index(&projector.to_metric(start)?);
        let (end_cell, end_in) = grid.nearest_index(&projector.to_metric(end)?);

        if !start_in || !end_in {
            debug!("Refusing endpoints outside the raster: {start:?} -> {end:?}");
            return Ok(Vec::new());
        }

        let mut routes = Vec::new();
        let mut seen: FxHashSet<Vec<GridIndex>> = FxHashSet::default();

        for round in 0..k {
            let Some((nodes, cost)) = astar::search(grid, start_cell, end_cell) else {
                debug!("Round {round}: no path");
                break;
            };

            if !seen.insert(nodes.clone()) {
                debug!("Round {round}: duplicate path, stopping");
                break;
            }

            let centers: Vec<_> = nodes.iter().map(|&n| grid.cell_center(n)).collect();
            grid.add_penalty_around(&centers, self.radius, self.penalty);

            routes.push(assemble(grid, projector, nodes, cost));
        }

        grid.clear_penalty();

        info!("Found {} unique paths", routes.len());
        Ok(routes)
    }
}

fn assemble(
    grid: &CostGrid,
    projector: &Projector,
    nodes: Vec<GridIndex>,
    cost: f64,
) -> PlannedRoute {
    let threat_scores: Vec<f64> = nodes.iter().map(|&n| grid.overlay_cost(n)).collect();

    let points: Vec<GeoPoint> = nodes
        .iter()
        .map(|&n| {
            let mut point = projector.to_geo(&grid.cell_center(n));
            point.alt = Some(grid.elevation(n));
            point
        })
        .collect();

    let distance = points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum();

    let on_road = nodes.iter().filter(|&&n| grid.is_road(n)).count();

    PlannedRoute {
        risk_score: threat_scores.iter().sum(),
        road_share: on_road as f64 / nodes.len() as f64 * 100.0,
        nodes,
        points,
        threat_scores,
        cost,
        distance,
    }
}
