//! Recognized engine options and their defaults.

use std::time::Duration;

/// Weights applied to the components of a threat-area risk score.
#[derive(Debug, Clone, Copy)]
pub struct RiskWeights {
    /// Per enemy location inside the area.
    pub enemy_count: f64,
    /// Per meter of the longest effective weapon range.
    pub max_range: f64,
    /// Per point of summed enemy risk potential.
    pub risk_potential: f64,
}

/// Score bands that map a risk score to a discrete risk level.
///
/// Scores below `moderate` are low, scores below `high` are medium,
/// anything at or above `high` is high. The `critical` band is kept for
/// callers that want to distinguish the extreme end; it classifies as
/// high like everything above the `high` threshold.
#[derive(Debug, Clone, Copy)]
pub struct RiskThresholds {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}

/// Every option the engine recognizes, with the stock defaults.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// UTM zone bracketing all input coordinates.
    pub utm_zone: u8,
    /// Whether the zone is in the northern hemisphere.
    pub utm_north: bool,
    /// Amount subtracted from the terrain cost of road cells.
    pub road_reduction: f64,
    /// Arc-length step (m) used when rasterizing road polylines.
    pub road_spacing: f64,
    /// Additive cost stamped around already-found paths.
    pub path_penalty: f64,
    /// Metric radius (m) of the path penalty stamp.
    pub penalty_radius: f64,
    /// Maximum number of paths returned per planning call.
    pub max_paths: usize,
    /// Simulated ground speed of the blue force, km/h.
    pub speed_kmh: f64,
    /// Cadence of mission position emissions.
    pub update_period: Duration,
    /// Threat circles use `effective_range / circle_divisor` as radius.
    pub circle_divisor: f64,
    /// Vertex count of a synthesized threat circle.
    pub circle_vertices: usize,
    pub weights: RiskWeights,
    pub thresholds: RiskThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            utm_zone: 13,
            utm_north: true,
            road_reduction: 15.0,
            road_spacing: 10.0,
            path_penalty: 1000.0,
            penalty_radius: 200.0,
            max_paths: 3,
            speed_kmh: 5.0,
            update_period: Duration::from_secs(1),
            circle_divisor: 15.0,
            circle_vertices: 32,
            weights: RiskWeights {
                enemy_count: 6.0,
                max_range: 0.4,
                risk_potential: 0.8,
            },
            thresholds: RiskThresholds {
                moderate: 500.0,
                high: 1200.0,
                critical: 5000.0,
            },
        }
    }
}
