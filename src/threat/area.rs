//! Threat polygons and their risk levels.

use geo::{Area, MultiPolygon, Polygon};
use serde::Serialize;
use strum::Display;

use crate::geo::MetricPoint;

/// Discrete summary of an area's threat. High areas are impassable in
/// overlay terms; medium and low add a finite surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Additive cost this level contributes to covered cells.
    pub fn overlay_contribution(self) -> f64 {
        match self {
            RiskLevel::High => f64::INFINITY,
            RiskLevel::Medium | RiskLevel::Low => 50.0,
        }
    }

    /// The spelling the HTTP surface uses for threat areas.
    pub fn wire_name(self) -> &'static str {
        match self {
            RiskLevel::High => "highThreat",
            RiskLevel::Medium | RiskLevel::Low => "medThreat",
        }
    }
}

/// A closed threat polygon in metric coordinates. Never mutated after
/// admission; superseded wholesale when a merge absorbs it.
#[derive(Debug, Clone)]
pub struct ThreatArea {
    pub id: String,
    pub polygon: Polygon<f64>,
    pub level: RiskLevel,
    pub score: f64,
    pub description: String,
    /// Ids of the contributing enemies, sorted and deduplicated.
    pub enemy_ids: Vec<String>,
}

/// A regular polygon approximating a circle around a point. The ring is
/// closed by the polygon type; callers treat the first vertex as
/// implicitly repeated.
pub(crate) fn threat_circle(center: MetricPoint, radius: f64, vertices: usize) -> Polygon<f64> {
    let ring: Vec<(f64, f64)> = (0..vertices)
        .map(|k| {
            let angle = k as f64 / vertices as f64 * std::f64::consts::TAU;
            (
                center.easting + radius * angle.sin(),
                center.northing + radius * angle.cos(),
            )
        })
        .collect();

    Polygon::new(ring.into(), vec![])
}

/// Collapses a union result to its largest connected component.
pub(crate) fn largest_component(union: MultiPolygon<f64>) -> Polygon<f64> {
    union
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .unwrap_or_else(|| Polygon::new(Vec::<(f64, f64)>::new().into(), vec![]))
}
