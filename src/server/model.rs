//! Wire shells for the JSON surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, Projector};
use crate::threat::{EnemyReport, EnemyType, ThreatArea, Weapon};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<f64>,
}

impl From<Coordinates> for GeoPoint {
    fn from(value: Coordinates) -> Self {
        GeoPoint {
            lng: value.lng,
            lat: value.lat,
            alt: value.alt,
        }
    }
}

impl From<GeoPoint> for Coordinates {
    fn from(value: GeoPoint) -> Self {
        Coordinates {
            lat: value.lat,
            lng: value.lng,
            alt: value.alt,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinates,
    pub end: Coordinates,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub coordinates: Coordinates,
    pub threat_score: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub path: Vec<PathPoint>,
    pub distance: f64,
    pub risk_score: f64,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartMissionRequest {
    pub route_id: String,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

/// A bare position snapshot, also the broadcast payload.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for Position {
    fn from(value: GeoPoint) -> Self {
        Position {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

/// An enemy observation as posted by a client. The claimed risk
/// potential is accepted on the wire and then discarded; admission
/// derives its own.
#[derive(Debug, Deserialize)]
pub struct EnemyRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EnemyType,
    pub location: Vec<Coordinates>,
    #[serde(default)]
    pub capability: BTreeMap<Weapon, f64>,
    #[serde(default)]
    pub risk_potential: f64,
}

impl EnemyRequest {
    pub fn into_report(self) -> EnemyReport {
        EnemyReport {
            id: self.id,
            kind: self.kind,
            locations: self.location.into_iter().map(GeoPoint::from).collect(),
            capability: self.capability,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThreatAreaBody {
    pub id: String,
    /// GeoJSON-style ring list: one exterior ring of `[lng, lat]` pairs.
    pub coordinates: Vec<Vec<[f64; 2]>>,
    pub level: &'static str,
    pub description: String,
}

impl ThreatAreaBody {
    pub fn from_area(area: &ThreatArea, projector: &Projector) -> Self {
        let ring = area
            .polygon
            .exterior()
            .coords()
            .map(|coord| {
                let point = projector.to_geo(&(*coord).into());
                [point.lng, point.lat]
            })
            .collect();

        ThreatAreaBody {
            id: area.id.clone(),
            coordinates: vec![ring],
            level: area.level.wire_name(),
            description: area.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEnemyResponse {
    pub success: bool,
    pub threat_areas: Vec<ThreatAreaBody>,
}
