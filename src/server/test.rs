#![cfg(test)]

use serde_json::json;

use crate::geo::{MetricPoint, Projector};
use crate::server::model::{
    Coordinates, EnemyRequest, PathPoint, Route, StartMissionRequest, ThreatAreaBody,
};
use crate::threat::area::threat_circle;
use crate::threat::{EnemyType, RiskLevel, ThreatArea, Weapon};

#[test]
fn enemy_requests_deserialize_with_known_weapons() {
    let request: EnemyRequest = serde_json::from_value(json!({
        "id": "e1",
        "type": "tank",
        "location": [{ "lat": 39.0, "lng": -105.0 }],
        "capability": { "rifle": 5.0, "mortar": 9000.0 },
        "risk_potential": 12.5
    }))
    .unwrap();

    assert_eq!(request.kind, EnemyType::Tank);
    assert_eq!(request.location.len(), 1);
    assert!(request.capability.contains_key(&Weapon::Mortar));
}

#[test]
fn unknown_weapons_and_types_are_rejected() {
    let unknown_weapon = serde_json::from_value::<EnemyRequest>(json!({
        "id": "e1",
        "type": "tank",
        "location": [{ "lat": 39.0, "lng": -105.0 }],
        "capability": { "death_ray": 4000.0 }
    }));
    assert!(unknown_weapon.is_err());

    let unknown_type = serde_json::from_value::<EnemyRequest>(json!({
        "id": "e1",
        "type": "dragon",
        "location": [{ "lat": 39.0, "lng": -105.0 }]
    }));
    assert!(unknown_type.is_err());
}

#[test]
fn mission_requests_use_camel_case() {
    let request: StartMissionRequest =
        serde_json::from_value(json!({ "routeId": "generated-route-1" })).unwrap();
    assert_eq!(request.route_id, "generated-route-1");
}

#[test]
fn routes_serialize_with_camel_case_scores() {
    let route = Route {
        id: "generated-route-0".into(),
        path: vec![PathPoint {
            coordinates: Coordinates {
                lat: 39.0,
                lng: -105.0,
                alt: Some(1612.0),
            },
            threat_score: 50.0,
        }],
        distance: 1234.5,
        risk_score: 50.0,
    };

    let value = serde_json::to_value(&route).unwrap();
    assert_eq!(value["riskScore"], json!(50.0));
    assert_eq!(value["path"][0]["threatScore"], json!(50.0));
    assert_eq!(value["path"][0]["coordinates"]["alt"], json!(1612.0));
}

#[test]
fn threat_area_bodies_carry_wire_levels_and_closed_rings() {
    let projector = Projector::new(13, true).unwrap();
    let area = ThreatArea {
        id: "threat_e1".into(),
        polygon: threat_circle(MetricPoint::new(500_000.0, 4_300_000.0), 400.0, 32),
        level: RiskLevel::High,
        score: 4086.0,
        description: "Threat area for tank unit with anti_tank_missile capability".into(),
        enemy_ids: vec!["e1".into()],
    };

    let body = ThreatAreaBody::from_area(&area, &projector);

    assert_eq!(body.level, "highThreat");
    assert_eq!(body.coordinates.len(), 1);

    let ring = &body.coordinates[0];
    assert_eq!(ring.len(), 33);
    assert_eq!(ring.first(), ring.last());

    assert_eq!(
        ThreatAreaBody::from_area(
            &ThreatArea {
                level: RiskLevel::Medium,
                ..area
            },
            &projector
        )
        .level,
        "medThreat"
    );
}
