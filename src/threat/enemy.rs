//! Enemy reports and their normalization.
//!
//! Clients report an enemy type, locations, and a claimed capability.
//! None of the claimed numbers are trusted: admission rewrites the
//! capability to the canonical loadout for the type, re-derives every
//! weapon range from the fixed table, and recomputes the risk
//! potential. Unknown weapon names never get this far; the closed
//! [`Weapon`] enum rejects them at deserialization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::geo::{GeoPoint, MetricPoint, Projector};
use crate::threat::error::ThreatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnemyType {
    Person,
    Vehicle,
    Tank,
    Sniper,
    Launcher,
}

impl EnemyType {
    /// Baseline risk of the unit type before range scaling.
    pub fn base_risk(self) -> f64 {
        match self {
            EnemyType::Person => 50.0,
            EnemyType::Vehicle => 60.0,
            EnemyType::Sniper => 70.0,
            EnemyType::Tank => 80.0,
            EnemyType::Launcher => 85.0,
        }
    }
}

/// The closed set of weapons the engine understands, with their
/// effective ranges in meters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Weapon {
    Rifle,
    AssaultRifle,
    SniperRifle,
    Rpg,
    LongRangeCannon,
    Mortar,
    AntiTankMissile,
}

impl Weapon {
    pub fn range(self) -> f64 {
        match self {
            Weapon::Rifle => 100.0,
            Weapon::AssaultRifle => 500.0,
            Weapon::SniperRifle => 1200.0,
            Weapon::Rpg => 700.0,
            Weapon::LongRangeCannon => 1000.0,
            Weapon::Mortar => 5600.0,
            Weapon::AntiTankMissile => 10_000.0,
        }
    }
}

/// An enemy as reported by a client: geodetic, unnormalized.
#[derive(Debug, Clone)]
pub struct EnemyReport {
    pub id: String,
    pub kind: EnemyType,
    pub locations: Vec<GeoPoint>,
    pub capability: BTreeMap<Weapon, f64>,
}

/// An admitted enemy. Locations are projected, the capability carries
/// table ranges, and the risk potential is derived.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: String,
    pub kind: EnemyType,
    pub locations: Vec<MetricPoint>,
    pub capability: BTreeMap<Weapon, f64>,
    pub risk_potential: f64,
}

impl Enemy {
    /// Normalizes a report into an admitted enemy.
    pub fn admit(report: EnemyReport, projector: &Projector) -> Result<Enemy, ThreatError> {
        if report.locations.is_empty() {
            return Err(ThreatError::EmptyLocation(report.id));
        }

        let locations = report
            .locations
            .iter()
            .map(|point| projector.to_metric(point))
            .collect::<Result<Vec<_>, _>>()?;

        let capability: BTreeMap<Weapon, f64> = canonical_loadout(report.kind, &report.capability)
            .into_iter()
            .map(|weapon| (weapon, weapon.range()))
            .collect();

        let effective_range = capability
            .keys()
            .map(|weapon| weapon.range())
            .fold(0.0, f64::max);

        let risk_potential =
            (report.kind.base_risk() * (1.0 + effective_range / 1000.0)).clamp(0.0, 100.0);

        Ok(Enemy {
            id: report.id,
            kind: report.kind,
            locations,
            capability,
            risk_potential,
        })
    }

    /// Longest weapon range of the admitted capability, meters.
    pub fn effective_range(&self) -> f64 {
        self.capability
            .keys()
            .map(|weapon| weapon.range())
            .fold(0.0, f64::max)
    }

    /// The weapon that sets the effective range, for descriptions.
    pub fn signature_weapon(&self) -> Option<Weapon> {
        self.capability
            .keys()
            .copied()
            .max_by(|a, b| a.range().total_cmp(&b.range()))
    }
}

/// Single-point unit types carry a canonical loadout regardless of what
/// the client claimed; the remaining types keep their declared weapons
/// (ranges are re-derived from the table either way).
fn canonical_loadout(kind: EnemyType, declared: &BTreeMap<Weapon, f64>) -> Vec<Weapon> {
    match kind {
        EnemyType::Person => vec![Weapon::Rifle],
        EnemyType::Vehicle => vec![Weapon::LongRangeCannon],
        EnemyType::Tank => vec![Weapon::AntiTankMissile],
        EnemyType::Sniper | EnemyType::Launcher => declared.keys().copied().collect(),
    }
}
