//! Threat ingestion and the polygon cost overlay.
//!
//! The engine owns the admitted enemies and the retained threat areas,
//! and is the sole writer to the grid's polygon overlay. Admission
//! normalizes the report, synthesizes one circle per enemy location,
//! greedily merges every intersecting pair of areas until the set is
//! stable, and rebuilds the overlay from scratch so it always reflects
//! exactly the retained set.

pub mod area;
pub mod enemy;
#[doc(hidden)]
pub mod error;

#[doc(inline)]
pub use area::{RiskLevel, ThreatArea};
#[doc(inline)]
pub use enemy::{Enemy, EnemyReport, EnemyType, Weapon};

use geo::{BooleanOps, BoundingRect, Contains, Intersects};
use itertools::Itertools;
use log::{debug, info};

use crate::config::{EngineConfig, RiskThresholds, RiskWeights};
use crate::geo::MetricPoint;
use crate::grid::{CostGrid, GridIndex};
use crate::threat::area::{largest_component, threat_circle};

pub struct ThreatEngine {
    weights: RiskWeights,
    thresholds: RiskThresholds,
    circle_divisor: f64,
    circle_vertices: usize,
    enemies: Vec<Enemy>,
    areas: Vec<ThreatArea>,
}

impl ThreatEngine {
    pub fn new(config: &EngineConfig) -> Self {
        ThreatEngine {
            weights: config.weights,
            thresholds: config.thresholds,
            circle_divisor: config.circle_divisor,
            circle_vertices: config.circle_vertices,
            enemies: Vec::new(),
            areas: Vec::new(),
        }
    }

    pub fn areas(&self) -> &[ThreatArea] {
        &self.areas
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Admits a normalized enemy: synthesizes its threat circles,
    /// re-merges the whole area set, and rebuilds the grid overlay.
    /// Returns the retained areas.
    pub fn admit(&mut self, enemy: Enemy, grid: &mut CostGrid) -> &[ThreatArea] {
        info!(
            "Admitting enemy {} ({}, range {} m)",
            enemy.id,
            enemy.kind,
            enemy.effective_range()
        );

        let fresh = self.synthesize(&enemy);
        self.enemies.push(enemy);

        let candidates = self.areas.drain(..).chain(fresh).collect();
        self.areas = self.merge(candidates);
        self.rasterize(grid);

        &self.areas
    }

    /// One circle per enemy location, radius scaled down from the
    /// effective weapon range.
    fn synthesize(&self, enemy: &Enemy) -> Vec<ThreatArea> {
        let radius = enemy.effective_range() / self.circle_divisor;
        let (score, level) = self.score([enemy]);

        enemy
            .locations
            .iter()
            .enumerate()
            .map(|(k, &center)| {
                let id = if enemy.locations.len() == 1 {
                    format!("threat_{}", enemy.id)
                } else {
                    format!("threat_{}_{k}", enemy.id)
                };

                let capability = enemy
                    .signature_weapon()
                    .map(|weapon| weapon.to_string())
                    .unwrap_or_else(|| "unarmed".to_string());

                ThreatArea {
                    id,
                    polygon: threat_circle(center, radius, self.circle_vertices),
                    level,
                    score,
                    description: format!(
                        "Threat area for {} unit with {capability} capability",
                        enemy.kind
                    ),
                    enemy_ids: vec![enemy.id.clone()],
                }
            })
            .collect()
    }

    /// Weighted risk score over a set of contributing enemies, and the
    /// level band it falls into.
    fn score<'a>(&self, enemies: impl IntoIterator<Item = &'a Enemy>) -> (f64, RiskLevel) {
        let mut count = 0usize;
        let mut max_range = 0.0f64;
        let mut total_potential = 0.0f64;

        for enemy in enemies {
            count += 1;
            max_range = max_range.max(enemy.effective_range());
            total_potential += enemy.risk_potential;
        }

        let score = count as f64 * self.weights.enemy_count
            + max_range * self.weights.max_range
            + total_potential * self.weights.risk_potential;

        let level = if score < self.thresholds.moderate {
            RiskLevel::Low
        } else if score < self.thresholds.high {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };

        (score, level)
    }

    /// Greedy pairwise merging: each unprocessed area absorbs every
    /// area it intersects, rescanning until its footprint stops
    /// growing. Unions that split into multiple components keep the
    /// largest.
    fn merge(&self, areas: Vec<ThreatArea>) -> Vec<ThreatArea> {
        let mut processed = vec![false; areas.len()];
        let mut merged = Vec::new();

        for i in 0..areas.len() {
            if processed[i] {
                continue;
            }
            processed[i] = true;

            let mut polygon = areas[i].polygon.clone();
            let mut enemy_ids = areas[i].enemy_ids.clone();
            let mut absorbed = false;

            loop {
                let mut grew = false;
                for j in 0..areas.len() {
                    if processed[j] || !polygon.intersects(&areas[j].polygon) {
                        continue;
                    }

                    polygon = largest_component(polygon.union(&areas[j].polygon));
                    enemy_ids.extend(areas[j].enemy_ids.iter().cloned());
                    processed[j] = true;
                    absorbed = true;
                    grew = true;
                }
                if !grew {
                    break;
                }
            }

            if !absorbed {
                merged.push(areas[i].clone());
                continue;
            }

            enemy_ids.sort();
            enemy_ids.dedup();

            let contributing: Vec<&Enemy> = self
                .enemies
                .iter()
                .filter(|enemy| enemy_ids.contains(&enemy.id))
                .collect();
            let (score, level) = self.score(contributing.iter().copied());

            let kinds = contributing
                .iter()
                .map(|enemy| enemy.kind.to_string())
                .unique()
                .join(", ");

            merged.push(ThreatArea {
                id: format!("merged_{}", enemy_ids.iter().join("_")),
                polygon,
                level,
                score,
                description: format!("Merged threat area containing {kinds} units"),
                enemy_ids,
            });
        }

        debug!("Merged down to {} threat areas", merged.len());
        merged
    }

    /// Rebuilds the polygon overlay from the retained areas. Each
    /// covered cell takes the max of the contributions, so overlapping
    /// areas never stack and re-rasterization is idempotent.
    pub fn rasterize(&self, grid: &mut CostGrid) {
        grid.clear_overlay();

        for area in &self.areas {
            let Some(bounds) = area.polygon.bounding_rect() else {
                continue;
            };

            let (low, _) =
                grid.nearest_index(&MetricPoint::new(bounds.min().x, bounds.min().y));
            let (high, _) =
                grid.nearest_index(&MetricPoint::new(bounds.max().x, bounds.max().y));

            let contribution = area.level.overlay_contribution();
            for i in low.i..=high.i {
                for j in low.j..=high.j {
                    let index = GridIndex::new(i, j);
                    let center = grid.cell_center(index);
                    let point = geo::Point::new(center.easting, center.northing);
                    if area.polygon.contains(&point) {
                        grid.raise_overlay(index, contribution);
                    }
                }
            }
        }
    }
}
