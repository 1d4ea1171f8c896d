//! Road-aware cost discounting.
//!
//! Roads arrive as a CSV with a `geometry` column of WKT `LINESTRING`s
//! in the same metric coordinates as the DEM. Each polyline is sampled
//! at a fixed arc-length spacing; every cell a sample lands in has its
//! terrain cost reduced once, floored at zero.

use std::path::Path;

use geo::LineString;
use log::{info, warn};
use serde::Deserialize;
use wkt::TryFromWkt;

use crate::geo::MetricPoint;
use crate::grid::error::GridError;
use crate::grid::CostGrid;

#[derive(Debug, Deserialize)]
struct RoadRecord {
    geometry: String,
}

/// Reads road polylines from a CSV `geometry` column. Rows that do not
/// carry a `LINESTRING` are skipped with a warning rather than failing
/// the load.
pub fn load_roads_csv<P: AsRef<Path>>(path: P) -> Result<Vec<LineString<f64>>, GridError> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut roads = Vec::new();

    for record in reader.deserialize() {
        let record: RoadRecord = record?;
        match LineString::try_from_wkt_str(&record.geometry) {
            Ok(line) => roads.push(line),
            Err(err) => warn!("Skipping road row with unusable geometry: {err:?}"),
        }
    }

    info!("Loaded {} road polylines from {:?}", roads.len(), path.as_ref());
    Ok(roads)
}

impl CostGrid {
    /// Marks every cell touched by a road sample and reduces its terrain
    /// cost by `reduction`, floored at zero. Cells are discounted at
    /// most once no matter how many samples land in them.
    pub fn apply_roads(&mut self, roads: &[LineString<f64>], spacing: f64, reduction: f64) {
        let mut marked = 0usize;

        for road in roads {
            for sample in sample_by_arc_length(road, spacing) {
                let (index, in_bounds) = self.nearest_index(&sample);
                if in_bounds && !self.roads[[index.i, index.j]] {
                    self.roads[[index.i, index.j]] = true;
                    marked += 1;
                }
            }
        }

        for (cell, &road) in self.terrain.iter_mut().zip(self.roads.iter()) {
            if road && cell.is_finite() {
                *cell = (*cell - reduction).max(0.0);
            }
        }

        info!("Marked {marked} road cells");
    }
}

/// Points along a polyline every `spacing` meters of arc length,
/// starting at the first vertex. A degenerate line yields its vertices.
pub(crate) fn sample_by_arc_length(line: &LineString<f64>, spacing: f64) -> Vec<MetricPoint> {
    let coords: Vec<MetricPoint> = line.coords().map(|&c| c.into()).collect();
    if coords.len() < 2 || spacing <= 0.0 {
        return coords;
    }

    let mut samples = Vec::new();
    let mut target = 0.0f64;
    let mut walked = 0.0f64;

    for pair in coords.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (dx, dy) = (b.easting - a.easting, b.northing - a.northing);
        let length = (dx * dx + dy * dy).sqrt();

        while target < walked + length {
            let fraction = if length > 0.0 {
                (target - walked) / length
            } else {
                0.0
            };
            samples.push(MetricPoint::new(
                a.easting + dx * fraction,
                a.northing + dy * fraction,
            ));
            target += spacing;
        }

        walked += length;
    }

    samples
}
