//! Terrain costing from a digital elevation model.
//!
//! The DEM arrives as CSV rows of `(x_center, y_center, elevation)` on a
//! regular grid of UTM cell centers. Slope is computed against the true
//! metric spacing and banded into traversal costs; cells with missing
//! elevation are filled from their nearest defined neighbor so small
//! data voids do not fragment the search space.

use std::collections::VecDeque;
use std::path::Path;

use log::{debug, info};
use ndarray::Array2;
use serde::Deserialize;

use crate::grid::error::GridError;
use crate::grid::{CostGrid, GridIndex};

/// One DEM cell as read from the CSV.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DemRecord {
    pub x_center: f64,
    pub y_center: f64,
    /// Empty fields deserialize to `None` and mark the cell undefined.
    pub elevation: Option<f64>,
}

impl CostGrid {
    /// Reads a DEM CSV and builds the terrain-cost raster from it.
    /// A missing or malformed file is fatal to startup.
    pub fn from_dem_csv<P: AsRef<Path>>(path: P) -> Result<CostGrid, GridError> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<DemRecord>, _>>()?;

        info!("Loaded {} DEM cells from {:?}", records.len(), path.as_ref());
        Self::from_dem_records(&records)
    }

    pub fn from_dem_records(records: &[DemRecord]) -> Result<CostGrid, GridError> {
        if records.is_empty() {
            return Err(GridError::EmptyDem);
        }

        let xs = unique_sorted(records.iter().map(|r| r.x_center));
        let ys = unique_sorted(records.iter().map(|r| r.y_center));

        let mut elevation = Array2::from_elem((ys.len(), xs.len()), f64::NAN);
        for record in records {
            let index = GridIndex::new(
                axis_position(&ys, record.y_center),
                axis_position(&xs, record.x_center),
            );
            elevation[[index.i, index.j]] = record.elevation.unwrap_or(f64::NAN);
        }

        let slope = slope_degrees(&elevation, &xs, &ys);
        let mut terrain = slope.mapv(cost_for_slope);

        fill_voids(&mut terrain)?;

        let mut grid = CostGrid::from_parts(xs, ys, terrain)?;
        grid.elevation = elevation;
        Ok(grid)
    }
}

/// Traversal cost for a slope in degrees. Bands are half-open `[lo, hi)`;
/// 45° and above is impassable, missing data stays undefined for the
/// void-fill pass.
pub(crate) fn cost_for_slope(slope_deg: f64) -> f64 {
    match slope_deg {
        s if s.is_nan() => f64::NAN,
        s if s < 3.0 => 10.0,
        s if s < 6.0 => 30.0,
        s if s < 15.0 => 50.0,
        s if s < 30.0 => 70.0,
        s if s < 45.0 => 100.0,
        _ => f64::INFINITY,
    }
}

/// Slope in degrees from central differences against the coordinate
/// axes, one-sided at the edges.
fn slope_degrees(elevation: &Array2<f64>, xs: &[f64], ys: &[f64]) -> Array2<f64> {
    let (h, w) = elevation.dim();
    let mut slope = Array2::zeros((h, w));

    for i in 0..h {
        for j in 0..w {
            let gx = gradient_at(|k| elevation[[i, k]], xs, j, w);
            let gy = gradient_at(|k| elevation[[k, j]], ys, i, h);
            slope[[i, j]] = (gx * gx + gy * gy).sqrt().atan().to_degrees();
        }
    }

    slope
}

fn gradient_at(value: impl Fn(usize) -> f64, axis: &[f64], k: usize, len: usize) -> f64 {
    if len < 2 {
        return 0.0;
    }
    if k == 0 {
        (value(1) - value(0)) / (axis[1] - axis[0])
    } else if k == len - 1 {
        (value(k) - value(k - 1)) / (axis[k] - axis[k - 1])
    } else {
        (value(k + 1) - value(k - 1)) / (axis[k + 1] - axis[k - 1])
    }
}

/// Fills undefined (NaN) cells with the cost of their nearest defined
/// neighbor via a multi-source breadth-first sweep over the defined
/// mask. Valid-but-steep cells keep their infinite cost.
fn fill_voids(terrain: &mut Array2<f64>) -> Result<(), GridError> {
    let (h, w) = terrain.dim();
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for i in 0..h {
        for j in 0..w {
            if !terrain[[i, j]].is_nan() {
                queue.push_back((i, j));
            }
        }
    }

    if queue.is_empty() {
        return Err(GridError::EmptyDem);
    }

    let voids = h * w - queue.len();
    if voids > 0 {
        debug!("Filling {voids} undefined DEM cells from nearest neighbors");
    }

    while let Some((i, j)) = queue.pop_front() {
        let value = terrain[[i, j]];
        for (di, dj) in [(-1i32, 0i32), (1, 0), (0, -1), (0, 1), (-1, -1), (-1, 1), (1, -1), (1, 1)] {
            let (ni, nj) = (i as i32 + di, j as i32 + dj);
            if ni < 0 || nj < 0 || ni >= h as i32 || nj >= w as i32 {
                continue;
            }
            let (ni, nj) = (ni as usize, nj as usize);
            if terrain[[ni, nj]].is_nan() {
                terrain[[ni, nj]] = value;
                queue.push_back((ni, nj));
            }
        }
    }

    Ok(())
}

fn unique_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

fn axis_position(axis: &[f64], value: f64) -> usize {
    match axis.binary_search_by(|x| x.total_cmp(&value)) {
        Ok(k) => k,
        Err(k) => k.min(axis.len() - 1),
    }
}
