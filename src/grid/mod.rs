//! The traversal-cost raster.
//!
//! A [`CostGrid`] owns three additive layers over the same rectangular
//! raster: the terrain cost derived from the DEM (and discounted along
//! roads), the threat-polygon overlay, and the transient path-penalty
//! layer the planner uses to spread alternative routes apart. The
//! per-cell cost seen by the search is always the sum of the three.

use ndarray::Array2;

use crate::geo::MetricPoint;
use crate::grid::error::GridError;

pub mod dem;
#[doc(hidden)]
pub mod error;
pub mod roads;
#[doc(hidden)]
mod test;

#[doc(inline)]
pub use dem::DemRecord;

/// A raster cell address: `i` indexes the northing axis (row), `j` the
/// easting axis (column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridIndex {
    pub i: usize,
    pub j: usize,
}

impl GridIndex {
    pub fn new(i: usize, j: usize) -> Self {
        GridIndex { i, j }
    }

    /// Whether two cells are distinct 8-neighbors.
    pub fn adjacent(&self, other: &GridIndex) -> bool {
        self != other
            && self.i.abs_diff(other.i) <= 1
            && self.j.abs_diff(other.j) <= 1
    }
}

const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

pub struct CostGrid {
    /// Easting cell centers, strictly increasing and uniformly spaced.
    xs: Vec<f64>,
    /// Northing cell centers, strictly increasing and uniformly spaced.
    ys: Vec<f64>,
    elevation: Array2<f64>,
    terrain: Array2<f64>,
    overlay: Array2<f64>,
    penalty: Array2<f64>,
    roads: Array2<bool>,
}

impl CostGrid {
    /// Builds a grid over an existing terrain-cost raster, for callers
    /// that compute costs out-of-band. `terrain` is shaped `(H, W)` with
    /// row `i` at `ys[i]` and column `j` at `xs[j]`.
    pub fn from_parts(xs: Vec<f64>, ys: Vec<f64>, terrain: Array2<f64>) -> Result<Self, GridError> {
        validate_axis(&xs, "easting")?;
        validate_axis(&ys, "northing")?;

        if terrain.dim() != (ys.len(), xs.len()) {
            return Err(GridError::ShapeMismatch {
                expected: (ys.len(), xs.len()),
                got: terrain.dim(),
            });
        }

        let shape = terrain.dim();
        Ok(CostGrid {
            xs,
            ys,
            elevation: Array2::zeros(shape),
            terrain,
            overlay: Array2::zeros(shape),
            penalty: Array2::zeros(shape),
            roads: Array2::from_elem(shape, false),
        })
    }

    pub fn height(&self) -> usize {
        self.ys.len()
    }

    pub fn width(&self) -> usize {
        self.xs.len()
    }

    /// Cell spacing along easting and northing, meters.
    pub fn spacing(&self) -> (f64, f64) {
        let dx = if self.xs.len() > 1 {
            self.xs[1] - self.xs[0]
        } else {
            1.0
        };
        let dy = if self.ys.len() > 1 {
            self.ys[1] - self.ys[0]
        } else {
            1.0
        };
        (dx, dy)
    }

    pub fn cell_center(&self, index: GridIndex) -> MetricPoint {
        MetricPoint::new(self.xs[index.j], self.ys[index.i])
    }

    /// The cell whose center is closest to the given metric point.
    ///
    /// Out-of-range inputs clamp to the boundary; the flag reports
    /// whether the point actually fell inside the raster footprint so
    /// the planner can refuse it.
    pub fn nearest_index(&self, point: &MetricPoint) -> (GridIndex, bool) {
        let (dx, dy) = self.spacing();

        let j = nearest_on_axis(&self.xs, point.easting);
        let i = nearest_on_axis(&self.ys, point.northing);

        let in_x = point.easting >= self.xs[0] - dx / 2.0
            && point.easting <= self.xs[self.xs.len() - 1] + dx / 2.0;
        let in_y = point.northing >= self.ys[0] - dy / 2.0
            && point.northing <= self.ys[self.ys.len() - 1] + dy / 2.0;

        (GridIndex::new(i, j), in_x && in_y)
    }

    pub fn elevation(&self, index: GridIndex) -> f64 {
        self.elevation[[index.i, index.j]]
    }

    pub fn terrain_cost(&self, index: GridIndex) -> f64 {
        self.terrain[[index.i, index.j]]
    }

    pub fn overlay_cost(&self, index: GridIndex) -> f64 {
        self.overlay[[index.i, index.j]]
    }

    pub fn penalty_cost(&self, index: GridIndex) -> f64 {
        self.penalty[[index.i, index.j]]
    }

    pub fn is_road(&self, index: GridIndex) -> bool {
        self.roads[[index.i, index.j]]
    }

    /// Terrain + polygon overlay + path penalty for one cell.
    pub fn effective_cost(&self, index: GridIndex) -> f64 {
        self.terrain[[index.i, index.j]]
            + self.overlay[[index.i, index.j]]
            + self.penalty[[index.i, index.j]]
    }

    /// Cost of stepping into `to` from `from`. Diagonal entry scales the
    /// destination cost by √2; an infinite destination forbids the move.
    pub fn move_cost(&self, from: GridIndex, to: GridIndex) -> f64 {
        let cost = self.effective_cost(to);
        if from.i != to.i && from.j != to.j {
            cost * std::f64::consts::SQRT_2
        } else {
            cost
        }
    }

    pub fn neighbors(&self, index: GridIndex) -> impl Iterator<Item = GridIndex> + '_ {
        let (h, w) = (self.height(), self.width());
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(di, dj)| {
            let ni = index.i.checked_add_signed(di)?;
            let nj = index.j.checked_add_signed(dj)?;
            (ni < h && nj < w).then_some(GridIndex::new(ni, nj))
        })
    }

    /// Smallest finite per-cell cost, used to scale the A* heuristic.
    pub fn min_finite_cost(&self) -> Option<f64> {
        let mut min: Option<f64> = None;
        for i in 0..self.height() {
            for j in 0..self.width() {
                let cost = self.effective_cost(GridIndex::new(i, j));
                if cost.is_finite() && min.is_none_or(|m| cost < m) {
                    min = Some(cost);
                }
            }
        }
        min
    }

    /// Stamps `amount` onto the penalty layer for every cell whose
    /// center lies within `radius` meters of any of the given points.
    /// Each cell is stamped at most once per call.
    pub fn add_penalty_around(&mut self, points: &[MetricPoint], radius: f64, amount: f64) {
        let mut mask = Array2::from_elem(self.terrain.dim(), false);
        let (dx, dy) = self.spacing();
        let (span_i, span_j) = ((radius / dy).ceil() as usize, (radius / dx).ceil() as usize);

        for point in points {
            let (center, _) = self.nearest_index(point);
            let i_lo = center.i.saturating_sub(span_i);
            let i_hi = (center.i + span_i).min(self.height() - 1);
            let j_lo = center.j.saturating_sub(span_j);
            let j_hi = (center.j + span_j).min(self.width() - 1);

            for i in i_lo..=i_hi {
                for j in j_lo..=j_hi {
                    let dist_x = self.xs[j] - point.easting;
                    let dist_y = self.ys[i] - point.northing;
                    if dist_x * dist_x + dist_y * dist_y < radius * radius {
                        mask[[i, j]] = true;
                    }
                }
            }
        }

        for (cell, &hit) in self.penalty.iter_mut().zip(mask.iter()) {
            if hit {
                *cell += amount;
            }
        }
    }

    pub fn clear_penalty(&mut self) {
        self.penalty.fill(0.0);
    }

    /// Holds outside of a planning call.
    pub fn penalty_is_clear(&self) -> bool {
        self.penalty.iter().all(|&p| p == 0.0)
    }

    /// Raises the polygon overlay of one cell to at least `value`.
    /// Taking the max keeps re-rasterization idempotent.
    pub(crate) fn raise_overlay(&mut self, index: GridIndex, value: f64) {
        let cell = &mut self.overlay[[index.i, index.j]];
        if value > *cell {
            *cell = value;
        }
    }

    pub(crate) fn clear_overlay(&mut self) {
        self.overlay.fill(0.0);
    }
}

fn nearest_on_axis(axis: &[f64], value: f64) -> usize {
    match axis.binary_search_by(|x| x.total_cmp(&value)) {
        Ok(k) => k,
        Err(0) => 0,
        Err(k) if k == axis.len() => axis.len() - 1,
        Err(k) => {
            if value - axis[k - 1] <= axis[k] - value {
                k - 1
            } else {
                k
            }
        }
    }
}

fn validate_axis(axis: &[f64], name: &'static str) -> Result<(), GridError> {
    if axis.is_empty() {
        return Err(GridError::EmptyDem);
    }
    if axis.len() < 2 {
        return Ok(());
    }

    let step = axis[1] - axis[0];
    if step <= 0.0 {
        return Err(GridError::NonUniformAxis(name));
    }

    for pair in axis.windows(2) {
        let delta = pair[1] - pair[0];
        if (delta - step).abs() > step * 1e-6 {
            return Err(GridError::NonUniformAxis(name));
        }
    }

    Ok(())
}
