#![cfg(test)]

use approx::assert_relative_eq;
use geo::LineString;
use ndarray::Array2;

use crate::geo::MetricPoint;
use crate::grid::dem::cost_for_slope;
use crate::grid::roads::sample_by_arc_length;
use crate::grid::{CostGrid, DemRecord, GridIndex};

/// A `rows × cols` DEM with 10 m spacing and elevation from a closure.
fn dem(rows: usize, cols: usize, z: impl Fn(usize, usize) -> Option<f64>) -> Vec<DemRecord> {
    let mut records = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            records.push(DemRecord {
                x_center: 500_000.0 + 10.0 * j as f64,
                y_center: 4_000_000.0 + 10.0 * i as f64,
                elevation: z(i, j),
            });
        }
    }
    records
}

fn flat_grid(rows: usize, cols: usize, spacing: f64, cost: f64) -> CostGrid {
    let xs = (0..cols).map(|j| 500_000.0 + spacing * j as f64).collect();
    let ys = (0..rows).map(|i| 4_000_000.0 + spacing * i as f64).collect();
    CostGrid::from_parts(xs, ys, Array2::from_elem((rows, cols), cost)).unwrap()
}

#[test]
fn slope_bands_are_half_open() {
    assert_relative_eq!(cost_for_slope(0.0), 10.0);
    assert_relative_eq!(cost_for_slope(2.999), 10.0);
    assert_relative_eq!(cost_for_slope(3.0), 30.0);
    assert_relative_eq!(cost_for_slope(6.0), 50.0);
    assert_relative_eq!(cost_for_slope(15.0), 70.0);
    assert_relative_eq!(cost_for_slope(30.0), 100.0);
    assert!(cost_for_slope(45.0).is_infinite());
    assert!(cost_for_slope(89.0).is_infinite());
    assert!(cost_for_slope(f64::NAN).is_nan());
}

#[test]
fn flat_dem_costs_ten_everywhere() {
    let grid = CostGrid::from_dem_records(&dem(3, 3, |_, _| Some(0.0))).unwrap();

    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(grid.terrain_cost(GridIndex::new(i, j)), 10.0);
        }
    }
}

#[test]
fn tilted_plane_lands_in_the_matching_band() {
    // z = x · tan(10°) gives a uniform 10° slope, squarely in [6, 15).
    let gradient = 10.0f64.to_radians().tan();
    let grid =
        CostGrid::from_dem_records(&dem(4, 4, |_, j| Some(10.0 * j as f64 * gradient))).unwrap();

    for i in 0..4 {
        for j in 0..4 {
            assert_relative_eq!(grid.terrain_cost(GridIndex::new(i, j)), 50.0);
        }
    }
}

#[test]
fn steep_valid_terrain_stays_impassable() {
    let gradient = 50.0f64.to_radians().tan();
    let grid =
        CostGrid::from_dem_records(&dem(3, 3, |_, j| Some(10.0 * j as f64 * gradient))).unwrap();

    for i in 0..3 {
        for j in 0..3 {
            assert!(grid.terrain_cost(GridIndex::new(i, j)).is_infinite());
        }
    }
}

#[test_log::test]
fn missing_elevation_is_filled_from_neighbors() {
    let grid = CostGrid::from_dem_records(&dem(3, 3, |i, j| {
        (i != 1 || j != 1).then_some(0.0)
    }))
    .unwrap();

    // The void picks up a finite cost from the flat ring around it.
    let filled = grid.terrain_cost(GridIndex::new(1, 1));
    assert!(filled.is_finite(), "void was not filled: {filled}");
}

#[test]
fn non_uniform_axis_is_rejected() {
    let mut records = dem(3, 3, |_, _| Some(0.0));
    for record in records.iter_mut() {
        if record.x_center > 500_010.0 {
            record.x_center += 5.0;
        }
    }

    assert!(CostGrid::from_dem_records(&records).is_err());
}

#[test]
fn nearest_index_round_trips_cell_centers() {
    let grid = flat_grid(4, 5, 10.0, 10.0);

    for i in 0..4 {
        for j in 0..5 {
            let index = GridIndex::new(i, j);
            let (found, in_bounds) = grid.nearest_index(&grid.cell_center(index));
            assert!(in_bounds);
            assert_eq!(found, index);
        }
    }
}

#[test]
fn out_of_range_points_clamp_and_flag() {
    let grid = flat_grid(3, 3, 10.0, 10.0);

    let (index, in_bounds) = grid.nearest_index(&MetricPoint::new(499_000.0, 3_999_000.0));
    assert!(!in_bounds);
    assert_eq!(index, GridIndex::new(0, 0));

    let (index, in_bounds) = grid.nearest_index(&MetricPoint::new(501_000.0, 4_001_000.0));
    assert!(!in_bounds);
    assert_eq!(index, GridIndex::new(2, 2));
}

#[test]
fn effective_cost_is_the_sum_of_the_three_layers() {
    let mut grid = flat_grid(3, 3, 10.0, 10.0);
    let index = GridIndex::new(1, 1);

    grid.raise_overlay(index, 50.0);
    grid.add_penalty_around(&[grid.cell_center(index)], 1.0, 1000.0);

    assert_relative_eq!(grid.effective_cost(index), 10.0 + 50.0 + 1000.0);
    assert_relative_eq!(
        grid.effective_cost(GridIndex::new(0, 1)),
        10.0,
        epsilon = 1e-12
    );

    grid.clear_penalty();
    assert!(grid.penalty_is_clear());
    assert_relative_eq!(grid.effective_cost(index), 60.0);
}

#[test]
fn diagonal_moves_scale_by_sqrt_two() {
    let grid = flat_grid(3, 3, 10.0, 10.0);

    let straight = grid.move_cost(GridIndex::new(0, 0), GridIndex::new(0, 1));
    let diagonal = grid.move_cost(GridIndex::new(0, 0), GridIndex::new(1, 1));

    assert_relative_eq!(straight, 10.0);
    assert_relative_eq!(diagonal, 10.0 * std::f64::consts::SQRT_2);
}

#[test]
fn penalty_stamp_respects_the_radius() {
    let mut grid = flat_grid(5, 5, 10.0, 10.0);
    let center = grid.cell_center(GridIndex::new(2, 2));

    grid.add_penalty_around(&[center], 15.0, 1000.0);

    // Orthogonal neighbors are 10 m away, corners ~14.1 m, the next
    // ring is out of range.
    assert_relative_eq!(grid.penalty_cost(GridIndex::new(2, 2)), 1000.0);
    assert_relative_eq!(grid.penalty_cost(GridIndex::new(2, 1)), 1000.0);
    assert_relative_eq!(grid.penalty_cost(GridIndex::new(1, 1)), 1000.0);
    assert_relative_eq!(grid.penalty_cost(GridIndex::new(2, 0)), 0.0);
    assert_relative_eq!(grid.penalty_cost(GridIndex::new(0, 0)), 0.0);
}

#[test]
fn road_cells_are_discounted_once() {
    let mut grid = flat_grid(5, 5, 10.0, 10.0);
    let row2 = grid.cell_center(GridIndex::new(2, 0)).northing;

    // One polyline straight along row 2, sampled far denser than the
    // cell size.
    let road = LineString::from(vec![
        (500_000.0, row2),
        (500_040.0, row2),
    ]);
    grid.apply_roads(&[road], 1.0, 15.0);

    for j in 0..5 {
        let index = GridIndex::new(2, j);
        assert!(grid.is_road(index));
        assert_relative_eq!(grid.terrain_cost(index), 0.0);
    }
    assert_relative_eq!(grid.terrain_cost(GridIndex::new(1, 0)), 10.0);
}

#[test]
fn arc_length_sampling_uses_the_requested_spacing() {
    let line = LineString::from(vec![(0.0, 0.0), (100.0, 0.0)]);
    let samples = sample_by_arc_length(&line, 10.0);

    assert_eq!(samples.len(), 10);
    assert_relative_eq!(samples[0].easting, 0.0);
    assert_relative_eq!(samples[9].easting, 90.0);
}
