//! Deterministic 8-connected A* over the cost raster.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use crate::grid::{CostGrid, GridIndex};

/// Frontier entries order by priority, then by insertion counter, so
/// ties never fall through to node identity and a given grid always
/// searches in the same order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    priority: OrderedFloat<f64>,
    counter: u64,
    node: GridIndex,
}

/// Least-cost path between two cells, or `None` when the goal is
/// unreachable. The `cost_so_far` map doubles as the closed set: a node
/// is closed once a better cost has been recorded for it.
pub(crate) fn search(
    grid: &CostGrid,
    start: GridIndex,
    goal: GridIndex,
) -> Option<(Vec<GridIndex>, f64)> {
    if !grid.effective_cost(start).is_finite() || !grid.effective_cost(goal).is_finite() {
        return None;
    }

    // Scaling the Euclidean heuristic by the cheapest cell on the grid
    // keeps it admissible: every step into a cell costs at least that
    // much per unit of grid distance.
    let min_cost = grid.min_finite_cost()?;
    let heuristic = |node: GridIndex| {
        let di = node.i.abs_diff(goal.i) as f64;
        let dj = node.j.abs_diff(goal.j) as f64;
        min_cost * (di * di + dj * dj).sqrt()
    };

    let mut counter = 0u64;
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse(Frontier {
        priority: OrderedFloat(0.0),
        counter,
        node: start,
    }));

    let mut came_from: FxHashMap<GridIndex, Option<GridIndex>> = FxHashMap::default();
    let mut cost_so_far: FxHashMap<GridIndex, f64> = FxHashMap::default();
    came_from.insert(start, None);
    cost_so_far.insert(start, 0.0);

    while let Some(Reverse(Frontier { node: current, .. })) = frontier.pop() {
        if current == goal {
            break;
        }

        let current_cost = cost_so_far[&current];
        for next in grid.neighbors(current) {
            let move_cost = grid.move_cost(current, next);
            if !move_cost.is_finite() {
                continue;
            }

            let new_cost = current_cost + move_cost;
            if cost_so_far.get(&next).is_none_or(|&c| new_cost < c) {
                cost_so_far.insert(next, new_cost);
                counter += 1;
                frontier.push(Reverse(Frontier {
                    priority: OrderedFloat(new_cost + heuristic(next)),
                    counter,
                    node: next,
                }));
                came_from.insert(next, Some(current));
            }
        }
    }

    let cost = *cost_so_far.get(&goal)?;

    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&Some(previous)) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();

    Some((path, cost))
}
