#![cfg(test)]

use std::time::Duration;

use approx::assert_relative_eq;

use crate::geo::GeoPoint;
use crate::mission::error::MissionError;
use crate::mission::{prepare_segments, MissionTracker};

const PERIOD: Duration = Duration::from_secs(1);

/// Four waypoints marching northeast, roughly 50 m apart.
fn waypoints() -> Vec<GeoPoint> {
    (0..4)
        .map(|k| GeoPoint::new(-105.0 + 0.0005 * k as f64, 39.0 + 0.0003 * k as f64))
        .collect()
}

async fn tick(n: usize) {
    for _ in 0..n {
        // Let a freshly spawned updater register its sleep before the
        // clock moves, so each tick fires exactly one emission.
        tokio::task::yield_now().await;
        tokio::time::advance(PERIOD).await;
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
    }
}

#[test]
fn segments_carry_one_position_per_update_plus_the_end() {
    let route = waypoints();
    let segments = prepare_segments(&route, 5.0, PERIOD);

    assert_eq!(segments.len(), 3);
    for segment in &segments {
        // ~52 m at 5 km/h is ~37 s of travel.
        assert!(segment.positions.len() > 30);

        let first = segment.positions.first().unwrap();
        let last = segment.positions.last().unwrap();
        assert_relative_eq!(first.lng, segment.start.lng, epsilon = 1e-12);
        assert_relative_eq!(last.lng, segment.end.lng, epsilon = 1e-12);
    }
}

#[test]
fn short_segments_collapse_to_the_end_position() {
    // Sub-period travel time: zero updates, a single end position.
    let route = vec![
        GeoPoint::new(-105.0, 39.0),
        GeoPoint::new(-105.000001, 39.0),
    ];
    let segments = prepare_segments(&route, 25.0, PERIOD);

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].positions.len(), 1);
    assert_relative_eq!(segments[0].positions[0].lng, route[1].lng, epsilon = 1e-12);
}

#[tokio::test(start_paused = true)]
async fn start_requires_two_waypoints() {
    let tracker = MissionTracker::new(5.0, PERIOD);
    let result = tracker.start("r1", &waypoints()[..1]);
    assert!(matches!(result, Err(MissionError::InvalidRoute)));
    assert!(tracker.current_position().is_none());
}

#[tokio::test(start_paused = true)]
async fn starting_while_running_is_a_conflict() {
    let tracker = MissionTracker::new(5.0, PERIOD);
    let route = waypoints();

    tracker.start("r1", &route).unwrap();
    let result = tracker.start("r1", &route);

    assert!(matches!(result, Err(MissionError::AlreadyMoving)));
    assert!(tracker.is_running());
}

#[tokio::test(start_paused = true)]
async fn stop_preserves_progress_and_start_resumes_it() {
    let tracker = MissionTracker::new(5.0, PERIOD);
    let route = waypoints();

    tracker.start("r1", &route).unwrap();
    assert_relative_eq!(tracker.current_position().unwrap().lng, route[0].lng);

    tick(2).await;
    tracker.stop();
    tracker.stop(); // idempotent

    let saved = tracker.progress();
    let held = tracker.current_position().unwrap();
    assert!(saved.1 > 0, "two periods should have advanced the index");

    // Paused: time passing emits nothing.
    tick(3).await;
    assert_eq!(tracker.progress(), saved);
    assert_relative_eq!(tracker.current_position().unwrap().lng, held.lng);

    // Resuming the same route continues from the saved indices.
    tracker.start("r1", &route).unwrap();
    tick(1).await;
    let resumed = tracker.progress();
    assert!(resumed > saved);
}

#[tokio::test(start_paused = true)]
async fn emissions_are_monotonic_along_the_route() {
    let tracker = MissionTracker::new(5.0, PERIOD);
    let route = waypoints();

    tracker.start("r1", &route).unwrap();

    let mut previous = tracker.current_position().unwrap();
    for _ in 0..10 {
        tick(1).await;
        let current = tracker.current_position().unwrap();
        assert!(
            current.lng >= previous.lng && current.lat >= previous.lat,
            "positions must not move backwards along a northeast route"
        );
        previous = current;
    }
}

#[tokio::test(start_paused = true)]
async fn switching_routes_resets_progress() {
    let tracker = MissionTracker::new(5.0, PERIOD);
    let route = waypoints();

    tracker.start("r1", &route).unwrap();
    tick(3).await;
    tracker.stop();
    assert!(tracker.progress().1 > 0);

    // A different route recomputes segments and starts over.
    let other: Vec<GeoPoint> = route.iter().rev().copied().collect();
    tracker.start("r2", &other).unwrap();
    assert_eq!(tracker.progress(), (0, 0));
    assert_relative_eq!(tracker.current_position().unwrap().lng, other[0].lng);
}

#[tokio::test(start_paused = true)]
async fn completion_returns_to_idle_with_reset_indices() {
    let tracker = MissionTracker::new(25.0, PERIOD);
    // Two waypoints a hair apart: one segment, one emission.
    let route = vec![
        GeoPoint::new(-105.0, 39.0),
        GeoPoint::new(-105.000001, 39.0),
    ];

    tracker.start("r1", &route).unwrap();
    tick(2).await;

    assert!(!tracker.is_running());
    assert_eq!(tracker.progress(), (0, 0));
    // The last position is held after completion.
    assert_relative_eq!(
        tracker.current_position().unwrap().lng,
        route[1].lng,
        epsilon = 1e-12
    );
}
