//! Blue-force mission tracking.
//!
//! A mission interpolates a unit along a selected route at a fixed
//! cadence. Segments and their positions are pre-computed when a route
//! is loaded; the updater task then emits one position per period,
//! checking a run generation under the mission lock before every
//! emission so a stop or a route switch takes effect at the next
//! period boundary. The lock is never held across a suspension.

#[doc(hidden)]
pub mod error;
#[doc(hidden)]
mod test;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};

use crate::geo::{haversine_distance, interpolate, GeoPoint};
use crate::mission::error::MissionError;

/// One leg of a route with its pre-computed emission positions.
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// `updates + 1` positions from start to end inclusive.
    pub positions: Vec<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Paused,
}

#[derive(Debug)]
struct MissionState {
    phase: Phase,
    route_id: Option<String>,
    segments: Vec<Segment>,
    segment_index: usize,
    position_index: usize,
    position: Option<GeoPoint>,
    /// Bumped on every `start`; a stale updater exits at its next tick.
    run: u64,
}

pub struct MissionTracker {
    state: Arc<Mutex<MissionState>>,
    speed_kmh: f64,
    period: Duration,
}

impl MissionTracker {
    pub fn new(speed_kmh: f64, period: Duration) -> Self {
        MissionTracker {
            state: Arc::new(Mutex::new(MissionState {
                phase: Phase::Idle,
                route_id: None,
                segments: Vec::new(),
                segment_index: 0,
                position_index: 0,
                position: None,
                run: 0,
            })),
            speed_kmh,
            period,
        }
    }

    /// Starts or resumes a mission along the given route.
    ///
    /// Starting while running is a conflict and changes nothing.
    /// Starting the paused route resumes from the saved indices; any
    /// other route is prepared fresh.
    pub fn start(&self, route_id: &str, waypoints: &[GeoPoint]) -> Result<(), MissionError> {
        let mut state = self.state.lock().unwrap();

        match state.phase {
            Phase::Running => return Err(MissionError::AlreadyMoving),
            Phase::Paused if state.route_id.as_deref() == Some(route_id) => {
                info!(
                    "Resuming route {route_id} at segment {} position {}",
                    state.segment_index, state.position_index
                );
            }
            _ => {
                if waypoints.len() < 2 {
                    return Err(MissionError::InvalidRoute);
                }

                state.segments = prepare_segments(waypoints, self.speed_kmh, self.period);
                state.segment_index = 0;
                state.position_index = 0;
                state.position = Some(waypoints[0]);
                info!(
                    "Route {route_id} prepared with {} segments",
                    state.segments.len()
                );
            }
        }

        state.phase = Phase::Running;
        state.route_id = Some(route_id.to_string());
        state.run += 1;
        let run = state.run;
        drop(state);

        let state = Arc::clone(&self.state);
        let period = self.period;
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;

                let mut state = state.lock().unwrap();
                if state.run != run || state.phase != Phase::Running {
                    return;
                }

                let Some(position) = state
                    .segments
                    .get(state.segment_index)
                    .and_then(|segment| segment.positions.get(state.position_index))
                    .copied()
                else {
                    state.phase = Phase::Idle;
                    state.segment_index = 0;
                    state.position_index = 0;
                    return;
                };

                state.position = Some(position);
                state.position_index += 1;

                if state.position_index >= state.segments[state.segment_index].positions.len() {
                    debug!("Reached waypoint {:?}", state.segments[state.segment_index].end);
                    state.segment_index += 1;
                    state.position_index = 0;

                    if state.segment_index >= state.segments.len() {
                        info!("Mission complete");
                        state.phase = Phase::Idle;
                        state.segment_index = 0;
                        return;
                    }
                }
            }
        });

        Ok(())
    }

    /// Pauses the mission, preserving progress. Idempotent; a mission
    /// that never started stays idle.
    pub fn stop(&self) {
        let mut state = self.state.lock().unwrap();
        if state.phase == Phase::Running {
            info!(
                "Pausing at segment {} position {}",
                state.segment_index, state.position_index
            );
            state.phase = Phase::Paused;
        }
    }

    /// The last emitted position, `None` before any mission started.
    pub fn current_position(&self) -> Option<GeoPoint> {
        self.state.lock().unwrap().position
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().unwrap().phase == Phase::Running
    }

    /// Saved `(segment_index, position_index)` progress.
    pub fn progress(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.segment_index, state.position_index)
    }
}

/// Pre-computes per-segment travel time and interpolated positions: at
/// speed `v` a segment of haversine length `d` takes `d / v`, which at
/// one emission per period gives `floor(t / Δ)` updates and one extra
/// position for the segment end.
fn prepare_segments(waypoints: &[GeoPoint], speed_kmh: f64, period: Duration) -> Vec<Segment> {
    let speed = speed_kmh / 3.6;

    waypoints
        .windows(2)
        .map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let distance = haversine_distance(&start, &end);
            let travel_time = distance / speed;
            let updates = (travel_time / period.as_secs_f64()).floor() as usize;

            let positions = (0..=updates)
                .map(|step| {
                    let fraction = if updates > 0 {
                        step as f64 / updates as f64
                    } else {
                        1.0
                    };
                    interpolate(&start, &end, fraction)
                })
                .collect();

            Segment {
                start,
                end,
                positions,
            }
        })
        .collect()
}
