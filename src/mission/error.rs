#[derive(Debug)]
pub enum MissionError {
    /// `start` while a mission is running; state is left unchanged.
    AlreadyMoving,
    /// A route needs at least two waypoints.
    InvalidRoute,
}
