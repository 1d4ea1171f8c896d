use crate::geo::error::GeoError;

#[derive(Debug)]
pub enum ThreatError {
    /// An enemy report must carry at least one location.
    EmptyLocation(String),
    Geo(GeoError),
}

impl From<GeoError> for ThreatError {
    fn from(value: GeoError) -> Self {
        ThreatError::Geo(value)
    }
}
