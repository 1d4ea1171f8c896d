use crate::geo::error::GeoError;
use crate::grid::error::GridError;
use crate::mission::error::MissionError;
use crate::threat::error::ThreatError;

pub mod config;
pub mod geo;
pub mod grid;
pub mod mission;
pub mod plan;
pub mod server;
pub mod threat;

#[derive(Debug)]
pub enum Error {
    Geo(GeoError),
    Grid(GridError),
    Threat(ThreatError),
    Mission(MissionError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Converts errors from their submodule error type into a
/// crate-level [`Error`] variant.
macro_rules! impl_err {
    ($from:ty, $variant:ident) => {
        impl From<$from> for Error {
            fn from(value: $from) -> Self {
                Error::$variant(value)
            }
        }
    };
}

impl_err!(GeoError, Geo);
impl_err!(GridError, Grid);
impl_err!(ThreatError, Threat);
impl_err!(MissionError, Mission);
