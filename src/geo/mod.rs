//! Geodetic and projected coordinate handling.
//!
//! Every component downstream of this module works in projected metric
//! coordinates; geodetic positions enter and leave the engine only
//! through the [`Projector`].

pub const MEAN_EARTH_RADIUS: f64 = 6371008.8;

#[doc(hidden)]
pub mod error;
pub mod project;
#[doc(hidden)]
mod test;

#[doc(inline)]
pub use project::Projector;

/// A geodetic position in degrees, WGS84.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
    pub alt: Option<f64>,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        GeoPoint {
            lng,
            lat,
            alt: None,
        }
    }

    pub fn with_alt(lng: f64, lat: f64, alt: f64) -> Self {
        GeoPoint {
            lng,
            lat,
            alt: Some(alt),
        }
    }
}

/// A projected position, meters easting/northing in the engine's UTM zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPoint {
    pub easting: f64,
    pub northing: f64,
}

impl MetricPoint {
    pub fn new(easting: f64, northing: f64) -> Self {
        MetricPoint { easting, northing }
    }
}

impl From<MetricPoint> for geo::Coord<f64> {
    fn from(value: MetricPoint) -> Self {
        geo::coord! { x: value.easting, y: value.northing }
    }
}

impl From<geo::Coord<f64>> for MetricPoint {
    fn from(value: geo::Coord<f64>) -> Self {
        MetricPoint {
            easting: value.x,
            northing: value.y,
        }
    }
}

/// Great-circle distance between two geodetic points, in meters.
pub fn haversine_distance(lhs: &GeoPoint, rhs: &GeoPoint) -> f64 {
    let phi1 = lhs.lat.to_radians();
    let phi2 = rhs.lat.to_radians();
    let delta_phi = (rhs.lat - lhs.lat).to_radians();
    let delta_lambda = (rhs.lng - lhs.lng).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();
    MEAN_EARTH_RADIUS * c
}

/// Linear interpolation between two geodetic points by a fraction in [0, 1].
pub fn interpolate(start: &GeoPoint, end: &GeoPoint, fraction: f64) -> GeoPoint {
    GeoPoint::new(
        start.lng + (end.lng - start.lng) * fraction,
        start.lat + (end.lat - start.lat) * fraction,
    )
}
