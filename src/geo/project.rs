//! Projection between geodetic WGS84 and a fixed UTM zone.

use crate::geo::error::GeoError;
use crate::geo::{GeoPoint, MetricPoint};

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;

const SCALE: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Forward and inverse transverse-Mercator projection for a single UTM
/// zone, using the Krüger series expansion.
///
/// The zone is fixed at construction and must bracket every coordinate
/// the engine will ever see; there is no cross-zone stitching.
///
/// ### Example
/// ```rust
/// use overland::geo::{GeoPoint, Projector};
///
/// let projector = Projector::new(13, true).unwrap();
/// let metric = projector.to_metric(&GeoPoint::new(-105.0, 39.0)).unwrap();
/// // -105° is the central meridian of zone 13, so the easting is the
/// // false easting of 500 km.
/// assert!((metric.easting - 500_000.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    zone: u8,
    north: bool,
    /// Central meridian of the zone, degrees.
    lng0: f64,
    /// Rectifying radius `A`.
    radius: f64,
    /// Third flattening `n`.
    n: f64,
}

impl Projector {
    pub fn new(zone: u8, north: bool) -> Result<Projector, GeoError> {
        if zone == 0 || zone > 60 {
            return Err(GeoError::InvalidZone(zone));
        }

        let n = WGS84_F / (2.0 - WGS84_F);
        let radius = WGS84_A / (1.0 + n) * (1.0 + n * n / 4.0 + n.powi(4) / 64.0);

        Ok(Projector {
            zone,
            north,
            lng0: (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0,
            radius,
            n,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// Forward projection of a geodetic point into zone meters.
    pub fn to_metric(&self, point: &GeoPoint) -> Result<MetricPoint, GeoError> {
        if !(-180.0..=180.0).contains(&point.lng) || !(-90.0..=90.0).contains(&point.lat) {
            return Err(GeoError::InvalidCoordinate(point.lng, point.lat));
        }

        let n = self.n;
        let alpha = [
            n / 2.0 - 2.0 * n * n / 3.0 + 5.0 * n.powi(3) / 16.0,
            13.0 * n * n / 48.0 - 3.0 * n.powi(3) / 5.0,
            61.0 * n.powi(3) / 240.0,
        ];

        let phi = point.lat.to_radians();
        let lambda = (point.lng - self.lng0).to_radians();

        // Conformal latitude.
        let c = 2.0 * n.sqrt() / (1.0 + n);
        let t = (phi.sin().atanh() - c * (c * phi.sin()).atanh()).sinh();

        let xi = t.atan2(lambda.cos());
        let eta = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let (mut easting, mut northing) = (eta, xi);
        for (j, a) in alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            easting += a * (k * xi).cos() * (k * eta).sinh();
            northing += a * (k * xi).sin() * (k * eta).cosh();
        }

        let false_northing = if self.north { 0.0 } else { FALSE_NORTHING_SOUTH };

        Ok(MetricPoint {
            easting: FALSE_EASTING + SCALE * self.radius * easting,
            northing: false_northing + SCALE * self.radius * northing,
        })
    }

    /// Inverse projection of zone meters back to a geodetic point.
    pub fn to_geo(&self, point: &MetricPoint) -> GeoPoint {
        let n = self.n;
        let beta = [
            n / 2.0 - 2.0 * n * n / 3.0 + 37.0 * n.powi(3) / 96.0,
            n * n / 48.0 + n.powi(3) / 15.0,
            17.0 * n.powi(3) / 480.0,
        ];
        let delta = [
            2.0 * n - 2.0 * n * n / 3.0 - 2.0 * n.powi(3),
            7.0 * n * n / 3.0 - 8.0 * n.powi(3) / 5.0,
            56.0 * n.powi(3) / 15.0,
        ];

        let false_northing = if self.north { 0.0 } else { FALSE_NORTHING_SOUTH };
        let xi = (point.northing - false_northing) / (SCALE * self.radius);
        let eta = (point.easting - FALSE_EASTING) / (SCALE * self.radius);

        let (mut xi_p, mut eta_p) = (xi, eta);
        for (j, b) in beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, d) in delta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            phi += d * (k * chi).sin();
        }

        let lambda = eta_p.sinh().atan2(xi_p.cos());

        GeoPoint::new(self.lng0 + lambda.to_degrees(), phi.to_degrees())
    }
}
