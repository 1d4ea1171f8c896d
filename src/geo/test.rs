#![cfg(test)]

use crate::geo::{haversine_distance, interpolate, GeoPoint, Projector};
use approx::assert_relative_eq;

#[test]
fn central_meridian_projects_to_false_easting() {
    let projector = Projector::new(13, true).unwrap();
    let metric = projector
        .to_metric(&GeoPoint::new(-105.0, 39.0))
        .unwrap();

    assert_relative_eq!(metric.easting, 500_000.0, epsilon = 0.01);
    // Meridian arc from the equator to 39°N is a little over 4,300 km.
    assert!(metric.northing > 4.30e6 && metric.northing < 4.33e6);
}

#[test]
fn round_trip_stays_within_a_microdegree() {
    let projector = Projector::new(13, true).unwrap();

    for &(lng, lat) in &[
        (-105.0, 39.0),
        (-104.5, 38.2),
        (-107.9, 41.0),
        (-102.1, 36.5),
    ] {
        let metric = projector.to_metric(&GeoPoint::new(lng, lat)).unwrap();
        let back = projector.to_geo(&metric);

        assert_relative_eq!(back.lng, lng, epsilon = 1e-6);
        assert_relative_eq!(back.lat, lat, epsilon = 1e-6);
    }
}

#[test]
fn southern_hemisphere_round_trip() {
    let projector = Projector::new(56, false).unwrap();
    let sydney = GeoPoint::new(151.2, -33.87);

    let metric = projector.to_metric(&sydney).unwrap();
    assert!(metric.northing > 0.0, "southern northings carry the false offset");

    let back = projector.to_geo(&metric);
    assert_relative_eq!(back.lng, sydney.lng, epsilon = 1e-6);
    assert_relative_eq!(back.lat, sydney.lat, epsilon = 1e-6);
}

#[test]
fn rejects_invalid_zone_and_coordinates() {
    assert!(Projector::new(0, true).is_err());
    assert!(Projector::new(61, true).is_err());

    let projector = Projector::new(13, true).unwrap();
    assert!(projector.to_metric(&GeoPoint::new(-181.0, 10.0)).is_err());
    assert!(projector.to_metric(&GeoPoint::new(-105.0, 91.0)).is_err());
}

#[test]
fn haversine_is_symmetric_and_non_negative() {
    let a = GeoPoint::new(-77.009, 38.889);
    let b = GeoPoint::new(-77.036, 38.897);

    let forward = haversine_distance(&a, &b);
    let backward = haversine_distance(&b, &a);

    assert!(forward > 0.0);
    assert_relative_eq!(forward, backward, epsilon = 1e-9);
    assert_relative_eq!(haversine_distance(&a, &a), 0.0, epsilon = 1e-9);
}

#[test]
fn haversine_matches_a_known_distance() {
    // One degree of longitude along the equator.
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(1.0, 0.0);

    assert_relative_eq!(haversine_distance(&a, &b), 111_195.0, max_relative = 1e-3);
}

#[test]
fn interpolation_is_linear() {
    let start = GeoPoint::new(0.0, 0.0);
    let end = GeoPoint::new(10.0, 10.0);

    let mid = interpolate(&start, &end, 0.5);
    assert_relative_eq!(mid.lng, 5.0);
    assert_relative_eq!(mid.lat, 5.0);

    let quarter = interpolate(&start, &end, 0.25);
    assert_relative_eq!(quarter.lng, 2.5);
    assert_relative_eq!(quarter.lat, 2.5);
}
