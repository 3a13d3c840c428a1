//! Great-circle distance and unit conversions.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Metres in one statute mile.
pub const METERS_PER_MILE: f64 = 1_609.344;

/// Multiply km/h by this factor to obtain mph.
pub const KMH_TO_MPH: f64 = 0.621371;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Self) -> f64 {
        haversine_m(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance between two points, in metres.
pub fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1_000.0
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_identical_points() {
        let p = Coordinates::new(37.77, -122.42);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = haversine_m(0.0, 0.0, 0.0, 1.0);
        // 2πR / 360
        assert!((d - 111_194.93).abs() < 1.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinates::new(51.5007, -0.1246);
        let b = Coordinates::new(40.6892, -74.0445);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-6);
        assert!((a.distance_to(&b) / 1_000.0 - 5_574.8).abs() < 5.0);
    }

    #[test]
    fn mile_conversion_round_numbers() {
        assert!((meters_to_miles(1_609.344) - 1.0).abs() < 1e-12);
        assert!((meters_to_km(2_500.0) - 2.5).abs() < 1e-12);
    }
}
