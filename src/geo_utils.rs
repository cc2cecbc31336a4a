//! # Geodesic Utilities
//!
//! Core geodesic computation primitives for AIS track cleaning.
//!
//! This module wraps the `geo` crate's WGS84 geodesic algorithms (Karney's
//! method) behind functions that operate directly on [`AisMessage`] positions.
//! Everything downstream — the calculated-speed anomaly classifier and the
//! temporal interpolator — goes through these three primitives.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`geodesic_distance`] | Ellipsoidal distance between two messages in meters |
//! | [`initial_bearing`] | Initial azimuth from one message towards another |
//! | [`project_forward`] | Forward geodesic projection by bearing and distance |
//! | [`knots_to_mps`] | Convert a speed in knots to meters per second |
//!
//! ## Example
//!
//! ```rust
//! use ais_cleaner::AisMessage;
//! use ais_cleaner::geo_utils;
//!
//! let a = AisMessage { timestamp: 0, lat: 51.5074, lon: -0.1278, ..AisMessage::default() };
//! let b = AisMessage { timestamp: 600, lat: 51.5174, lon: -0.1278, ..AisMessage::default() };
//!
//! let dist = geo_utils::geodesic_distance(&a, &b);
//! let bearing = geo_utils::initial_bearing(&a, &b);
//! println!("{:.0}m at {:.0} degrees", dist, bearing);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Why geodesic rather than haversine
//!
//! Haversine assumes a spherical Earth and is accurate to ~0.3%. Interpolated
//! positions feed a training set where systematic position bias matters, so
//! distance, bearing, and projection all use the WGS84 ellipsoid. The three
//! operations are mutually consistent: projecting forward by the full
//! geodesic distance along the initial bearing lands on the target point.
//!
//! ### Coordinate System
//!
//! All positions are WGS84 latitude/longitude in degrees, the native frame of
//! AIS position reports.

use crate::AisMessage;
use geo::{Bearing, Destination, Distance, Geodesic, Point};

/// Meters per second in one knot.
pub const KNOTS_TO_MPS: f64 = 0.514444;

/// Convert a speed in knots to meters per second.
#[inline]
pub fn knots_to_mps(knots: f64) -> f64 {
    knots * KNOTS_TO_MPS
}

/// Geodesic distance between two message positions on the WGS84 ellipsoid.
///
/// # Arguments
///
/// * `a` - First message
/// * `b` - Second message
///
/// # Returns
///
/// Distance in meters along the ellipsoid surface.
///
/// # Example
///
/// ```rust
/// use ais_cleaner::AisMessage;
/// use ais_cleaner::geo_utils::geodesic_distance;
///
/// let london = AisMessage { lat: 51.5074, lon: -0.1278, ..AisMessage::default() };
/// let paris = AisMessage { lat: 48.8566, lon: 2.3522, ..AisMessage::default() };
///
/// let distance = geodesic_distance(&london, &paris);
/// assert!((distance - 344_000.0).abs() < 2_000.0); // ~344 km
/// ```
#[inline]
pub fn geodesic_distance(a: &AisMessage, b: &AisMessage) -> f64 {
    let p1 = Point::new(a.lon, a.lat);
    let p2 = Point::new(b.lon, b.lat);
    Geodesic::distance(p1, p2)
}

/// Initial bearing (forward azimuth) from `a` towards `b`, in degrees.
///
/// The bearing is measured clockwise from true north. Together with
/// [`geodesic_distance`] and [`project_forward`] this defines the geodesic
/// from `a` to `b`: projecting from `a` by the full distance along this
/// bearing reaches `b`.
#[inline]
pub fn initial_bearing(a: &AisMessage, b: &AisMessage) -> f64 {
    let p1 = Point::new(a.lon, a.lat);
    let p2 = Point::new(b.lon, b.lat);
    Geodesic::bearing(p1, p2)
}

/// Project forward from `origin` along `bearing_deg` by `distance_m` meters.
///
/// # Arguments
///
/// * `origin` - Starting message position
/// * `bearing_deg` - Initial azimuth in degrees, clockwise from north
/// * `distance_m` - Distance to travel along the geodesic, in meters
///
/// # Returns
///
/// The destination as a `(lat, lon)` pair in degrees.
///
/// # Example
///
/// ```rust
/// use ais_cleaner::AisMessage;
/// use ais_cleaner::geo_utils::project_forward;
///
/// let origin = AisMessage { lat: 51.5074, lon: -0.1278, ..AisMessage::default() };
///
/// // ~111km due north is about one degree of latitude
/// let (lat, lon) = project_forward(&origin, 0.0, 111_000.0);
/// assert!((lat - 52.5).abs() < 0.05);
/// assert!((lon - origin.lon).abs() < 0.01);
/// ```
#[inline]
pub fn project_forward(origin: &AisMessage, bearing_deg: f64, distance_m: f64) -> (f64, f64) {
    let p = Point::new(origin.lon, origin.lat);
    let dest = Geodesic::destination(p, bearing_deg, distance_m);
    (dest.y(), dest.x())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> AisMessage {
        AisMessage {
            lat,
            lon,
            ..AisMessage::default()
        }
    }

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_distance_same_point() {
        let p = at(51.5074, -0.1278);
        assert_eq!(geodesic_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = at(51.5074, -0.1278);
        let paris = at(48.8566, 2.3522);
        let dist = geodesic_distance(&london, &paris);
        assert!(approx_eq(dist, 344_000.0, 2_000.0));
    }

    #[test]
    fn test_bearing_due_north() {
        let a = at(50.0, 4.0);
        let b = at(51.0, 4.0);
        let bearing = initial_bearing(&a, &b);
        assert!(approx_eq(bearing, 0.0, 0.01) || approx_eq(bearing, 360.0, 0.01));
    }

    #[test]
    fn test_projection_round_trip() {
        // Distance + bearing + forward projection must be mutually consistent
        let a = at(55.0, 12.0);
        let b = at(55.3, 12.7);
        let dist = geodesic_distance(&a, &b);
        let bearing = initial_bearing(&a, &b);
        let (lat, lon) = project_forward(&a, bearing, dist);
        assert!(approx_eq(lat, b.lat, 1e-8));
        assert!(approx_eq(lon, b.lon, 1e-8));
    }

    #[test]
    fn test_projection_zero_distance() {
        let a = at(55.0, 12.0);
        let (lat, lon) = project_forward(&a, 45.0, 0.0);
        assert!(approx_eq(lat, a.lat, 1e-9));
        assert!(approx_eq(lon, a.lon, 1e-9));
    }

    #[test]
    fn test_knots_to_mps() {
        assert!(approx_eq(knots_to_mps(1.0), 0.514444, 1e-9));
        assert!(approx_eq(knots_to_mps(30.0), 15.43332, 1e-6));
    }
}
