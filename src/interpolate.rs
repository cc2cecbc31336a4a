//! # Geodesic Temporal Interpolation
//!
//! Synthesizes an AIS message at an arbitrary timestamp between two real
//! messages of a time-ordered track.
//!
//! The position is interpolated *along the geodesic* between the bracketing
//! messages: initial bearing and distance on the WGS84 ellipsoid, distance
//! scaled by the time fraction, then a forward projection. Scalar kinematics
//! (speed, course, heading, rate of turn) are interpolated linearly, and the
//! categorical navigational status snaps to the nearer real message.
//!
//! Interpolation is *unavailable* (returns `None`) when:
//! - the target timestamp falls outside the track's span,
//! - the bracketing messages are further apart than the voyage gap threshold
//!   (bridging a real data gap would fabricate a trajectory), or
//! - the geodesic computation produces a non-finite result on degenerate
//!   input.

use crate::geo_utils::{geodesic_distance, initial_bearing, project_forward};
use crate::{AisMessage, CleanConfig};

/// Interpolate a synthetic message at timestamp `t` within `track`.
///
/// `track` must be ordered by non-decreasing timestamp. The bracketing pair
/// is the latest message at or before `t` and the earliest strictly after;
/// at `t` equal to a real message's timestamp the result reproduces that
/// message's fields (the fraction is zero and the projection is degenerate
/// at distance zero).
///
/// Returns `None` when interpolation is unavailable; see the module docs for
/// the exact conditions.
///
/// # Example
///
/// ```rust
/// use ais_cleaner::{AisMessage, CleanConfig, interpolate_at};
///
/// let track = vec![
///     AisMessage { timestamp: 0, lat: 55.0, lon: 12.0, sog: 10.0, ..AisMessage::default() },
///     AisMessage { timestamp: 600, lat: 55.01, lon: 12.0, sog: 12.0, ..AisMessage::default() },
/// ];
///
/// let mid = interpolate_at(&track, 300, &CleanConfig::default()).unwrap();
/// assert_eq!(mid.timestamp, 300);
/// assert!((mid.sog - 11.0).abs() < 1e-9);
/// ```
pub fn interpolate_at(track: &[AisMessage], t: i64, config: &CleanConfig) -> Option<AisMessage> {
    let before_idx = track.iter().rposition(|m| m.timestamp <= t)?;
    let after_idx = track.iter().position(|m| m.timestamp > t)?;
    let before = &track[before_idx];
    let after = &track[after_idx];

    let gap = after.timestamp - before.timestamp;
    if gap > config.gap_threshold_secs {
        return None;
    }

    let f = (t - before.timestamp) as f64 / gap as f64;

    let dist = geodesic_distance(before, after);
    let bearing = initial_bearing(before, after);
    if !dist.is_finite() || !bearing.is_finite() {
        return None;
    }

    let (lat, lon) = project_forward(before, bearing, dist * f);
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }

    let lerp = |a: f64, b: f64| a + f * (b - a);

    Some(AisMessage {
        timestamp: t,
        lat,
        lon,
        sog: lerp(before.sog, after.sog),
        cog: lerp(before.cog, after.cog),
        heading: lerp(before.heading, after.heading),
        rot: lerp(before.rot, after.rot),
        nav_status: if f > 0.5 {
            after.nav_status
        } else {
            before.nav_status
        },
        mmsi: before.mmsi,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn two_point_track() -> Vec<AisMessage> {
        vec![
            AisMessage {
                timestamp: 1000,
                lat: 55.0,
                lon: 12.0,
                sog: 10.0,
                cog: 90.0,
                heading: 88.0,
                rot: 1.0,
                nav_status: 0,
                mmsi: 219_000_001,
            },
            AisMessage {
                timestamp: 2000,
                lat: 55.02,
                lon: 12.04,
                sog: 14.0,
                cog: 110.0,
                heading: 108.0,
                rot: 3.0,
                nav_status: 1,
                mmsi: 219_000_001,
            },
        ]
    }

    #[test]
    fn test_exact_at_before_timestamp() {
        let track = two_point_track();
        let m = interpolate_at(&track, 1000, &CleanConfig::default()).unwrap();
        assert_eq!(m.timestamp, 1000);
        assert!(approx_eq(m.lat, 55.0, 1e-9));
        assert!(approx_eq(m.lon, 12.0, 1e-9));
        assert_eq!(m.sog, 10.0);
        assert_eq!(m.cog, 90.0);
        assert_eq!(m.nav_status, 0);
        assert_eq!(m.mmsi, 219_000_001);
    }

    #[test]
    fn test_exact_at_after_timestamp() {
        // At the second message's timestamp that message becomes the
        // bracketing "before", so its values are reproduced against the gap
        // to a third message.
        let mut track = two_point_track();
        track.push(AisMessage {
            timestamp: 3000,
            lat: 55.04,
            lon: 12.08,
            sog: 16.0,
            ..track[1]
        });
        let m = interpolate_at(&track, 2000, &CleanConfig::default()).unwrap();
        assert!(approx_eq(m.lat, 55.02, 1e-9));
        assert!(approx_eq(m.lon, 12.04, 1e-9));
        assert_eq!(m.sog, 14.0);
        assert_eq!(m.nav_status, 1);
    }

    #[test]
    fn test_midpoint_scalars_are_means() {
        let track = two_point_track();
        let m = interpolate_at(&track, 1500, &CleanConfig::default()).unwrap();
        assert!(approx_eq(m.sog, 12.0, 1e-9));
        assert!(approx_eq(m.cog, 100.0, 1e-9));
        assert!(approx_eq(m.heading, 98.0, 1e-9));
        assert!(approx_eq(m.rot, 2.0, 1e-9));
        // Short segment: geodesic midpoint is very close to the linear one
        assert!(approx_eq(m.lat, 55.01, 1e-4));
        assert!(approx_eq(m.lon, 12.02, 1e-4));
    }

    #[test]
    fn test_status_boundary_at_half() {
        let track = two_point_track();
        // f = 0.5 exactly: not past the midpoint, before's status
        let at_half = interpolate_at(&track, 1500, &CleanConfig::default()).unwrap();
        assert_eq!(at_half.nav_status, 0);
        // f just above 0.5: after's status
        let past_half = interpolate_at(&track, 1501, &CleanConfig::default()).unwrap();
        assert_eq!(past_half.nav_status, 1);
    }

    #[test]
    fn test_outside_span_unavailable() {
        let track = two_point_track();
        let config = CleanConfig::default();
        assert!(interpolate_at(&track, 999, &config).is_none());
        assert!(interpolate_at(&track, 2000, &config).is_none());
        assert!(interpolate_at(&track, 5000, &config).is_none());
    }

    #[test]
    fn test_wide_gap_unavailable() {
        let mut track = two_point_track();
        track[1].timestamp = 1000 + 2 * 3600 + 1;
        assert!(interpolate_at(&track, 1500, &CleanConfig::default()).is_none());
    }

    #[test]
    fn test_gap_at_threshold_available() {
        let mut track = two_point_track();
        track[1].timestamp = 1000 + 2 * 3600;
        assert!(interpolate_at(&track, 1500, &CleanConfig::default()).is_some());
    }

    #[test]
    fn test_coincident_points_keep_position() {
        // A stationary vessel: both fixes at the same spot
        let mut track = two_point_track();
        track[1].lat = track[0].lat;
        track[1].lon = track[0].lon;
        let m = interpolate_at(&track, 1500, &CleanConfig::default()).unwrap();
        assert!(approx_eq(m.lat, 55.0, 1e-9));
        assert!(approx_eq(m.lon, 12.0, 1e-9));
    }

    #[test]
    fn test_empty_track_unavailable() {
        assert!(interpolate_at(&[], 1000, &CleanConfig::default()).is_none());
    }
}
