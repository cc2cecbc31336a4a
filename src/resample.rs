//! # Fixed-Interval Resampling
//!
//! Walks a cleaned voyage from its first timestamp towards its last in fixed
//! increments and interpolates a synthetic message at every step, producing a
//! track whose timestamps form an exact arithmetic progression.
//!
//! The policy is all-or-nothing: the first unavailable interpolation aborts
//! the whole voyage. A partially resampled voyage would be a silently
//! shortened sequence, and downstream training must not see those artifacts.

use crate::interpolate::interpolate_at;
use crate::{AisMessage, CleanConfig};

/// Resample `voyage` at `config.sample_interval_secs` spacing.
///
/// Targets run from the first message's timestamp up to (but excluding) the
/// last message's timestamp. Returns `None` if the voyage is empty, the
/// interval is not positive, or any target timestamp cannot be interpolated.
///
/// # Example
///
/// ```rust
/// use ais_cleaner::{AisMessage, CleanConfig, resample_voyage};
///
/// let voyage: Vec<AisMessage> = (0..5)
///     .map(|i| AisMessage {
///         timestamp: i * 600,
///         lat: 55.0 + i as f64 * 0.01,
///         lon: 12.0,
///         sog: 8.0,
///         ..AisMessage::default()
///     })
///     .collect();
///
/// let sampled = resample_voyage(&voyage, &CleanConfig::default()).unwrap();
/// assert_eq!(sampled.len(), 8); // 0..2400 in 300s steps
/// ```
pub fn resample_voyage(voyage: &[AisMessage], config: &CleanConfig) -> Option<Vec<AisMessage>> {
    let first = voyage.first()?.timestamp;
    let last = voyage.last()?.timestamp;
    let step = config.sample_interval_secs;
    if step <= 0 {
        return None;
    }

    let mut sampled = Vec::with_capacity(((last - first) / step) as usize + 1);
    let mut t = first;
    while t < last {
        sampled.push(interpolate_at(voyage, t, config)?);
        t += step;
    }
    Some(sampled)
}

// =============================================================================
// Unit Tests
// =============================================================================
