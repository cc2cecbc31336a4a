//! # Block Quality Filtering
//!
//! Final screening of resampled blocks before they become training units.
//! Three independent predicates; a block failing any one is dropped:
//!
//! - [`mostly_moored`]: the vessel spent most of the block moored or at
//!   anchor (navigational status 7 or 8),
//! - [`never_moved`]: the vessel never reached a meaningful speed anywhere
//!   in the block,
//! - [`mostly_slow`]: the block is dominated by near-stationary reports.
//!
//! All fraction thresholds are exclusive: a block sitting exactly at a
//! threshold is retained.

use crate::{AisMessage, CleanConfig, NAV_AT_ANCHOR, NAV_MOORED};

/// True when the combined fraction of moored and at-anchor messages exceeds
/// `config.moored_fraction`.
pub fn mostly_moored(block: &[AisMessage], config: &CleanConfig) -> bool {
    if block.is_empty() {
        return false;
    }
    let moored = block
        .iter()
        .filter(|m| m.nav_status == NAV_MOORED || m.nav_status == NAV_AT_ANCHOR)
        .count();
    moored as f64 / block.len() as f64 > config.moored_fraction
}

/// True when the maximum speed over ground anywhere in the block stays below
/// `config.min_peak_speed_knots`.
pub fn never_moved(block: &[AisMessage], config: &CleanConfig) -> bool {
    if block.is_empty() {
        return false;
    }
    let max_sog = block.iter().map(|m| m.sog).fold(f64::NEG_INFINITY, f64::max);
    max_sog < config.min_peak_speed_knots
}

/// True when the fraction of messages slower than `config.low_speed_knots`
/// exceeds `config.low_speed_fraction`.
pub fn mostly_slow(block: &[AisMessage], config: &CleanConfig) -> bool {
    if block.is_empty() {
        return false;
    }
    let slow = block
        .iter()
        .filter(|m| m.sog < config.low_speed_knots)
        .count();
    slow as f64 / block.len() as f64 > config.low_speed_fraction
}

// =============================================================================
// Unit Tests
// =============================================================================
