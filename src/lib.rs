//! # AIS Cleaner
//!
//! Cleaning and fixed-interval resampling of AIS vessel-position traces into
//! anomaly-free, bounded-duration blocks suitable as training sequences.
//!
//! This library provides:
//! - Gap-based voyage segmentation and quality filtering
//! - Graph-based speed-anomaly detection (pairwise anomaly matrix + greedy
//!   outlier selection)
//! - Geodesically consistent temporal interpolation on the WGS84 ellipsoid
//! - Fixed-interval resampling and slicing into fixed-length blocks
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel per-voyage processing with rayon
//! - **`serde`** - Enable serde derives on all public value types
//!
//! ## Quick Start
//!
//! ```rust
//! use ais_cleaner::{clean_tracks, AisMessage, CleanConfig};
//! use std::collections::HashMap;
//!
//! // One vessel reporting every 5 minutes for ~17 hours
//! let track: Vec<AisMessage> = (0..200)
//!     .map(|i| AisMessage {
//!         timestamp: i * 300,
//!         lat: 55.0 + i as f64 * 0.007,
//!         lon: 12.0,
//!         sog: 8.0,
//!         mmsi: 219_000_001,
//!         ..AisMessage::default()
//!     })
//!     .collect();
//!
//! let mut fleet = HashMap::new();
//! fleet.insert(219_000_001, track);
//!
//! let output = clean_tracks(fleet, &CleanConfig::default());
//! println!("{} blocks kept", output.blocks.len());
//! ```
//!
//! ## Pipeline
//!
//! Stages run strictly forward; each consumes the previous stage's output and
//! produces fresh owned tracks:
//!
//! 1. Split each raw stream at gaps above 2 hours ([`voyage::split_at_gaps`])
//! 2. Drop voyages under 75 messages or 6 hours ([`voyage::is_qualified`])
//! 3. Remove speed-implausible messages ([`outliers::detect_speed_outliers`])
//! 4. Resample at 5-minute spacing, all-or-nothing ([`resample_voyage`])
//! 5. Slice into 12-hour blocks, dropping incomplete trailers
//!    ([`voyage::split_into_blocks`])
//! 6. Drop moored, stationary, and low-speed blocks ([`quality`])
//!
//! No single bad voyage halts the batch: unexpected failures drop that voyage
//! and are counted in [`CleanStats::outlier_failures`].

use log::{debug, info, warn};
use std::collections::HashMap;

pub mod geo_utils;
pub mod interpolate;
pub mod outliers;
pub mod quality;
pub mod resample;
pub mod voyage;

pub use interpolate::interpolate_at;
pub use outliers::{detect_speed_outliers, select_outliers, OutlierError, SpeedOutliers};
pub use resample::resample_voyage;

/// Navigational status code for a moored vessel.
pub const NAV_MOORED: u8 = 7;
/// Navigational status code for a vessel at anchor.
pub const NAV_AT_ANCHOR: u8 = 8;

// ============================================================================
// Core Types
// ============================================================================

/// One timestamped AIS position/kinematics report.
///
/// Fields are named; positional column layouts exist only at the I/O
/// boundary (see [`AisMessage::from_raw_row`] and
/// [`AisMessage::to_output_row`]).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AisMessage {
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Latitude in degrees (WGS84).
    pub lat: f64,
    /// Longitude in degrees (WGS84).
    pub lon: f64,
    /// Speed over ground in knots.
    pub sog: f64,
    /// Course over ground in degrees.
    pub cog: f64,
    /// True heading in degrees.
    pub heading: f64,
    /// Rate of turn.
    pub rot: f64,
    /// Navigational status code (0 = under way, 7 = moored, 8 = at anchor).
    pub nav_status: u8,
    /// Vessel identifier (MMSI).
    pub mmsi: u32,
}

impl AisMessage {
    /// Decode a message from the raw loader's column layout:
    /// `[lat, lon, sog, cog, heading, rot, nav_status, timestamp, mmsi]`.
    pub fn from_raw_row(row: &[f64; 9]) -> Self {
        Self {
            lat: row[0],
            lon: row[1],
            sog: row[2],
            cog: row[3],
            heading: row[4],
            rot: row[5],
            nav_status: row[6] as u8,
            timestamp: row[7] as i64,
            mmsi: row[8] as u32,
        }
    }

    /// Encode this message in the output column layout:
    /// `[lat, lon, sog, cog, heading, rot, timestamp, mmsi, nav_status]`.
    ///
    /// Note the order differs from the raw input layout; the two are distinct
    /// schemas and this pair of functions is the only place either lives.
    pub fn to_output_row(&self) -> [f64; 9] {
        [
            self.lat,
            self.lon,
            self.sog,
            self.cog,
            self.heading,
            self.rot,
            self.timestamp as f64,
            f64::from(self.mmsi),
            f64::from(self.nav_status),
        ]
    }

    /// Check that the message carries usable values: finite in-range
    /// coordinates and a finite non-negative speed.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
            && self.sog.is_finite()
            && self.sog >= 0.0
    }
}

/// A fixed-duration slice of a resampled voyage, the unit handed to
/// downstream training.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    /// Messages at exact fixed-interval spacing.
    pub messages: Vec<AisMessage>,
}

impl Block {
    /// The vessel all messages in this block belong to.
    pub fn mmsi(&self) -> Option<u32> {
        self.messages.first().map(|m| m.mmsi)
    }

    /// Encode the block in the output column layout.
    pub fn to_rows(&self) -> Vec<[f64; 9]> {
        self.messages.iter().map(AisMessage::to_output_row).collect()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the cleaning pipeline.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanConfig {
    /// Maximum plausible speed over ground, in knots.
    /// Default: 30.0
    pub max_speed_knots: f64,

    /// Consecutive messages further apart than this split a voyage, and
    /// interpolation across a wider bracketing pair is unavailable.
    /// Default: 7200 (2 hours)
    pub gap_threshold_secs: i64,

    /// Minimum number of messages for a voyage candidate.
    /// Default: 75
    pub min_voyage_len: usize,

    /// Minimum first-to-last duration for a voyage candidate, in seconds.
    /// Default: 21600 (6 hours)
    pub min_voyage_secs: i64,

    /// Resampling interval, in seconds.
    /// Default: 300 (5 minutes)
    pub sample_interval_secs: i64,

    /// Duration of one training block, in seconds.
    /// Default: 43200 (12 hours)
    pub block_duration_secs: i64,

    /// A block whose moored/at-anchor message fraction exceeds this is
    /// dropped. Default: 0.7
    pub moored_fraction: f64,

    /// A block whose maximum speed stays below this never moved, in knots.
    /// Default: 1.0
    pub min_peak_speed_knots: f64,

    /// Speed below which a message counts as near-stationary, in knots.
    /// Default: 2.0
    pub low_speed_knots: f64,

    /// A block with more than this fraction of near-stationary messages is
    /// dropped. Default: 0.8
    pub low_speed_fraction: f64,

    /// Maximum index lag for pairwise calculated-speed comparison.
    /// Default: 4
    pub speed_lag_max: usize,

    /// Minimum elapsed time for a pair to enter the calculated-speed check,
    /// in seconds (shorter pairs are timing noise). Default: 2
    pub min_pair_secs: i64,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            max_speed_knots: 30.0,
            gap_threshold_secs: 2 * 3600,
            min_voyage_len: 75,
            min_voyage_secs: 6 * 3600,
            sample_interval_secs: 5 * 60,
            block_duration_secs: 12 * 3600,
            moored_fraction: 0.7,
            min_peak_speed_knots: 1.0,
            low_speed_knots: 2.0,
            low_speed_fraction: 0.8,
            speed_lag_max: 4,
            min_pair_secs: 2,
        }
    }
}

impl CleanConfig {
    /// Number of samples in one block: `block_duration_secs /
    /// sample_interval_secs` (144 with the defaults).
    pub fn block_len(&self) -> usize {
        if self.sample_interval_secs <= 0 {
            return 0;
        }
        (self.block_duration_secs / self.sample_interval_secs) as usize
    }
}

// ============================================================================
// Rejection Accounting
// ============================================================================

/// Why a voyage or block was removed from the working set.
///
/// Rejection is a normal filtering outcome, not an error; every variant maps
/// to a named counter in [`CleanStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Voyage candidate below the minimum length or duration.
    TooShort,
    /// A speed criterion condemned the entire voyage.
    AllAnomalous,
    /// Unexpected error while scoring a voyage's outliers.
    OutlierFailure,
    /// Interpolation was unavailable somewhere in the resampling range.
    UnresampleableGap,
    /// Trailing slice shorter than one full block.
    IncompleteBlock,
    /// Block dominated by moored/at-anchor status.
    MostlyMoored,
    /// Block in which the vessel never reached a meaningful speed.
    NeverMoved,
    /// Block dominated by near-stationary reports.
    MostlySlow,
}

/// Per-stage counts accumulated over one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanStats {
    /// Raw input tracks.
    pub input_tracks: usize,
    /// Messages dropped up front for invalid coordinates or speed.
    pub invalid_messages: usize,
    /// Voyage candidates after gap splitting.
    pub voyages: usize,
    /// Candidates dropped as too short or too brief.
    pub short_voyages: usize,
    /// Voyages discarded because a speed criterion flagged every message.
    pub anomalous_voyages: usize,
    /// Voyages dropped by unexpected outlier-stage failures. The batch
    /// always continues past these.
    pub outlier_failures: usize,
    /// Voyages dropped because resampling hit an unavailable interpolation.
    pub unresampleable: usize,
    /// Trailing slices dropped as incomplete blocks.
    pub incomplete_blocks: usize,
    /// Blocks dropped as mostly moored/at anchor.
    pub moored_blocks: usize,
    /// Blocks dropped because the vessel never moved.
    pub stationary_blocks: usize,
    /// Blocks dropped as dominated by low-speed reports.
    pub slow_blocks: usize,
    /// Blocks surviving the full pipeline.
    pub blocks: usize,
}

impl CleanStats {
    fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::TooShort => self.short_voyages += 1,
            RejectReason::AllAnomalous => self.anomalous_voyages += 1,
            RejectReason::OutlierFailure => self.outlier_failures += 1,
            RejectReason::UnresampleableGap => self.unresampleable += 1,
            RejectReason::IncompleteBlock => self.incomplete_blocks += 1,
            RejectReason::MostlyMoored => self.moored_blocks += 1,
            RejectReason::NeverMoved => self.stationary_blocks += 1,
            RejectReason::MostlySlow => self.slow_blocks += 1,
        }
    }
}

/// The cleaned batch: blocks keyed by a synthetic sequential id, plus the
/// per-stage accounting.
#[derive(Debug, Clone, Default)]
pub struct CleanOutput {
    /// Surviving blocks, keyed by a synthetic id assigned in deterministic
    /// (mmsi- and time-ordered) sequence.
    pub blocks: HashMap<u64, Block>,
    /// Per-stage counts for the batch.
    pub stats: CleanStats,
}

// ============================================================================
// Pipeline Driver
// ============================================================================

/// Run the full cleaning pipeline over a fleet of raw tracks.
///
/// Input tracks must be ordered by non-decreasing timestamp; the raw column
/// contract is [`AisMessage::from_raw_row`]'s concern, this function takes
/// decoded messages. The pipeline always terminates with a (possibly much
/// smaller) collection plus counts of everything it dropped; no single bad
/// voyage aborts the batch.
pub fn clean_tracks(tracks: HashMap<u32, Vec<AisMessage>>, config: &CleanConfig) -> CleanOutput {
    let mut stats = CleanStats::default();
    let voyages = segment_fleet(tracks, config, &mut stats);

    let resampled: Vec<Vec<AisMessage>> = voyages
        .into_iter()
        .filter_map(|v| match clean_and_resample(v, config) {
            Ok(sampled) => Some(sampled),
            Err(reason) => {
                stats.record(reason);
                None
            }
        })
        .collect();
    info!("{} voyages survived cleaning and resampling", resampled.len());

    let blocks = finalize_blocks(resampled, config, &mut stats);
    info!(
        "batch done: {} blocks kept, {} voyages failed unexpectedly",
        stats.blocks, stats.outlier_failures
    );

    CleanOutput { blocks, stats }
}

/// Parallel variant of [`clean_tracks`]: the per-voyage cleaning and
/// resampling work is distributed with rayon. Voyages are independent, so
/// results and accounting are identical to the sequential driver.
#[cfg(feature = "parallel")]
pub fn clean_tracks_parallel(
    tracks: HashMap<u32, Vec<AisMessage>>,
    config: &CleanConfig,
) -> CleanOutput {
    use rayon::prelude::*;

    let mut stats = CleanStats::default();
    let voyages = segment_fleet(tracks, config, &mut stats);

    let outcomes: Vec<Result<Vec<AisMessage>, RejectReason>> = voyages
        .into_par_iter()
        .map(|v| clean_and_resample(v, config))
        .collect();

    let mut resampled = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(sampled) => resampled.push(sampled),
            Err(reason) => stats.record(reason),
        }
    }
    info!("{} voyages survived cleaning and resampling", resampled.len());

    let blocks = finalize_blocks(resampled, config, &mut stats);
    info!(
        "batch done: {} blocks kept, {} voyages failed unexpectedly",
        stats.blocks, stats.outlier_failures
    );

    CleanOutput { blocks, stats }
}

/// Stage 1-2: validity screen, gap splitting, voyage qualification.
///
/// Tracks are visited in mmsi order so downstream block ids are
/// deterministic for a given input.
fn segment_fleet(
    tracks: HashMap<u32, Vec<AisMessage>>,
    config: &CleanConfig,
    stats: &mut CleanStats,
) -> Vec<Vec<AisMessage>> {
    stats.input_tracks = tracks.len();

    let mut mmsis: Vec<u32> = tracks.keys().copied().collect();
    mmsis.sort_unstable();

    let mut voyages = Vec::new();
    for mmsi in mmsis {
        let track = &tracks[&mmsi];
        let valid: Vec<AisMessage> = track.iter().copied().filter(AisMessage::is_valid).collect();
        let dropped = track.len() - valid.len();
        if dropped > 0 {
            debug!("vessel {mmsi}: dropped {dropped} invalid messages");
            stats.invalid_messages += dropped;
        }
        voyages.extend(voyage::split_at_gaps(&valid, config.gap_threshold_secs));
    }
    stats.voyages = voyages.len();
    info!(
        "{} tracks split into {} voyage candidates",
        stats.input_tracks, stats.voyages
    );

    voyages.retain(|v| {
        let keep = voyage::is_qualified(v, config);
        if !keep {
            stats.record(RejectReason::TooShort);
        }
        keep
    });
    info!(
        "{} voyages qualified ({} too short or too brief)",
        voyages.len(),
        stats.short_voyages
    );
    voyages
}

/// Stage 3-4 for one voyage: outlier removal then all-or-nothing resampling.
fn clean_and_resample(
    voyage: Vec<AisMessage>,
    config: &CleanConfig,
) -> Result<Vec<AisMessage>, RejectReason> {
    let found = detect_speed_outliers(&voyage, config).map_err(|e| {
        warn!("outlier detection failed, dropping voyage: {e}");
        RejectReason::OutlierFailure
    })?;
    if found.all_anomalous() {
        return Err(RejectReason::AllAnomalous);
    }
    let cleaned = outliers::remove_outliers(&voyage, &found);
    resample_voyage(&cleaned, config).ok_or(RejectReason::UnresampleableGap)
}

/// Stage 5-6: block slicing and quality filtering, assigning sequential ids.
fn finalize_blocks(
    resampled: Vec<Vec<AisMessage>>,
    config: &CleanConfig,
    stats: &mut CleanStats,
) -> HashMap<u64, Block> {
    let block_len = config.block_len();
    if block_len == 0 {
        warn!("block length is zero, no blocks produced");
        return HashMap::new();
    }

    let mut blocks = HashMap::new();
    let mut next_id = 0u64;
    for track in resampled {
        if track.len() % block_len != 0 {
            stats.record(RejectReason::IncompleteBlock);
        }
        for chunk in voyage::split_into_blocks(&track, block_len) {
            if quality::mostly_moored(&chunk, config) {
                stats.record(RejectReason::MostlyMoored);
                continue;
            }
            if quality::never_moved(&chunk, config) {
                stats.record(RejectReason::NeverMoved);
                continue;
            }
            if quality::mostly_slow(&chunk, config) {
                stats.record(RejectReason::MostlySlow);
                continue;
            }
            blocks.insert(next_id, Block { messages: chunk });
            next_id += 1;
        }
    }
    stats.blocks = blocks.len();
    blocks
}

// ============================================================================
// Tests
// ============================================================================
