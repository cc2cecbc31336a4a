//! # Anomaly Detection
//!
//! Flags implausible messages within a voyage using two speed criteria:
//!
//! 1. **Reported speed** — a message whose speed-over-ground exceeds the
//!    maximum plausible speed is anomalous on its own.
//! 2. **Calculated speed** — a *pair* of messages whose implied speed
//!    (geodesic distance over elapsed time) exceeds the maximum is mutually
//!    anomalous; which member of the pair is actually wrong cannot be decided
//!    from the pair alone.
//!
//! The pairwise criterion produces a symmetric binary anomaly matrix, which
//! [`select_outliers`] resolves into individual outlier flags: repeatedly
//! remove the observation anomalous with the most others, then re-score the
//! remainder as if it never existed. (Young, "Predicting vessel trajectories
//! from AIS data using R", 2017.)
//!
//! Pairing is banded: only lags 1 through `speed_lag_max` are compared, since
//! a teleporting fix is already implausible against its near neighbours and
//! the full n² comparison adds nothing.

use crate::geo_utils::{geodesic_distance, knots_to_mps};
use crate::{AisMessage, CleanConfig};
use thiserror::Error;

/// Contract violations on the pairwise anomaly matrix.
///
/// These indicate a bug in whatever built the matrix, not a data problem, so
/// they abort processing of that matrix rather than yielding a partial result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlierError {
    #[error("anomaly matrix is not square: row {row} has {len} entries, expected {n}")]
    NotSquare { row: usize, len: usize, n: usize },
    #[error("anomaly matrix is not symmetric at ({r}, {s})")]
    NotSymmetric { r: usize, s: usize },
    #[error("anomaly matrix is not binary at ({r}, {s}): found {value}")]
    NotBinary { r: usize, s: usize, value: u8 },
}

/// Outlier flags produced by [`detect_speed_outliers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedOutliers {
    /// Reported-speed flags, indexed over the original track.
    pub reported: Vec<bool>,
    /// Calculated-speed flags, indexed over the track *after* removing
    /// reported-speed outliers. `None` when the reported-speed pass flagged
    /// every message and the calculated pass was skipped.
    pub calculated: Option<Vec<bool>>,
}

impl SpeedOutliers {
    /// True when either criterion condemned the entire (remaining) track.
    /// Such a voyage is garbage and should be discarded whole.
    pub fn all_anomalous(&self) -> bool {
        if self.reported.iter().all(|&o| o) {
            return true;
        }
        match &self.calculated {
            Some(calc) => calc.iter().all(|&o| o),
            None => true,
        }
    }
}

/// Resolve a symmetric binary pairwise-anomaly matrix into individual
/// outlier flags.
///
/// Let `b` be the vector of row sums. While `max(b) > 0`: mark the
/// observation with the largest row sum as an outlier (ties broken by lowest
/// index), zero its row sum, and decrement every remaining non-outlier's sum
/// by its edge to the removed observation. Each iteration removes one
/// observation, so the loop runs at most `n` times at `O(n)` per update.
///
/// # Errors
///
/// Returns [`OutlierError`] if the matrix is not square, not symmetric, or
/// contains entries other than 0 and 1.
///
/// # Example
///
/// ```rust
/// use ais_cleaner::outliers::select_outliers;
///
/// // Observation 1 is anomalous against both 0 and 2
/// let a = vec![
///     vec![0, 1, 0],
///     vec![1, 0, 1],
///     vec![0, 1, 0],
/// ];
/// let flags = select_outliers(&a).unwrap();
/// assert_eq!(flags, vec![false, true, false]);
/// ```
pub fn select_outliers(matrix: &[Vec<u8>]) -> Result<Vec<bool>, OutlierError> {
    let n = matrix.len();

    // All row lengths first: the symmetry check below indexes into row `s`
    // and must not fault on a ragged matrix appearing later in the scan
    for (r, row) in matrix.iter().enumerate() {
        if row.len() != n {
            return Err(OutlierError::NotSquare {
                row: r,
                len: row.len(),
                n,
            });
        }
    }
    for (r, row) in matrix.iter().enumerate() {
        for (s, &value) in row.iter().enumerate() {
            if value > 1 {
                return Err(OutlierError::NotBinary { r, s, value });
            }
            if matrix[s][r] != value {
                return Err(OutlierError::NotSymmetric { r, s });
            }
        }
    }

    let mut b: Vec<i64> = matrix
        .iter()
        .map(|row| row.iter().map(|&v| i64::from(v)).sum())
        .collect();
    let mut outliers = vec![false; n];

    loop {
        // argmax with lowest-index tie break, for determinism
        let mut r = 0;
        let mut best = 0;
        for (i, &score) in b.iter().enumerate() {
            if score > best {
                best = score;
                r = i;
            }
        }
        if best == 0 {
            break;
        }

        outliers[r] = true;
        b[r] = 0;
        for j in 0..n {
            if !outliers[j] {
                b[j] -= i64::from(matrix[r][j]);
            }
        }
    }

    Ok(outliers)
}

/// Detect speed-implausible messages in a time-ordered track.
///
/// Runs the reported-speed pass first; if it flags every message the track is
/// likely garbage and the calculated pass is skipped (`calculated: None`).
/// Otherwise the surviving messages are paired at lags
/// `1..=config.speed_lag_max`, each pair with elapsed time above
/// `config.min_pair_secs` and implied speed above the maximum is entered into
/// the anomaly matrix, and [`select_outliers`] resolves the matrix.
///
/// The two flag vectors use different indexing; see [`SpeedOutliers`].
/// Use [`remove_outliers`] to apply both to the original track.
pub fn detect_speed_outliers(
    track: &[AisMessage],
    config: &CleanConfig,
) -> Result<SpeedOutliers, OutlierError> {
    let reported: Vec<bool> = track
        .iter()
        .map(|m| m.sog > config.max_speed_knots)
        .collect();

    if reported.iter().all(|&o| o) {
        return Ok(SpeedOutliers {
            reported,
            calculated: None,
        });
    }

    let kept: Vec<&AisMessage> = track
        .iter()
        .zip(&reported)
        .filter(|(_, &flagged)| !flagged)
        .map(|(m, _)| m)
        .collect();

    let n = kept.len();
    let max_mps = knots_to_mps(config.max_speed_knots);
    let mut matrix = vec![vec![0u8; n]; n];

    for lag in 1..=config.speed_lag_max {
        for i in 0..n.saturating_sub(lag) {
            let j = i + lag;
            let dt = (kept[j].timestamp - kept[i].timestamp) as f64;
            if dt <= config.min_pair_secs as f64 {
                continue;
            }
            let dist = geodesic_distance(kept[i], kept[j]);
            if dist / dt > max_mps {
                matrix[i][j] = 1;
                matrix[j][i] = 1;
            }
        }
    }

    let calculated = select_outliers(&matrix)?;
    Ok(SpeedOutliers {
        reported,
        calculated: Some(calculated),
    })
}

/// Apply both outlier vectors to a track, yielding the surviving messages.
///
/// Reported flags apply to the original indexing; calculated flags apply to
/// the sequence that remains after the reported removals.
pub fn remove_outliers(track: &[AisMessage], outliers: &SpeedOutliers) -> Vec<AisMessage> {
    let kept = track
        .iter()
        .zip(&outliers.reported)
        .filter(|(_, &flagged)| !flagged)
        .map(|(m, _)| *m);

    match &outliers.calculated {
        Some(calc) => kept
            .zip(calc.iter())
            .filter(|(_, &flagged)| !flagged)
            .map(|(m, _)| m)
            .collect(),
        None => Vec::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
