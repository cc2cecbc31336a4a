//! # Voyage Segmentation
//!
//! Splits a vessel's raw message stream into voyages at large time gaps, and
//! later re-slices resampled voyages into fixed-length training blocks.
//!
//! A voyage is a contiguous run of messages with no two consecutive
//! timestamps further apart than the gap threshold. Candidates that are too
//! short (fewer than the minimum message count) or too brief (shorter than
//! the minimum duration) carry too little signal to train on and are likely
//! noise contacts rather than real voyages, so they are dropped before any
//! further processing.

use crate::{AisMessage, CleanConfig};

/// Split a time-ordered track at every consecutive gap exceeding
/// `gap_threshold_secs`. A gap exactly at the threshold does not split.
///
/// Each returned voyage is an independent owned track; an empty input yields
/// no voyages.
pub fn split_at_gaps(track: &[AisMessage], gap_threshold_secs: i64) -> Vec<Vec<AisMessage>> {
    let mut voyages = Vec::new();
    if track.is_empty() {
        return voyages;
    }

    let mut current: Vec<AisMessage> = vec![track[0]];
    for pair in track.windows(2) {
        if pair[1].timestamp - pair[0].timestamp > gap_threshold_secs {
            voyages.push(std::mem::take(&mut current));
        }
        current.push(pair[1]);
    }
    voyages.push(current);
    voyages
}

/// Whether a voyage candidate is long enough to keep: at least
/// `min_voyage_len` messages *and* at least `min_voyage_secs` from first to
/// last timestamp.
pub fn is_qualified(voyage: &[AisMessage], config: &CleanConfig) -> bool {
    if voyage.len() < config.min_voyage_len {
        return false;
    }
    let duration = match (voyage.first(), voyage.last()) {
        (Some(first), Some(last)) => last.timestamp - first.timestamp,
        _ => return false,
    };
    duration >= config.min_voyage_secs
}

/// Slice a resampled track into consecutive blocks of exactly `block_len`
/// messages. A trailing slice shorter than `block_len` is an incomplete
/// block and is not returned.
pub fn split_into_blocks(track: &[AisMessage], block_len: usize) -> Vec<Vec<AisMessage>> {
    if block_len == 0 {
        return Vec::new();
    }
    track
        .chunks_exact(block_len)
        .map(|chunk| chunk.to_vec())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(timestamp: i64) -> AisMessage {
        AisMessage {
            timestamp,
            lat: 55.0,
            lon: 12.0,
            sog: 5.0,
            ..AisMessage::default()
        }
    }

    fn track(timestamps: &[i64]) -> Vec<AisMessage> {
        timestamps.iter().map(|&t| msg(t)).collect()
    }

    #[test]
    fn test_no_gap_single_voyage() {
        let t = track(&[0, 600, 1200, 1800]);
        let voyages = split_at_gaps(&t, 7200);
        assert_eq!(voyages.len(), 1);
        assert_eq!(voyages[0].len(), 4);
    }

    #[test]
    fn test_single_gap_two_voyages() {
        let t = track(&[0, 600, 1200, 1200 + 7201, 1200 + 7801]);
        let voyages = split_at_gaps(&t, 7200);
        assert_eq!(voyages.len(), 2);
        assert_eq!(voyages[0].len(), 3);
        assert_eq!(voyages[1].len(), 2);
        assert_eq!(voyages[1][0].timestamp, 1200 + 7201);
    }

    #[test]
    fn test_gap_at_threshold_does_not_split() {
        let t = track(&[0, 7200]);
        assert_eq!(split_at_gaps(&t, 7200).len(), 1);
    }

    #[test]
    fn test_empty_track() {
        assert!(split_at_gaps(&[], 7200).is_empty());
    }

    #[test]
    fn test_qualification_length_boundary() {
        let config = CleanConfig::default();
        // 75 messages spread over well past 6h
        let long: Vec<AisMessage> = (0..75).map(|i| msg(i * 600)).collect();
        assert!(is_qualified(&long, &config));
        let short: Vec<AisMessage> = (0..74).map(|i| msg(i * 600)).collect();
        assert!(!is_qualified(&short, &config));
    }

    #[test]
    fn test_qualification_duration_boundary() {
        let config = CleanConfig::default();
        // 100 messages squeezed into just under 6h
        let brief: Vec<AisMessage> = (0..100).map(|i| msg(i * 215)).collect();
        assert!(!is_qualified(&brief, &config));
        // Exactly 6h from first to last is kept
        let exact: Vec<AisMessage> = (0..=100).map(|i| msg(i * 216)).collect();
        assert!(is_qualified(&exact, &config));
    }

    #[test]
    fn test_blocks_drop_trailing_remainder() {
        let t = track(&(0..10).map(|i| i * 300).collect::<Vec<_>>());
        let blocks = split_into_blocks(&t, 4);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.len() == 4));
        // messages 8 and 9 fall in the incomplete trailing slice
        assert_eq!(blocks[1].last().unwrap().timestamp, 7 * 300);
    }

    #[test]
    fn test_blocks_exact_multiple() {
        let t = track(&(0..8).map(|i| i * 300).collect::<Vec<_>>());
        assert_eq!(split_into_blocks(&t, 4).len(), 2);
    }

    #[test]
    fn test_blocks_zero_len_yields_nothing() {
        let t = track(&[0, 300]);
        assert!(split_into_blocks(&t, 0).is_empty());
    }
}
