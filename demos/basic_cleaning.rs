//! Basic cleaning example: run the full pipeline over a small synthetic
//! fleet and print what survived and why the rest was dropped.
//!
//! Run with: cargo run --example basic_cleaning

use ais_cleaner::geo_utils::knots_to_mps;
use ais_cleaner::{clean_tracks, AisMessage, CleanConfig};
use std::collections::HashMap;

/// A vessel steaming north at a constant speed, reporting every `spacing`
/// seconds.
fn steady_track(mmsi: u32, count: i64, spacing: i64, sog: f64, nav_status: u8) -> Vec<AisMessage> {
    let step_deg = knots_to_mps(sog) * spacing as f64 / 111_320.0;
    (0..count)
        .map(|i| AisMessage {
            timestamp: i * spacing,
            lat: 55.0 + i as f64 * step_deg,
            lon: 12.0,
            sog,
            cog: 0.0,
            heading: 0.0,
            rot: 0.0,
            nav_status,
            mmsi,
        })
        .collect()
}

fn main() {
    env_logger::init();

    println!("=== AIS Cleaning Example ===\n");

    let mut fleet: HashMap<u32, Vec<AisMessage>> = HashMap::new();

    // A healthy cargo vessel: ~25 hours under way at 8 knots
    fleet.insert(219_000_001, steady_track(219_000_001, 300, 300, 8.0, 0));

    // A vessel with a corrupted GPS fix in the middle of the voyage
    let mut glitchy = steady_track(219_000_002, 200, 300, 8.0, 0);
    glitchy[100].lat += 1.5; // ~167km teleport and back
    fleet.insert(219_000_002, glitchy);

    // A moored vessel that never leaves the berth
    fleet.insert(219_000_003, steady_track(219_000_003, 200, 300, 0.2, 7));

    // A brief contact: far too short to be a voyage
    fleet.insert(219_000_004, steady_track(219_000_004, 12, 300, 8.0, 0));

    let config = CleanConfig::default();
    let output = clean_tracks(fleet, &config);

    println!("Blocks kept: {}", output.blocks.len());
    let mut ids: Vec<u64> = output.blocks.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        let block = &output.blocks[&id];
        let first = block.messages.first().unwrap();
        let last = block.messages.last().unwrap();
        println!(
            "  block {:>3}: vessel {:?}, {} samples, t = {}..{}",
            id,
            block.mmsi().unwrap(),
            block.messages.len(),
            first.timestamp,
            last.timestamp,
        );
    }

    let stats = &output.stats;
    println!("\nAccounting:");
    println!("  input tracks:        {}", stats.input_tracks);
    println!("  voyage candidates:   {}", stats.voyages);
    println!("  too short/brief:     {}", stats.short_voyages);
    println!("  fully anomalous:     {}", stats.anomalous_voyages);
    println!("  unexpected failures: {}", stats.outlier_failures);
    println!("  unresampleable:      {}", stats.unresampleable);
    println!("  incomplete blocks:   {}", stats.incomplete_blocks);
    println!("  moored blocks:       {}", stats.moored_blocks);
    println!("  stationary blocks:   {}", stats.stationary_blocks);
    println!("  low-speed blocks:    {}", stats.slow_blocks);
}
