//! Parallel profiling example: per-partition profiles merged into one.
//!
//! This example shows how to:
//! - Profile partitions of a column on worker threads
//! - Combine the partial profiles with the bulk state merge
//! - Verify the merged profile matches a single sequential pass
//! - Diff the profile against a later snapshot of the same column
//!
//! Run with:
//! ```bash
//! cargo run --example parallel_merge
//! ```

use tally_profile::logging::{init_logging, LoggingConfig};
use tally_profile::{CategoricalProfile, ProfilerState};
use tracing::info;

const STATUSES: [&str; 4] = ["open", "shipped", "delivered", "returned"];

/// Synthesizes order statuses with a deterministic skew and some nulls.
fn order_statuses(rows: usize, returned_weight: usize) -> Vec<Option<String>> {
    (0..rows)
        .map(|i| {
            if i % 50 == 0 {
                None
            } else if i % 10 < returned_weight {
                Some(STATUSES[3].to_string())
            } else {
                Some(STATUSES[i % 3].to_string())
            }
        })
        .collect()
}

fn profile_partition(name: &str, partition: &[Option<String>]) -> CategoricalProfile {
    let mut profile = CategoricalProfile::new(name);
    profile.update(partition.iter().map(|v| v.as_deref()));
    profile
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development())?;

    let values = order_statuses(100_000, 1);

    // Profile four partitions concurrently, one worker per chunk.
    let partials: Vec<CategoricalProfile> = std::thread::scope(|scope| {
        let handles: Vec<_> = values
            .chunks(25_000)
            .map(|chunk| scope.spawn(move || profile_partition("o_orderstatus", chunk)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("profiling worker panicked"))
            .collect()
    });

    let merged = ProfilerState::merge(partials)?;
    info!(
        sample_size = merged.sample_size(),
        unique = merged.unique_count(),
        "merged partition profiles"
    );

    // The merge is exact: a single pass over the whole column agrees.
    let sequential = profile_partition("o_orderstatus", &values);
    assert_eq!(merged.counts(), sequential.counts());
    assert_eq!(merged.sample_size(), sequential.sample_size());
    println!("merged profile matches the sequential pass");
    println!("{}", serde_json::to_string_pretty(&merged.report())?);

    // A later snapshot with a surge of returns drifts the distribution;
    // the diff's chi-squared test picks it up.
    let later = order_statuses(100_000, 4);
    let later_profile = profile_partition("o_orderstatus", &later);

    let diff = merged.diff(&later_profile);
    println!("\nDrift against the later snapshot:");
    println!("{}", serde_json::to_string_pretty(&diff)?);

    Ok(())
}
