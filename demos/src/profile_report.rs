//! Basic profiling example demonstrating the categorical profile report.
//!
//! This example shows how to:
//! - Build a profile from an Arrow string array with missing values
//! - Check the classification against the cardinality heuristic
//! - Print the serialized profile report
//!
//! Run with:
//! ```bash
//! cargo run --example profile_report
//! ```

use arrow::array::StringArray;
use tally_profile::logging::{init_logging, LoggingConfig};
use tally_profile::{CategoricalOptions, CategoricalProfile};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingConfig::development())?;

    // Market segments for a batch of customers, with a few unrecorded rows.
    let segments = StringArray::from(vec![
        Some("automobile"),
        Some("building"),
        Some("automobile"),
        Some("machinery"),
        None,
        Some("household"),
        Some("automobile"),
        Some("building"),
        None,
        Some("furniture"),
        Some("machinery"),
        Some("automobile"),
    ]);

    // Surface only the three most common segments in the report.
    let options = CategoricalOptions::new().with_top_k_categories(3);
    let mut profile = CategoricalProfile::with_options("c_mktsegment", options)?;
    profile.update_from_array(&segments)?;

    println!("Profiled column: {}", profile.column_name());
    println!("  sample size:   {}", profile.sample_size());
    println!("  distinct keys: {}", profile.unique_count());
    println!("  categorical:   {}", profile.is_categorical());
    if let Some(gini) = profile.gini_impurity() {
        println!("  gini impurity: {gini:.4}");
    }

    println!("\nFull report:");
    println!("{}", serde_json::to_string_pretty(&profile.report())?);

    Ok(())
}
