//! example command - Print a built-in snapshot

use crate::core::samples::Sample;
use anyhow::{Context as _, Result};

/// Print a built-in dataset as snapshot JSON.
///
/// The output loads back with `--snapshot`.
pub fn example(sample: Sample) -> Result<()> {
    let json = sample
        .state()
        .to_json_pretty()
        .with_context(|| format!("Failed to encode {} snapshot", sample.name()))?;
    println!("{json}");
    Ok(())
}
