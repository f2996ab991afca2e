//! Rank command - rank a saved activity snapshot

use std::path::Path;

use anyhow::{Context, Result};
use devrank::{ActivityStatistics, Config};

pub fn run(config: &Config, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let stats: ActivityStatistics = serde_json::from_str(&content)
        .with_context(|| format!("Invalid activity statistics in {}", file.display()))?;

    let engine = config.rank_engine()?;
    let rank = engine.compute_rank(&stats);

    super::print_report(&stats, &rank);
    Ok(())
}
