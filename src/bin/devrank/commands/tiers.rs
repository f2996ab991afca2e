//! Tiers command - show scoring weights and tier table

use crate::style::*;
use anyhow::Result;
use devrank::Config;

pub fn run(config: &Config) -> Result<()> {
    let engine = config.rank_engine()?;
    let weights = engine.weights();

    print_header("Score Weights");
    println!("Commits:          ×{}", weights.commits);
    println!("Pull Requests:    ×{}", weights.pull_requests);
    println!("Issues:           ×{}", weights.issues);
    println!("Reviews:          ×{}", weights.reviews);
    println!("Stars Earned:     ×{}", weights.stars_earned);
    println!("Followers:        ×{}", weights.followers);

    print_header("Tiers");
    println!("{:<6}  {:>10}", "Tier", "Min Score");
    println!("{}", "─".repeat(18));
    for tier in engine.table().tiers().iter().rev() {
        println!(
            "{:<6}  {:>10}",
            style_rank(&format!("{:<6}", tier.label)),
            tier.min_score
        );
    }

    Ok(())
}
