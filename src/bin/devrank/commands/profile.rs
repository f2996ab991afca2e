//! Profile command - fetch and rank a GitHub user

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use devrank::github::token_from_env;
use devrank::{Config, GitHubClient, ProfileService};
use indicatif::{ProgressBar, ProgressStyle};

pub async fn run(config: &Config, username: &str, token: Option<String>, json: bool) -> Result<()> {
    let token = token
        .or_else(token_from_env)
        .context("GitHub token required: pass --token or set GITHUB_TOKEN")?;

    let engine = config.rank_engine()?;
    let service = ProfileService::new(Arc::new(GitHubClient::new(&config.github)), engine);

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching @{} from GitHub...", username));
    pb.enable_steady_tick(Duration::from_millis(80));

    let result = service.ranked_profile(username, &token).await;
    pb.finish_and_clear();

    let ranked = result.with_context(|| format!("Unable to retrieve profile for @{}", username))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        super::print_report(&ranked.profile, &ranked.rank);
    }

    Ok(())
}
