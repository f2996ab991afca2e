//! Rate limit command - show GitHub API budget

use crate::style::*;
use anyhow::Result;
use devrank::github::token_from_env;
use devrank::{Config, GitHubClient};

pub async fn run(config: &Config, token: Option<String>) -> Result<()> {
    print_header("GitHub Rate Limit");

    let token = token.or_else(token_from_env);
    if token.is_none() {
        print_warning("No GitHub token set; showing the unauthenticated limit");
    }

    let client = GitHubClient::new(&config.github);
    let info = client.check_rate_limit(token.as_deref()).await?;

    println!();
    let remaining = format!("{}/{}", info.remaining, info.limit);
    println!(
        "Remaining:        {}",
        if info.is_low() {
            style_red(&remaining)
        } else {
            style_green(&remaining)
        }
    );
    println!("Used:             {}", info.used);
    println!(
        "Resets in:        {}",
        devrank::server::format_duration(std::time::Duration::from_secs(
            info.seconds_until_reset() as u64
        ))
    );

    Ok(())
}
