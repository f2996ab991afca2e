//! CLI subcommands

pub mod link;
pub mod me;
pub mod profile;
pub mod rank;
pub mod rate_limit;
pub mod serve;
pub mod tiers;

use crate::style::*;
use devrank::{ActivityStatistics, RankResult};

/// Print a profile summary followed by its rank.
pub fn print_report(profile: &ActivityStatistics, rank: &RankResult) {
    if !profile.login.is_empty() {
        let title = if profile.name.is_empty() {
            format!("@{}", profile.login)
        } else {
            format!("{} (@{})", profile.name, profile.login)
        };
        print_header(&title);
        if !profile.bio.is_empty() {
            println!("{}", style_dim(&profile.bio));
        }
        println!();
    }

    println!("Commits:          {}", profile.total_commits);
    println!("Pull Requests:    {}", profile.total_pull_requests);
    println!("Issues:           {}", profile.total_issues);
    println!("Reviews:          {}", profile.total_reviews);
    println!("Stars Earned:     {}", profile.total_stars_earned);
    println!("Followers:        {}", profile.followers);
    if profile.total_public_repositories > 0 {
        println!("Public Repos:     {}", profile.total_public_repositories);
    }
    if profile.contribution_calendar.total_contributions > 0 {
        println!(
            "Contributions:    {}",
            profile.contribution_calendar.total_contributions
        );
    }

    if !profile.pinned_repositories.is_empty() {
        println!();
        println!("{}", style_bold("Pinned:"));
        for repo in &profile.pinned_repositories {
            let language = if repo.primary_language.name.is_empty() {
                String::new()
            } else {
                format!(" [{}]", repo.primary_language.name)
            };
            println!(
                "  {}{}  ★ {}  ⑂ {}",
                style_cyan(&repo.name),
                style_dim(&language),
                repo.stargazer_count,
                repo.fork_count
            );
        }
    }

    println!();
    println!("Rank:             {}", style_bold(&style_rank(&rank.rank)));
    println!("Score:            {}", rank.score);
    match (&rank.next_rank, rank.points_to_next()) {
        (Some(next), Some(missing)) => {
            println!(
                "Progress:         {} {}% toward {}",
                render_progress_bar(rank.progress_percent, 20),
                rank.progress_percent,
                style_rank(next)
            );
            println!(
                "Next Tier:        {} at {} ({} to go)",
                next, rank.next_rank_threshold, missing
            );
        }
        _ => print_success("Top tier reached"),
    }
}
