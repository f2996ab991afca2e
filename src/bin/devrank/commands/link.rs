//! Link command - store GitHub credentials and issue a session

use crate::style::*;
use anyhow::Result;
use devrank::{Config, CredentialStore};

pub fn run(
    config: &Config,
    user_id: i64,
    github_username: Option<String>,
    github_token: Option<String>,
) -> Result<()> {
    print_header("Link GitHub Account");

    let storage = CredentialStore::open(&config.database.path)?;

    if github_username.is_some() || github_token.is_some() {
        let credentials = storage.update_github_credentials(
            user_id,
            github_username.as_deref(),
            github_token.as_deref(),
        )?;
        print_success(&format!(
            "Saved credentials for user {} (@{})",
            user_id,
            if credentials.github_username.is_empty() {
                "?"
            } else {
                credentials.github_username.as_str()
            }
        ));
        if !credentials.is_complete() {
            print_warning("Username or token still missing; profile requests will fail");
        }
    } else {
        match storage.github_credentials(user_id)? {
            Some(c) if c.is_complete() => print_info(&format!(
                "Using stored credentials @{} ({})",
                c.github_username,
                mask_secret(&c.github_token)
            )),
            _ => print_warning("No GitHub credentials stored for this user"),
        }
    }

    let session = storage.create_session(user_id, config.session.ttl())?;

    println!();
    println!("Session:          {}", style_cyan(&session));
    println!("Expires in:       {}h", config.session.ttl_hours);
    println!();
    println!("Use it with:");
    println!("  devrank me --session {}", session);

    Ok(())
}
