//! Me command - fetch your ranked profile from a running server

use crate::client::DevRankClient;
use anyhow::Result;

pub async fn run(server: &str, session: &str) -> Result<()> {
    let client = DevRankClient::new(server);
    let ranked = client.get_profile(session).await?;
    super::print_report(&ranked.profile, &ranked.rank);
    Ok(())
}
