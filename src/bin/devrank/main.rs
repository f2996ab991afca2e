//! DevRank CLI
//!
//! Rank a GitHub account from the terminal, or run the DevRank server.

mod client;
mod commands;
mod style;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use devrank::Config;
use style::*;

const BANNER: &str = r#"
  ██████╗ ███████╗██╗   ██╗██████╗  █████╗ ███╗   ██╗██╗  ██╗
  ██╔══██╗██╔════╝██║   ██║██╔══██╗██╔══██╗████╗  ██║██║ ██╔╝
  ██║  ██║█████╗  ██║   ██║██████╔╝███████║██╔██╗ ██║█████╔╝
  ██║  ██║██╔══╝  ╚██╗ ██╔╝██╔══██╗██╔══██║██║╚██╗██║██╔═██╗
  ██████╔╝███████╗ ╚████╔╝ ██║  ██║██║  ██║██║ ╚████║██║  ██╗
  ╚═════╝ ╚══════╝  ╚═══╝  ╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═══╝╚═╝  ╚═╝
"#;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "devrank")]
#[command(version)]
#[command(about = "DevRank - rank developers by their GitHub activity", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config.toml
    #[arg(short, long, env = "DEVRANK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and rank a GitHub user
    #[command(visible_alias = "p")]
    Profile {
        /// GitHub login
        username: String,

        /// GitHub token (defaults to EXTRA_GITHUB_TOKEN or GITHUB_TOKEN)
        #[arg(short, long)]
        token: Option<String>,

        /// Print the ranked profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank a saved activity snapshot
    Rank {
        /// JSON file holding activity statistics
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show the scoring weights and tier table
    #[command(visible_alias = "t")]
    Tiers,

    /// Show GitHub API rate limit status
    RateLimit {
        /// GitHub token (defaults to EXTRA_GITHUB_TOKEN or GITHUB_TOKEN)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Run the HTTP server
    #[command(visible_alias = "s")]
    Serve {
        /// Host to bind
        #[arg(long, env = "DEVRANK_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "DEVRANK_PORT")]
        port: Option<u16>,
    },

    /// Store GitHub credentials for a user and issue a session token
    Link {
        /// Local user id
        #[arg(short, long)]
        user: i64,

        /// GitHub login
        #[arg(long)]
        github_username: Option<String>,

        /// GitHub token
        #[arg(long)]
        github_token: Option<String>,
    },

    /// Fetch your ranked profile from a running server
    Me {
        /// DevRank server URL
        #[arg(long, env = "DEVRANK_SERVER", default_value = "http://localhost:8080")]
        server: String,

        /// Session token issued by `devrank link`
        #[arg(long, env = "DEVRANK_SESSION")]
        session: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("info").init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Profile {
            username,
            token,
            json,
        } => commands::profile::run(&config, &username, token, json).await,
        Commands::Rank { file } => commands::rank::run(&config, &file),
        Commands::Tiers => commands::tiers::run(&config),
        Commands::RateLimit { token } => commands::rate_limit::run(&config, token).await,
        Commands::Serve { host, port } => {
            print_banner();
            commands::serve::run(config, host, port).await
        }
        Commands::Link {
            user,
            github_username,
            github_token,
        } => commands::link::run(&config, user, github_username, github_token),
        Commands::Me { server, session } => commands::me::run(&server, &session).await,
    };

    if let Err(e) = result {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

pub fn print_banner() {
    println!("{}", style_cyan(BANNER));
    println!(
        "  {} {}",
        style_dim("DevRank"),
        style_dim(&format!("v{}", VERSION))
    );
    println!();
}
