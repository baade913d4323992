// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Careerline CLI - career timeline from GitHub repositories

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Output;

#[derive(Parser)]
#[command(name = "careerline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "CAREERLINE_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the timeline from live GitHub data
    Fetch {
        /// GitHub user (defaults to the configured account)
        #[arg(long)]
        account: Option<String>,

        /// GitHub organization instead of a user
        #[arg(long, conflicts_with = "account")]
        org: Option<String>,

        /// Only show projects active in this year
        #[arg(long)]
        year: Option<i32>,

        /// Fall back to the career catalog if the fetch fails
        #[arg(long)]
        fallback: bool,
    },

    /// List the static career catalog
    Projects {
        /// Only show projects active in this year
        #[arg(long)]
        year: Option<i32>,

        /// Catalog file to use instead of the configured one
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,
    },

    /// Show the timeline range and milestone years
    Milestones {
        /// Catalog file to use instead of the configured one
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,
    },

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = careerline::config::load(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over flags and config
    let level = match cli.verbose {
        0 if cli.quiet => "error",
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let output = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Fetch { account, org, year, fallback } => {
            let args = commands::fetch::FetchArgs { account, org, year, fallback };
            commands::fetch::run(&config, args, output).await
        }
        Commands::Projects { year, catalog } => {
            commands::projects::run(&config, year, catalog, output)
        }
        Commands::Milestones { catalog } => {
            commands::milestones::run(&config, catalog, output)
        }
        Commands::Config => {
            commands::config::run(&config, output)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
