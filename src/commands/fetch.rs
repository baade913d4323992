// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Fetch command - builds the live timeline from GitHub

use super::{projects, Output};
use anyhow::{Context, Result};
use careerline::client::GitHubClient;
use careerline::config::Config;
use careerline::timeline::{active_in_year, RepositorySource, TimelineLoader};
use chrono::{Datelike, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Arguments for the fetch command
pub struct FetchArgs {
    /// User account override
    pub account: Option<String>,
    /// Organization to list instead of a user
    pub org: Option<String>,
    /// Only show projects active in this year
    pub year: Option<i32>,
    /// Show the career catalog if the fetch fails
    pub fallback: bool,
}

/// Run the fetch command
pub async fn run(config: &Config, args: FetchArgs, output: Output) -> Result<()> {
    let source = match (args.org, args.account) {
        (Some(org), _) => RepositorySource::Organization(org),
        (None, Some(account)) => RepositorySource::User(account),
        (None, None) => RepositorySource::User(config.account.clone()),
    };

    let client = GitHubClient::new(config.client_options()).context("Failed to create GitHub client")?;
    let loader = TimelineLoader::new(Arc::new(client), source);
    info!(source = loader.source().login(), "Fetching live timeline");

    match loader.load().await {
        Ok(timeline) => {
            let current_year = Utc::now().year();
            let shown = match args.year {
                Some(year) => active_in_year(&timeline, year, current_year),
                None => timeline.iter().collect(),
            };
            output.print_entries(&shown, args.year)
        }
        Err(e) if args.fallback => {
            warn!(error = %e, "Live data unavailable, showing career catalog instead");
            projects::run(config, args.year, None, output)
        }
        Err(e) => Err(e).with_context(|| {
            format!(
                "Failed to fetch repositories for {}; rerun with --fallback or use `careerline projects`",
                loader.source().login()
            )
        }),
    }
}
