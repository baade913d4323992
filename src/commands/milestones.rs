// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Milestones command - timeline range and highlighted career years

use super::{projects, Output};
use anyhow::Result;
use careerline::config::Config;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Run the milestones command
pub fn run(config: &Config, path: Option<PathBuf>, output: Output) -> Result<()> {
    let catalog = projects::load_catalog(config, path)?;

    if output.json {
        return output.print_json(&serde_json::json!({
            "first_year": catalog.first_year,
            "last_year": catalog.last_year,
            "milestones": catalog.milestones,
        }));
    }

    println!("Timeline {} .. {}", catalog.first_year, catalog.last_year);
    for year in catalog.years() {
        if !catalog.milestones.contains(&year) {
            continue;
        }
        let started = catalog
            .projects
            .iter()
            .filter(|p| p.start.year() == year)
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        if output.color {
            println!("  {}  {}", year.bold(), started.dimmed());
        } else {
            println!("  {year}  {started}");
        }
    }
    Ok(())
}
