// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Projects command - lists the static career catalog

use super::Output;
use anyhow::{Context, Result};
use careerline::catalog::Catalog;
use careerline::config::Config;
use chrono::{Datelike, Utc};
use std::path::PathBuf;
use tracing::debug;

/// Load the catalog named on the command line, in config, or the built-in one
pub fn load_catalog(config: &Config, path: Option<PathBuf>) -> Result<Catalog> {
    match path.or_else(|| config.catalog_path.clone()) {
        Some(path) => {
            debug!("Loading catalog from {}", path.display());
            Catalog::load(&path).with_context(|| format!("Failed to load catalog {}", path.display()))
        }
        None => Catalog::builtin().context("Built-in catalog is invalid"),
    }
}

/// Run the projects command
pub fn run(config: &Config, year: Option<i32>, path: Option<PathBuf>, output: Output) -> Result<()> {
    let catalog = load_catalog(config, path)?;

    let shown = match year {
        Some(year) => catalog.active_in(year, Utc::now().year()),
        None => catalog.projects.iter().collect(),
    };

    output.print_entries(&shown, year)
}
