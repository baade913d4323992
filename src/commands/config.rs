// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - shows the effective configuration

use super::Output;
use anyhow::Result;
use careerline::config::{default_path, Config};

/// Print the merged configuration and where it was looked for
pub fn run(config: &Config, output: Output) -> Result<()> {
    if output.json {
        return output.print_json(config);
    }

    if let Some(path) = default_path() {
        println!("# default config file: {}", path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
