// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod fetch;
pub mod milestones;
pub mod projects;

use anyhow::{Context, Result};
use careerline::types::TimelineEntry;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::Write;

/// How results are written to stdout
#[derive(Debug, Clone, Copy)]
pub struct Output {
    /// Pretty JSON instead of text
    pub json: bool,
    /// ANSI colors in text mode
    pub color: bool,
}

impl Output {
    /// Print a list of timeline entries, optionally restricted to one year
    pub fn print_entries<T>(&self, entries: &[&T], year: Option<i32>) -> Result<()>
    where
        T: TimelineEntry + Serialize,
    {
        if self.json {
            return self.print_json(&entries);
        }

        let mut stdout = std::io::stdout().lock();
        if entries.is_empty() {
            match year {
                Some(year) => writeln!(stdout, "No projects active in {year}")?,
                None => writeln!(stdout, "No projects found")?,
            }
            return Ok(());
        }

        for entry in entries {
            writeln!(stdout, "{}", render_entry(*entry, self.color))?;
        }

        writeln!(stdout)?;
        match year {
            Some(year) => writeln!(stdout, "Showing {} projects active in {year}", entries.len())?,
            None => writeln!(stdout, "Showing {} projects", entries.len())?,
        }
        Ok(())
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        Ok(())
    }
}

/// One entry as two text lines: span, title and category, then technologies
pub fn render_entry<T: TimelineEntry + ?Sized>(entry: &T, color: bool) -> String {
    let span = match entry.end() {
        Some(end) => format!("{} .. {}", entry.start(), end),
        None => format!("{} .. present", entry.start()),
    };

    let mut line = if color {
        format!(
            "{}  {} [{}]",
            span.dimmed(),
            entry.title().bold(),
            entry.category().cyan()
        )
    } else {
        format!("{span}  {} [{}]", entry.title(), entry.category())
    };

    if !entry.technologies().is_empty() {
        line.push_str("\n    ");
        line.push_str(&entry.technologies().join(", "));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerline::catalog::Catalog;

    #[test]
    fn test_render_entry_plain() {
        let catalog = Catalog::builtin().unwrap();
        let yahoo = catalog.active_in(2005, 2025)[0];

        insta::assert_snapshot!(render_entry(yahoo, false), @r"
        2004-01 .. 2006-12  Yahoo! Maps Product Development [work]
            Adobe Flex, ActionScript, AJAX, Flash, Mapping APIs
        ");
    }

    #[test]
    fn test_render_entry_ongoing() {
        let catalog = Catalog::builtin().unwrap();
        let ongoing = catalog
            .projects
            .iter()
            .find(|p| p.end.is_none())
            .unwrap();

        assert!(render_entry(ongoing, false).contains(".. present"));
    }
}
