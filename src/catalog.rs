// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Static career catalog
//!
//! The fallback project list used when live data is not wanted or not
//! available. A catalog is a TOML document; one ships inside the binary and
//! another can be loaded from disk.

use crate::types::{Period, ProjectCategory, TimelineEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../data/career_projects.toml");

/// Errors while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("failed to read catalog {path}: {source}")]
    Read {
        /// File path
        path: String,
        /// I/O error
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid TOML of the expected shape
    #[error("failed to parse catalog {origin}: {source}")]
    Parse {
        /// Where the text came from
        origin: String,
        /// Parser error
        #[source]
        source: toml::de::Error,
    },

    /// The catalog parsed but is inconsistent
    #[error("invalid catalog {origin}: {reason}")]
    Invalid {
        /// Where the text came from
        origin: String,
        /// What is wrong
        reason: String,
    },
}

/// A hand-written career entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProject {
    /// Unique within the catalog
    pub id: u64,
    /// Card title
    pub title: String,
    /// Card description
    pub description: String,
    /// Technology labels
    #[serde(default)]
    pub technologies: Vec<String>,
    /// First active period
    pub start: Period,
    /// Last active period; absent while ongoing
    #[serde(default)]
    pub end: Option<Period>,
    /// Category badge
    pub category: ProjectCategory,
    /// Source repository
    #[serde(default)]
    pub repository_url: Option<String>,
    /// Deployed site
    #[serde(default)]
    pub live_url: Option<String>,
}

impl TimelineEntry for CatalogProject {
    fn title(&self) -> &str {
        &self.title
    }

    fn start(&self) -> Period {
        self.start
    }

    fn end(&self) -> Option<Period> {
        self.end
    }

    fn category(&self) -> ProjectCategory {
        self.category
    }

    fn technologies(&self) -> &[String] {
        &self.technologies
    }
}

/// Timeline range, milestone years and projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// First year on the timeline
    pub first_year: i32,
    /// Last year on the timeline
    pub last_year: i32,
    /// Years worth highlighting
    #[serde(default)]
    pub milestones: Vec<i32>,
    /// Career projects
    #[serde(default)]
    pub projects: Vec<CatalogProject>,
}

impl Catalog {
    /// Parse and validate catalog text; `origin` names it in errors
    pub fn from_toml_str(origin: &str, text: &str) -> Result<Self, CatalogError> {
        let catalog: Self = toml::from_str(text).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        catalog.validate(origin)?;
        Ok(catalog)
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str("<builtin>", BUILTIN_CATALOG)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&path.display().to_string(), &text)
    }

    /// Years covered by the timeline
    #[must_use]
    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    /// Projects active in `year`, in catalog order
    #[must_use]
    pub fn active_in(&self, year: i32, current_year: i32) -> Vec<&CatalogProject> {
        crate::timeline::active_in_year(&self.projects, year, current_year)
    }

    fn validate(&self, origin: &str) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::Invalid {
            origin: origin.to_string(),
            reason,
        };

        if self.first_year > self.last_year {
            return Err(invalid(format!(
                "first_year {} is after last_year {}",
                self.first_year, self.last_year
            )));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.id) {
                return Err(invalid(format!("duplicate project id {}", project.id)));
            }
            if let Some(end) = project.end {
                if end < project.start {
                    return Err(invalid(format!(
                        "project {} ends ({end}) before it starts ({})",
                        project.id, project.start
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.years(), 2001..=2025);
        assert_eq!(catalog.projects.len(), 12);
        assert!(catalog.milestones.contains(&2009));
    }

    #[test]
    fn test_builtin_catalog_active_years() {
        let catalog = Catalog::builtin().unwrap();

        let titles: Vec<&str> = catalog
            .active_in(2005, 2025)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["Yahoo! Maps Product Development"]);

        assert!(catalog.active_in(2008, 2025).is_empty());
        assert_eq!(catalog.active_in(2024, 2025).len(), 3);
    }

    #[test]
    fn test_rejects_end_before_start() {
        let text = r#"
            first_year = 2000
            last_year = 2010

            [[projects]]
            id = 1
            title = "Backwards"
            description = "x"
            start = "2005-06"
            end = "2004-01"
            category = "work"
        "#;

        let err = Catalog::from_toml_str("test", text).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let text = r#"
            first_year = 2000
            last_year = 2010

            [[projects]]
            id = 1
            title = "A"
            description = "x"
            start = "2005-06"
            category = "personal"

            [[projects]]
            id = 1
            title = "B"
            description = "y"
            start = "2006-06"
            category = "open-source"
        "#;

        let err = Catalog::from_toml_str("test", text).unwrap_err();
        assert!(err.to_string().contains("duplicate project id 1"));
    }

    #[test]
    fn test_rejects_bad_period() {
        let text = r#"
            first_year = 2000
            last_year = 2010

            [[projects]]
            id = 1
            title = "A"
            description = "x"
            start = "June 2005"
            category = "personal"
        "#;

        assert!(matches!(
            Catalog::from_toml_str("test", text),
            Err(CatalogError::Parse { .. })
        ));
    }
}
