// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Careerline library - a career timeline built from GitHub repositories
//!
//! This crate fetches the repositories of one GitHub account, enriches each
//! with its language breakdown, derives display fields (title, category,
//! technologies, start and end periods) and orders the result into a
//! timeline. A static career catalog backs the timeline when live data is
//! unavailable.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod heuristics;
pub mod timeline;

/// Core data types shared by the fetch pipeline and the catalog
pub mod types {
    use chrono::{DateTime, Datelike, Utc};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;
    use std::str::FromStr;

    // =========================================================================
    // Period
    // =========================================================================

    /// A calendar year-month, rendered as `YYYY-MM`
    ///
    /// Ordering is chronological: year first, then month.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    pub struct Period {
        year: i32,
        month: u32,
    }

    impl Period {
        /// Build a period, rejecting months outside 1..=12
        #[must_use]
        pub fn new(year: i32, month: u32) -> Option<Self> {
            (1..=12).contains(&month).then_some(Self { year, month })
        }

        /// The period a timestamp falls in (UTC)
        #[must_use]
        pub fn from_datetime(at: &DateTime<Utc>) -> Self {
            Self {
                year: at.year(),
                month: at.month(),
            }
        }

        /// Calendar year
        #[must_use]
        pub fn year(&self) -> i32 {
            self.year
        }

        /// Month of the year, 1-based
        #[must_use]
        pub fn month(&self) -> u32 {
            self.month
        }
    }

    impl fmt::Display for Period {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:04}-{:02}", self.year, self.month)
        }
    }

    /// Error returned when a string is not a `YYYY-MM` period
    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("invalid year-month period: {0:?}")]
    pub struct ParsePeriodError(String);

    impl FromStr for Period {
        type Err = ParsePeriodError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let invalid = || ParsePeriodError(s.to_string());
            let (year, month) = s.split_once('-').ok_or_else(invalid)?;

            if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }

            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month.parse().map_err(|_| invalid())?;
            Self::new(year, month).ok_or_else(invalid)
        }
    }

    impl TryFrom<String> for Period {
        type Error = ParsePeriodError;

        fn try_from(value: String) -> Result<Self, Self::Error> {
            value.parse()
        }
    }

    impl From<Period> for String {
        fn from(period: Period) -> Self {
            period.to_string()
        }
    }

    // =========================================================================
    // Repository (raw API payload)
    // =========================================================================

    /// Owner block of a repository payload
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RepositoryOwner {
        /// Account login
        pub login: String,
    }

    /// A repository as returned by the GitHub REST API
    ///
    /// Only the fields the timeline needs are decoded; the rest of the
    /// payload is ignored.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct RepositoryRecord {
        /// Numeric repository ID
        pub id: u64,
        /// Repository name (without owner)
        pub name: String,
        /// Free-text description
        pub description: Option<String>,
        /// Canonical web URL
        pub html_url: String,
        /// Project homepage, often a deployed site
        pub homepage: Option<String>,
        /// Primary language as detected by GitHub
        pub language: Option<String>,
        /// Stargazer count
        pub stargazers_count: u64,
        /// Fork count
        pub forks_count: u64,
        /// Creation timestamp
        pub created_at: DateTime<Utc>,
        /// Last update timestamp
        pub updated_at: DateTime<Utc>,
        /// Topic tags
        #[serde(default)]
        pub topics: Vec<String>,
        /// Whether this repository is a fork
        #[serde(default)]
        pub fork: bool,
        /// Owning account
        #[serde(default)]
        pub owner: Option<RepositoryOwner>,
    }

    impl RepositoryRecord {
        /// Login of the owning account, if the payload carried one
        #[must_use]
        pub fn owner_login(&self) -> Option<&str> {
            self.owner.as_ref().map(|o| o.login.as_str())
        }
    }

    // =========================================================================
    // Language breakdown
    // =========================================================================

    /// Bytes of code per language for one repository, in payload order
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct LanguageBreakdown {
        entries: Vec<(String, u64)>,
    }

    impl LanguageBreakdown {
        /// Create an empty breakdown
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Language names in payload order
        pub fn languages(&self) -> impl Iterator<Item = &str> {
            self.entries.iter().map(|(name, _)| name.as_str())
        }

        /// Byte count for a language
        #[must_use]
        pub fn bytes(&self, language: &str) -> Option<u64> {
            self.entries
                .iter()
                .find(|(name, _)| name == language)
                .map(|(_, bytes)| *bytes)
        }

        /// Number of languages
        #[must_use]
        pub fn len(&self) -> usize {
            self.entries.len()
        }

        /// True when no language was reported
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }
    }

    impl FromIterator<(String, u64)> for LanguageBreakdown {
        fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
            let mut breakdown = Self::new();
            for (name, bytes) in iter {
                if breakdown.bytes(&name).is_none() {
                    breakdown.entries.push((name, bytes));
                }
            }
            breakdown
        }
    }

    impl Serialize for LanguageBreakdown {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.entries.len()))?;
            for (name, bytes) in &self.entries {
                map.serialize_entry(name, bytes)?;
            }
            map.end()
        }
    }

    impl<'de> Deserialize<'de> for LanguageBreakdown {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct BreakdownVisitor;

            impl<'de> Visitor<'de> for BreakdownVisitor {
                type Value = LanguageBreakdown;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a map of language name to byte count")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                    let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                    while let Some((name, bytes)) = access.next_entry::<String, u64>()? {
                        entries.push((name, bytes));
                    }
                    Ok(entries.into_iter().collect())
                }
            }

            deserializer.deserialize_map(BreakdownVisitor)
        }
    }

    // =========================================================================
    // Display projects
    // =========================================================================

    /// Project category shown on timeline cards
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "kebab-case")]
    pub enum ProjectCategory {
        /// Paid or employer work
        Work,
        /// Personal project
        Personal,
        /// Published library or component
        OpenSource,
    }

    impl ProjectCategory {
        /// Stable lowercase label
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Work => "work",
                Self::Personal => "personal",
                Self::OpenSource => "open-source",
            }
        }
    }

    impl fmt::Display for ProjectCategory {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    /// A repository turned into a timeline entry
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct DisplayProject {
        /// Repository ID
        pub id: u64,
        /// Human-readable title derived from the repository name
        pub title: String,
        /// Description or a fixed placeholder
        pub description: String,
        /// Up to six technology labels, languages first
        pub technologies: Vec<String>,
        /// Period the repository was created in
        pub start: Period,
        /// Inferred end period, absent while presumed ongoing
        pub end: Option<Period>,
        /// Inferred category
        pub category: ProjectCategory,
        /// Repository web URL
        pub repository_url: String,
        /// Deployed site, if any
        pub live_url: Option<String>,
        /// Stargazer count
        pub stars: u64,
        /// Fork count
        pub forks: u64,
        /// Primary language
        pub language: Option<String>,
    }

    /// Behaviour shared by everything that can sit on the timeline
    pub trait TimelineEntry {
        /// Card title
        fn title(&self) -> &str;
        /// First active period
        fn start(&self) -> Period;
        /// Last active period, `None` while ongoing
        fn end(&self) -> Option<Period>;
        /// Category badge
        fn category(&self) -> ProjectCategory;
        /// Technology labels
        fn technologies(&self) -> &[String];

        /// Whether the entry spans `year`, counting an open end as `current_year`
        fn is_active_in(&self, year: i32, current_year: i32) -> bool {
            let first = self.start().year();
            let last = self.end().map_or(current_year, |p| p.year());
            (first..=last).contains(&year)
        }
    }

    impl TimelineEntry for DisplayProject {
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

}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{EnrichmentFailure, FetchError};
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
