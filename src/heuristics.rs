// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Derivation heuristics: repository metadata to display fields
//!
//! Category and end-date inference are ordered rule tables. The first rule
//! that matches decides; new rules must be inserted at the position that
//! gives them the intended precedence.

use crate::types::{LanguageBreakdown, Period, ProjectCategory};
use chrono::{DateTime, Datelike, Months, Utc};
use tracing::trace;

/// Maximum number of technology labels on a project
pub const MAX_TECHNOLOGIES: usize = 6;

/// Placeholder used when a repository has no description
pub const MISSING_DESCRIPTION: &str = "No description available";

// =============================================================================
// Technologies
// =============================================================================

/// Topic tag (lowercase) to display name
pub const TOPIC_DISPLAY_NAMES: &[(&str, &str)] = &[
    ("reactjs", "React"),
    ("nodejs", "Node.js"),
    ("typescript", "TypeScript"),
    ("javascript", "JavaScript"),
    ("nextjs", "Next.js"),
    ("tailwindcss", "Tailwind CSS"),
    ("mongodb", "MongoDB"),
    ("postgresql", "PostgreSQL"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
];

/// Display name for a topic tag, or the tag itself when unmapped
#[must_use]
pub fn topic_display_name(topic: &str) -> &str {
    let lowered = topic.to_lowercase();
    TOPIC_DISPLAY_NAMES
        .iter()
        .find(|(tag, _)| *tag == lowered)
        .map_or(topic, |&(_, display)| display)
}

/// Technology labels for a project: languages first, then mapped topics
///
/// Labels are deduplicated on first insertion and the result is cut to
/// [`MAX_TECHNOLOGIES`], so languages win over topics when space runs out.
#[must_use]
pub fn derive_technologies(languages: &LanguageBreakdown, topics: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    let candidates = languages
        .languages()
        .chain(topics.iter().map(|t| topic_display_name(t)));

    for label in candidates {
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }

    labels.truncate(MAX_TECHNOLOGIES);
    labels
}

// =============================================================================
// Category
// =============================================================================

/// What a category rule looks at
#[derive(Debug, Clone, Copy)]
pub enum Signal {
    /// Any topic tag equals one of these
    TopicIn(&'static [&'static str]),
    /// The repository name contains one of these substrings
    NameContains(&'static [&'static str]),
}

impl Signal {
    fn matches(&self, name: &str, topics: &[String]) -> bool {
        match self {
            Self::TopicIn(tags) => topics
                .iter()
                .any(|t| tags.iter().any(|tag| t.as_str() == *tag)),
            Self::NameContains(needles) => needles.iter().any(|n| name.contains(n)),
        }
    }
}

/// One row of the category table
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Condition
    pub signal: Signal,
    /// Category assigned when the condition holds
    pub category: ProjectCategory,
}

/// Category rules in precedence order
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        signal: Signal::TopicIn(&["work", "enterprise"]),
        category: ProjectCategory::Work,
    },
    CategoryRule {
        signal: Signal::TopicIn(&["open-source", "library"]),
        category: ProjectCategory::OpenSource,
    },
    CategoryRule {
        signal: Signal::NameContains(&["lib", "component"]),
        category: ProjectCategory::OpenSource,
    },
    CategoryRule {
        signal: Signal::NameContains(&["portfolio", "personal"]),
        category: ProjectCategory::Personal,
    },
];

/// Category when no rule matches
pub const DEFAULT_CATEGORY: ProjectCategory = ProjectCategory::Personal;

/// Guess a project's category from its name and topic tags
#[must_use]
pub fn infer_category(name: &str, topics: &[String]) -> ProjectCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.signal.matches(name, topics))
        .map_or(DEFAULT_CATEGORY, |rule| rule.category)
}

// =============================================================================
// End date
// =============================================================================

/// Timestamps an end-date rule is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct Activity {
    /// Repository creation
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: DateTime<Utc>,
    /// Evaluation instant
    pub now: DateTime<Utc>,
}

/// One row of the end-date table; a match ends the project at its last update
#[derive(Debug, Clone, Copy)]
pub struct EndDateRule {
    /// Short rule name, used in logs
    pub name: &'static str,
    /// Condition
    pub applies: fn(&Activity) -> bool,
}

fn untouched_for_a_year(activity: &Activity) -> bool {
    activity
        .now
        .checked_sub_months(Months::new(12))
        .is_some_and(|cutoff| activity.updated_at < cutoff)
}

fn single_calendar_year(activity: &Activity) -> bool {
    activity.created_at.year() == activity.updated_at.year()
}

/// End-date rules in precedence order; no match means ongoing
pub const END_DATE_RULES: &[EndDateRule] = &[
    EndDateRule {
        name: "stale",
        applies: untouched_for_a_year,
    },
    EndDateRule {
        name: "same-year",
        applies: single_calendar_year,
    },
];

/// Guess when a project ended, or `None` if it looks ongoing
#[must_use]
pub fn infer_end_date(
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<Period> {
    let activity = Activity {
        created_at,
        updated_at,
        now,
    };

    END_DATE_RULES
        .iter()
        .find(|rule| (rule.applies)(&activity))
        .map(|rule| {
            trace!(rule = rule.name, %updated_at, "project presumed ended");
            Period::from_datetime(&updated_at)
        })
}

// =============================================================================
// Text fields
// =============================================================================

/// Title from a repository name: `my-cool-app` becomes `My Cool App`
///
/// Only `-` separates words. Every segment is kept, so a doubled dash
/// yields a doubled space and underscores pass through unchanged.
#[must_use]
pub fn derive_title(name: &str) -> String {
    name.split('-').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Description, or [`MISSING_DESCRIPTION`] when absent or empty
#[must_use]
pub fn description_or_placeholder(description: Option<&str>) -> String {
    description
        .filter(|d| !d.is_empty())
        .unwrap_or(MISSING_DESCRIPTION)
        .to_string()
}
