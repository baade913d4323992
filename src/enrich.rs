// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Per-repository enrichment
//!
//! Each repository needs one extra request (its language breakdown) before
//! it can become a [`DisplayProject`]. A batch fires all of those requests
//! at once, waits for every one to settle, and reports each outcome
//! separately so one bad repository never sinks the others.

use crate::client::GitHubClient;
use crate::error::EnrichmentFailure;
use crate::heuristics::{
    derive_technologies, derive_title, description_or_placeholder, infer_category, infer_end_date,
};
use crate::types::{DisplayProject, LanguageBreakdown, Period, RepositoryRecord};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, warn};

/// Outcome of enriching one repository
pub type Enrichment = Result<DisplayProject, EnrichmentFailure>;

/// Build the display form of a repository from its metadata and languages
#[must_use]
pub fn to_display_project(
    record: &RepositoryRecord,
    languages: &LanguageBreakdown,
    now: DateTime<Utc>,
) -> DisplayProject {
    DisplayProject {
        id: record.id,
        title: derive_title(&record.name),
        description: description_or_placeholder(record.description.as_deref()),
        technologies: derive_technologies(languages, &record.topics),
        start: Period::from_datetime(&record.created_at),
        end: infer_end_date(record.created_at, record.updated_at, now),
        category: infer_category(&record.name, &record.topics),
        repository_url: record.html_url.clone(),
        live_url: record.homepage.clone().filter(|h| !h.is_empty()),
        stars: record.stargazers_count,
        forks: record.forks_count,
        language: record.language.clone(),
    }
}

/// Fetch one repository's languages and derive its display form
///
/// Languages are requested for the repository's own owner when the payload
/// names one, otherwise for `account`.
pub async fn enrich(
    client: &GitHubClient,
    account: &str,
    record: &RepositoryRecord,
    now: DateTime<Utc>,
) -> Enrichment {
    let owner = record.owner_login().unwrap_or(account);

    match client.repository_languages(owner, &record.name).await {
        Ok(languages) => {
            debug!(repository = %record.name, languages = languages.len(), "enriched");
            Ok(to_display_project(record, &languages, now))
        }
        Err(source) => {
            warn!(repository = %record.name, error = %source, "dropping repository from timeline");
            Err(EnrichmentFailure::Languages {
                repository: record.name.clone(),
                source,
            })
        }
    }
}

/// Enrich every record concurrently, returning outcomes in input order
///
/// One task per record, no concurrency cap. Returns only after every task
/// has settled; a task that panics is reported as a failure for its record.
pub async fn enrich_all(
    client: Arc<GitHubClient>,
    account: &str,
    records: Vec<RepositoryRecord>,
    now: DateTime<Utc>,
) -> Vec<Enrichment> {
    let tasks = records
        .into_iter()
        .map(|record| {
            let client = Arc::clone(&client);
            let account = account.to_string();
            let name = record.name.clone();
            (name, async move { enrich(&client, &account, &record, now).await })
        })
        .collect();

    join_in_order(tasks).await
}

/// Spawn each named task on a `JoinSet` and collect outcomes in input order
///
/// Join errors are matched back to their own task by task id.
async fn join_in_order<T, F>(tasks: Vec<(String, F)>) -> Vec<Result<T, EnrichmentFailure>>
where
    T: Send + 'static,
    F: Future<Output = Result<T, EnrichmentFailure>> + Send + 'static,
{
    let mut names = Vec::with_capacity(tasks.len());
    let mut slots: HashMap<task::Id, usize> = HashMap::with_capacity(tasks.len());
    let mut join_set = JoinSet::new();

    for (index, (name, future)) in tasks.into_iter().enumerate() {
        let handle = join_set.spawn(async move { (index, future.await) });
        slots.insert(handle.id(), index);
        names.push(name);
    }

    let mut outcomes: Vec<Option<Result<T, EnrichmentFailure>>> =
        names.iter().map(|_| None).collect();

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, outcome)) => outcomes[index] = Some(outcome),
            Err(join_error) => {
                let Some(&index) = slots.get(&join_error.id()) else {
                    continue;
                };
                let repository = names[index].clone();
                let reason = task_failure_reason(join_error);
                warn!(%repository, %reason, "enrichment task failed");
                outcomes[index] = Some(Err(EnrichmentFailure::Task { repository, reason }));
            }
        }
    }

    outcomes
        .into_iter()
        .zip(names)
        .map(|(outcome, repository)| {
            outcome.unwrap_or_else(|| {
                Err(EnrichmentFailure::Task {
                    repository,
                    reason: "task did not report".to_string(),
                })
            })
        })
        .collect()
}

fn task_failure_reason(error: JoinError) -> String {
    if error.is_cancelled() {
        return "task was cancelled".to_string();
    }
    match error.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .map_or_else(
                || "task panicked".to_string(),
                |message| format!("task panicked: {message}"),
            ),
        Err(error) => error.to_string(),
    }
}
