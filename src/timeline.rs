// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Timeline aggregation, ordering and the observable fetch cycle

use crate::client::GitHubClient;
use crate::enrich::enrich_all;
use crate::error::FetchError;
use crate::types::{DisplayProject, RepositoryRecord, TimelineEntry};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Whose repositories make up the timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySource {
    /// A user account
    User(String),
    /// An organization
    Organization(String),
}

impl RepositorySource {
    /// Account or organization login
    #[must_use]
    pub fn login(&self) -> &str {
        match self {
            Self::User(login) | Self::Organization(login) => login,
        }
    }
}

/// Sort projects by start period, keeping fetch order for equal starts
pub fn order_by_start(projects: &mut [DisplayProject]) {
    projects.sort_by_key(|p| p.start);
}

/// Turn fetched records into an ordered timeline
///
/// Forks are skipped, the rest are enriched concurrently, failed
/// enrichments are dropped and the survivors are ordered by start period.
pub async fn build_timeline(
    client: Arc<GitHubClient>,
    account: &str,
    records: Vec<RepositoryRecord>,
    now: DateTime<Utc>,
) -> Vec<DisplayProject> {
    let fetched = records.len();
    let originals: Vec<RepositoryRecord> = records.into_iter().filter(|r| !r.fork).collect();
    let forks = fetched - originals.len();
    let candidates = originals.len();

    let mut projects: Vec<DisplayProject> = enrich_all(client, account, originals, now)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .collect();
    order_by_start(&mut projects);

    info!(
        fetched,
        forks,
        dropped = candidates - projects.len(),
        projects = projects.len(),
        "timeline built"
    );
    projects
}

/// List the source's repositories and build their timeline
///
/// A failure to list repositories fails the whole cycle; per-repository
/// failures only shrink the result.
pub async fn fetch_timeline(
    client: Arc<GitHubClient>,
    source: &RepositorySource,
    now: DateTime<Utc>,
) -> Result<Vec<DisplayProject>, FetchError> {
    let records = match source {
        RepositorySource::User(account) => client.list_repositories(account).await?,
        RepositorySource::Organization(org) => client.list_organization_repositories(org).await?,
    };
    debug!(source = source.login(), repositories = records.len(), "repositories listed");

    Ok(build_timeline(client, source.login(), records, now).await)
}

/// Entries whose start..end span covers `year`; an open end counts as `current_year`
pub fn active_in_year<T: TimelineEntry>(entries: &[T], year: i32, current_year: i32) -> Vec<&T> {
    entries
        .iter()
        .filter(|e| e.is_active_in(year, current_year))
        .collect()
}

// =============================================================================
// Loader
// =============================================================================

/// Observable state of the live timeline
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState {
    /// No fetch requested yet
    #[default]
    Idle,
    /// A fetch cycle is running
    Loading,
    /// The last cycle produced a timeline
    Ready(Vec<DisplayProject>),
    /// The last cycle failed
    Failed(FetchError),
}

impl LoadState {
    /// True while a cycle is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True once a cycle has produced either a timeline or an error
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    /// Projects of a successful cycle, empty otherwise
    #[must_use]
    pub fn projects(&self) -> &[DisplayProject] {
        match self {
            Self::Ready(projects) => projects,
            _ => &[],
        }
    }

    /// Error of a failed cycle
    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Result of asking the loader to start a cycle
#[derive(Debug)]
pub enum Trigger {
    /// A new cycle was spawned
    Started(JoinHandle<()>),
    /// A cycle was already running; nothing was started
    AlreadyLoading,
}

impl Trigger {
    /// True if this trigger spawned a new cycle
    #[must_use]
    pub fn started(&self) -> bool {
        matches!(self, Self::Started(_))
    }
}

/// Publishes the outcome of one fetch cycle
///
/// A cycle task that panics or is aborted drops its guard without settling,
/// which publishes `Failed` so the loader never stays stuck in `Loading`.
struct CycleGuard {
    state: Option<Arc<watch::Sender<LoadState>>>,
}

impl CycleGuard {
    fn settle(mut self, outcome: LoadState) {
        if let Some(state) = self.state.take() {
            state.send_replace(outcome);
        }
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            error!("timeline fetch cycle stopped before settling");
            state.send_replace(LoadState::Failed(FetchError::Interrupted(
                "fetch cycle was aborted or panicked".to_string(),
            )));
        }
    }
}

/// Runs fetch cycles and publishes their state
///
/// At most one cycle runs at a time: a trigger that arrives while a cycle is
/// in flight is ignored, and callers waiting through [`TimelineLoader::load`]
/// receive the in-flight cycle's result.
pub struct TimelineLoader {
    client: Arc<GitHubClient>,
    source: RepositorySource,
    state: Arc<watch::Sender<LoadState>>,
}

impl TimelineLoader {
    /// Create an idle loader
    #[must_use]
    pub fn new(client: Arc<GitHubClient>, source: RepositorySource) -> Self {
        let (state, _) = watch::channel(LoadState::Idle);
        Self {
            client,
            source,
            state: Arc::new(state),
        }
    }

    /// Where repositories are listed from
    #[must_use]
    pub fn source(&self) -> &RepositorySource {
        &self.source
    }

    /// Observe state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Start a fetch cycle unless one is already running
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger(&self) -> Trigger {
        let mut started = false;
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = LoadState::Loading;
            started = true;
            true
        });

        if !started {
            debug!(source = self.source.login(), "fetch already in flight, trigger ignored");
            return Trigger::AlreadyLoading;
        }

        let client = Arc::clone(&self.client);
        let source = self.source.clone();
        let guard = CycleGuard {
            state: Some(Arc::clone(&self.state)),
        };

        Trigger::Started(tokio::spawn(async move {
            let settled = match fetch_timeline(client, &source, Utc::now()).await {
                Ok(projects) => LoadState::Ready(projects),
                Err(e) => {
                    error!(source = source.login(), error = %e, "timeline fetch failed");
                    LoadState::Failed(e)
                }
            };
            guard.settle(settled);
        }))
    }

    /// Trigger a cycle (or join the running one) and wait for its outcome
    pub async fn load(&self) -> Result<Vec<DisplayProject>, FetchError> {
        self.trigger();

        let mut updates = self.subscribe();
        let settled = match updates.wait_for(LoadState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };

        match settled {
            LoadState::Ready(projects) => Ok(projects),
            LoadState::Failed(e) => Err(e),
            LoadState::Idle | LoadState::Loading => Err(FetchError::Interrupted(
                "fetch cycle ended without a result".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Period, ProjectCategory};

    fn project(id: u64, start: &str, end: Option<&str>) -> DisplayProject {
        DisplayProject {
            id,
            title: format!("Project {id}"),
            description: String::new(),
            technologies: vec![],
            start: start.parse().unwrap(),
            end: end.map(|e| e.parse::<Period>().unwrap()),
            category: ProjectCategory::Personal,
            repository_url: format!("https://github.com/someone/p{id}"),
            live_url: None,
            stars: 0,
            forks: 0,
            language: None,
        }
    }

    #[test]
    fn test_order_by_start_is_stable() {
        let mut projects = vec![
            project(1, "2021-05", None),
            project(2, "2019-01", None),
            project(3, "2021-05", None),
            project(4, "2020-12", None),
        ];
        order_by_start(&mut projects);
        let ids: Vec<u64> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 4, 1, 3]);
    }

    #[test]
    fn test_active_in_year_bounds_are_inclusive() {
        let projects = vec![
            project(1, "2016-10", Some("2018-01")),
            project(2, "2018-09", Some("2021-12")),
            project(3, "2023-09", None),
        ];

        let ids = |year| -> Vec<u64> {
            active_in_year(&projects, year, 2025).iter().map(|p| p.id).collect()
        };
        assert_eq!(ids(2018), [1, 2]);
        assert_eq!(ids(2022), Vec::<u64>::new());
        assert_eq!(ids(2025), [3]);
        assert_eq!(ids(2026), Vec::<u64>::new());
    }

    #[test]
    fn test_load_state_accessors() {
        let failed = LoadState::Failed(FetchError::Client("boom".into()));
        assert!(failed.is_settled());
        assert!(failed.projects().is_empty());
        assert!(failed.error().is_some());

        let ready = LoadState::Ready(vec![project(1, "2020-01", None)]);
        assert!(ready.is_settled() && ready.error().is_none());
        assert_eq!(ready.projects().len(), 1);

        assert!(!LoadState::Idle.is_settled());
        assert!(LoadState::Loading.is_loading());
    }

    #[test]
    fn test_dropped_cycle_guard_publishes_failure() {
        let (state, _) = watch::channel(LoadState::Loading);
        let state = Arc::new(state);

        drop(CycleGuard {
            state: Some(Arc::clone(&state)),
        });

        assert!(matches!(
            state.borrow().error(),
            Some(FetchError::Interrupted(_))
        ));
    }

    #[test]
    fn test_settled_cycle_guard_keeps_outcome() {
        let (state, _) = watch::channel(LoadState::Loading);
        let state = Arc::new(state);

        CycleGuard {
            state: Some(Arc::clone(&state)),
        }
        .settle(LoadState::Ready(vec![project(1, "2020-01", None)]));

        assert_eq!(state.borrow().projects().len(), 1);
    }

    #[test]
    fn test_source_login() {
        assert_eq!(RepositorySource::User("me".into()).login(), "me");
        assert_eq!(RepositorySource::Organization("acme".into()).login(), "acme");
    }
}
