// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cache-backed GitHub REST client

use crate::cache::{ResponseCache, DEFAULT_FRESHNESS};
use crate::error::FetchError;
use crate::types::{LanguageBreakdown, RepositoryRecord};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Public GitHub API host
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Repositories requested per listing; only the first page is ever read
pub const PAGE_SIZE: u32 = 100;

/// Construction options for [`GitHubClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API host, without trailing slash
    pub api_base: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// How long a cached response may be reused
    pub freshness: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            user_agent: concat!("careerline/", env!("CARGO_PKG_VERSION")).to_string(),
            freshness: DEFAULT_FRESHNESS,
        }
    }
}

/// GitHub REST client that memoizes every successful GET by URL
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    cache: Mutex<ResponseCache>,
}

impl GitHubClient {
    /// Build a client with its own empty cache
    pub fn new(options: ClientOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let http = reqwest::Client::builder()
            .user_agent(options.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            http,
            api_base: options.api_base.trim_end_matches('/').to_string(),
            cache: Mutex::new(ResponseCache::new(options.freshness)),
        })
    }

    /// API host this client talks to
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Number of URLs currently held in the cache, fresh or stale
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    /// GET `url` and decode the JSON body as `T`, serving fresh cache hits locally
    pub async fn fetch_cached<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let payload = self.fetch_cached_value(url).await?;
        serde_json::from_value(payload).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// GET `url` as untyped JSON, serving fresh cache hits locally
    ///
    /// Only successful, well-formed responses are stored. A failure leaves
    /// any existing entry for the URL untouched.
    pub async fn fetch_cached_value(&self, url: &str) -> Result<Value, FetchError> {
        if let Some(payload) = self.cached(url) {
            debug!(url, "cache hit");
            return Ok(payload);
        }

        debug!(url, "fetching");
        let transport = |reason: String| FetchError::Transport {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("HTTP {status}")));
        }

        let payload: Value = response.json().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                transport(e.to_string())
            }
        })?;

        self.lock_cache().store(url, payload.clone(), Instant::now());
        Ok(payload)
    }

    /// URL listing an account's repositories, oldest first
    #[must_use]
    pub fn user_repositories_url(&self, account: &str) -> String {
        format!(
            "{}/users/{}/repos?sort=created&direction=asc&per_page={}",
            self.api_base, account, PAGE_SIZE
        )
    }

    /// URL listing an organization's repositories, oldest first
    #[must_use]
    pub fn organization_repositories_url(&self, org: &str) -> String {
        format!(
            "{}/orgs/{}/repos?sort=created&direction=asc&per_page={}",
            self.api_base, org, PAGE_SIZE
        )
    }

    /// URL of a repository's language breakdown
    #[must_use]
    pub fn languages_url(&self, owner: &str, name: &str) -> String {
        format!("{}/repos/{}/{}/languages", self.api_base, owner, name)
    }

    /// Repositories owned by `account`, including forks
    pub async fn list_repositories(&self, account: &str) -> Result<Vec<RepositoryRecord>, FetchError> {
        self.fetch_cached(&self.user_repositories_url(account)).await
    }

    /// Repositories owned by the organization `org`, including forks
    pub async fn list_organization_repositories(
        &self,
        org: &str,
    ) -> Result<Vec<RepositoryRecord>, FetchError> {
        self.fetch_cached(&self.organization_repositories_url(org)).await
    }

    /// Full metadata for a single repository
    pub async fn repository(&self, owner: &str, name: &str) -> Result<RepositoryRecord, FetchError> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, name);
        self.fetch_cached(&url).await
    }

    /// Bytes of code per language for a single repository
    pub async fn repository_languages(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<LanguageBreakdown, FetchError> {
        self.fetch_cached(&self.languages_url(owner, name)).await
    }

    fn cached(&self, url: &str) -> Option<Value> {
        self.lock_cache().fresh(url, Instant::now()).cloned()
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GitHubClient {
        GitHubClient::new(ClientOptions {
            api_base: base.to_string(),
            ..ClientOptions::default()
        })
        .unwrap()
    }

    #[test]
    fn test_user_repositories_url() {
        let client = client("https://api.github.com/");
        assert_eq!(
            client.user_repositories_url("someone"),
            "https://api.github.com/users/someone/repos?sort=created&direction=asc&per_page=100"
        );
    }

    #[test]
    fn test_languages_and_org_urls() {
        let client = client("http://127.0.0.1:9999");
        assert_eq!(
            client.languages_url("someone", "widget"),
            "http://127.0.0.1:9999/repos/someone/widget/languages"
        );
        assert_eq!(
            client.organization_repositories_url("acme"),
            "http://127.0.0.1:9999/orgs/acme/repos?sort=created&direction=asc&per_page=100"
        );
    }

    #[test]
    fn test_new_client_starts_with_empty_cache() {
        let client = client(GITHUB_API_BASE);
        assert_eq!(client.cached_entries(), 0);
        assert_eq!(client.api_base(), GITHUB_API_BASE);
    }
}
