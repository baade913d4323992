// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for the fetch pipeline

use thiserror::Error;

/// Failure of a single cached GET request
///
/// Carries rendered messages rather than the underlying `reqwest` and
/// `serde_json` errors so it can be cloned into the loader's observable
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request could not be sent, or the response status was not 2xx
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// Requested URL
        url: String,
        /// What went wrong
        reason: String,
    },

    /// The body was not JSON, or not the JSON shape we expected
    #[error("could not decode response from {url}: {reason}")]
    Decode {
        /// Requested URL
        url: String,
        /// What went wrong
        reason: String,
    },

    /// The HTTP client itself could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// The fetch cycle stopped before producing a result
    #[error("fetch cycle interrupted: {0}")]
    Interrupted(String),
}

impl FetchError {
    /// URL of the failed request, if there was one
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. } | Self::Decode { url, .. } => Some(url),
            Self::Client(_) | Self::Interrupted(_) => None,
        }
    }

    /// True for network and HTTP status failures
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// True for payload parsing failures
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// A repository that could not be turned into a timeline entry
///
/// Enrichment failures are isolated: the repository is dropped from the
/// timeline and the rest of the batch carries on.
#[derive(Debug, Clone, Error)]
pub enum EnrichmentFailure {
    /// The language breakdown request failed
    #[error("could not fetch languages for {repository}: {source}")]
    Languages {
        /// Repository name
        repository: String,
        /// Underlying request failure
        #[source]
        source: FetchError,
    },

    /// The enrichment task panicked or was aborted
    #[error("enrichment task for {repository} did not complete: {reason}")]
    Task {
        /// Repository name
        repository: String,
        /// Join error message
        reason: String,
    },
}

impl EnrichmentFailure {
    /// Name of the repository that was dropped
    #[must_use]
    pub fn repository(&self) -> &str {
        match self {
            Self::Languages { repository, .. } | Self::Task { repository, .. } => repository,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        let transport = FetchError::Transport {
            url: "https://api.example/x".into(),
            reason: "HTTP 500".into(),
        };
        let decode = FetchError::Decode {
            url: "https://api.example/y".into(),
            reason: "expected value".into(),
        };

        assert!(transport.is_transport() && !transport.is_decode());
        assert!(decode.is_decode() && !decode.is_transport());
        assert_eq!(transport.url(), Some("https://api.example/x"));
        assert_eq!(FetchError::Client("tls".into()).url(), None);
        assert_eq!(FetchError::Interrupted("aborted".into()).url(), None);
    }

    #[test]
    fn test_enrichment_failure_message_names_repository() {
        let failure = EnrichmentFailure::Languages {
            repository: "widget-lib".into(),
            source: FetchError::Transport {
                url: "https://api.example/repos/me/widget-lib/languages".into(),
                reason: "HTTP 404 Not Found".into(),
            },
        };

        assert_eq!(failure.repository(), "widget-lib");
        assert!(failure.to_string().contains("widget-lib"));
        assert!(failure.to_string().contains("HTTP 404"));
    }
}
