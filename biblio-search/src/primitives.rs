//! Typed search primitives over a [`Backend`].
//!
//! Each primitive forwards to the backend, bounds the call with a timeout,
//! and normalises the returned records into [`Item`]s. Malformed records are
//! skipped one by one. Backend failures propagate unchanged, except that a
//! missing semantic capability degrades to an empty result.

use std::time::Duration;

use crate::backend::Backend;
use crate::error::SearchError;
use crate::item::{normalize_batch, Item};
use crate::types::{KeywordQuery, SemanticMode, TagQuery};

/// Default bound on a single primitive call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Item-level search primitives backed by a [`Backend`].
#[derive(Debug, Clone)]
pub struct Primitives<B> {
    backend: B,
    call_timeout: Duration,
}

impl<B: Backend> Primitives<B> {
    /// Wrap `backend` with the default call timeout.
    pub fn new(backend: B) -> Self {
        Self::with_timeout(backend, DEFAULT_CALL_TIMEOUT)
    }

    /// Wrap `backend`, bounding every primitive call by `call_timeout`.
    pub fn with_timeout(backend: B, call_timeout: Duration) -> Self {
        Self {
            backend,
            call_timeout,
        }
    }

    /// The wrapped backend handle.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Keyword search over the library.
    ///
    /// # Errors
    ///
    /// Propagates backend errors and [`SearchError::Timeout`].
    pub async fn keyword(&self, query: &KeywordQuery, limit: usize) -> Result<Vec<Item>, SearchError> {
        tracing::trace!(query = %query.text, mode = ?query.mode, limit, "keyword search");
        let records = self
            .bounded("keyword", self.backend.keyword_search(query, limit))
            .await?;
        Ok(normalize_batch(records, "keyword"))
    }

    /// Semantic search. Returns `[]` when the backend has no semantic
    /// capability.
    ///
    /// # Errors
    ///
    /// Propagates every backend error other than
    /// [`SearchError::SemanticUnavailable`].
    pub async fn semantic(
        &self,
        query: &str,
        mode: SemanticMode,
        limit: usize,
    ) -> Result<Vec<Item>, SearchError> {
        tracing::trace!(query, ?mode, limit, "semantic search");
        match self
            .bounded("semantic", self.backend.semantic_search(query, mode, limit))
            .await
        {
            Ok(records) => Ok(normalize_batch(records, "semantic")),
            Err(SearchError::SemanticUnavailable(reason)) => {
                tracing::debug!(%reason, "semantic search unavailable, contributing nothing");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Items matching a tag combination.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidCriteria`] for an empty or blank tag
    /// list, otherwise propagates backend errors.
    pub async fn by_tags(&self, query: &TagQuery, limit: usize) -> Result<Vec<Item>, SearchError> {
        if query.tags.is_empty() || query.tags.iter().any(|t| t.trim().is_empty()) {
            return Err(SearchError::InvalidCriteria(
                "tag search needs at least one non-empty tag".into(),
            ));
        }
        tracing::trace!(tags = ?query.tags, combinator = ?query.combinator, limit, "tag search");
        let records = self
            .bounded("tag", self.backend.tag_search(query, limit))
            .await?;
        Ok(normalize_batch(records, "tag"))
    }

    /// The most recently added items, newest first.
    ///
    /// # Errors
    ///
    /// Propagates backend errors and [`SearchError::Timeout`].
    pub async fn recent(&self, limit: usize) -> Result<Vec<Item>, SearchError> {
        let records = self.bounded("recent", self.backend.recent(limit)).await?;
        Ok(normalize_batch(records, "recent"))
    }

    /// The library's tag vocabulary.
    ///
    /// # Errors
    ///
    /// Propagates backend errors and [`SearchError::Timeout`].
    pub async fn tags(&self) -> Result<Vec<String>, SearchError> {
        self.bounded("tag vocabulary", self.backend.tag_vocabulary())
            .await
    }

    async fn bounded<T>(
        &self,
        what: &str,
        call: impl std::future::Future<Output = Result<T, SearchError>>,
    ) -> Result<T, SearchError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SearchError::Timeout(format!(
                "{what} call exceeded {}ms",
                self.call_timeout.as_millis()
            ))),
        }
    }
}
