//! Trait definition for pluggable bibliographic store backends.
//!
//! A backend exposes the raw search primitives of a bibliographic store:
//! keyword, semantic and tag search, recent items, and the tag vocabulary.
//! It returns loosely typed JSON records; normalisation into
//! [`crate::Item`] happens in [`crate::primitives`].

use std::future::Future;

use serde_json::Value;

use crate::error::SearchError;
use crate::types::{KeywordQuery, SemanticMode, TagQuery};

/// A bibliographic store reachable through a handful of search primitives.
///
/// Contract every implementation honours:
///
/// - `limit` values of at least 100 are served in full when the store has
///   that many matches; implementations page internally where needed.
/// - Zero matches is `Ok(vec![])`, never an error.
/// - A store that cannot be reached returns
///   [`SearchError::BackendUnavailable`].
///
/// All implementations must be `Send + Sync` so strategies can run
/// concurrently against one shared handle.
pub trait Backend: Send + Sync {
    /// Full-text keyword search.
    fn keyword_search(
        &self,
        query: &KeywordQuery,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send;

    /// Semantic (embedding) search. Records are self-contained.
    ///
    /// The default implementation reports the capability as missing with
    /// [`SearchError::SemanticUnavailable`].
    fn semantic_search(
        &self,
        _query: &str,
        _mode: SemanticMode,
        _limit: usize,
    ) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send {
        async {
            Err(SearchError::SemanticUnavailable(
                "backend has no semantic index".into(),
            ))
        }
    }

    /// Items matching a combination of tags.
    fn tag_search(
        &self,
        query: &TagQuery,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send;

    /// Most recently added items, newest first.
    fn recent(&self, limit: usize) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send;

    /// Every tag name known to the library.
    fn tag_vocabulary(&self) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send;
}

macro_rules! forward_backend {
    ($($ty:ty),+) => {$(
        impl<T: Backend> Backend for $ty {
            fn keyword_search(
                &self,
                query: &KeywordQuery,
                limit: usize,
            ) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send {
                (**self).keyword_search(query, limit)
            }

            fn semantic_search(
                &self,
                query: &str,
                mode: SemanticMode,
                limit: usize,
            ) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send {
                (**self).semantic_search(query, mode, limit)
            }

            fn tag_search(
                &self,
                query: &TagQuery,
                limit: usize,
            ) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send {
                (**self).tag_search(query, limit)
            }

            fn recent(&self, limit: usize) -> impl Future<Output = Result<Vec<Value>, SearchError>> + Send {
                (**self).recent(limit)
            }

            fn tag_vocabulary(&self) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send {
                (**self).tag_vocabulary()
            }
        }
    )+};
}

forward_backend!(&T, std::sync::Arc<T>);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QueryMode, TagCombinator};
    use serde_json::json;

    /// A backend with only the required primitives.
    struct KeywordOnly;

    impl Backend for KeywordOnly {
        async fn keyword_search(
            &self,
            query: &KeywordQuery,
            _limit: usize,
        ) -> Result<Vec<Value>, SearchError> {
            Ok(vec![json!({"key": "K1", "title": query.text})])
        }

        async fn tag_search(
            &self,
            _query: &TagQuery,
            _limit: usize,
        ) -> Result<Vec<Value>, SearchError> {
            Ok(vec![])
        }

        async fn recent(&self, _limit: usize) -> Result<Vec<Value>, SearchError> {
            Err(SearchError::BackendUnavailable("offline".into()))
        }

        async fn tag_vocabulary(&self) -> Result<Vec<String>, SearchError> {
            Ok(vec!["cognition".into()])
        }
    }

    #[test]
    fn backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KeywordOnly>();
    }

    #[tokio::test]
    async fn default_semantic_search_is_unavailable() {
        let result = KeywordOnly
            .semantic_search("anything", SemanticMode::Hybrid, 10)
            .await;
        assert!(matches!(result, Err(SearchError::SemanticUnavailable(_))));
    }

    #[tokio::test]
    async fn required_primitives_dispatch() {
        let backend = KeywordOnly;
        let records = backend
            .keyword_search(&KeywordQuery::new("memory", QueryMode::Everything), 5)
            .await
            .expect("keyword search");
        assert_eq!(records[0]["title"], "memory");

        let tagged = backend
            .tag_search(&TagQuery::new(vec!["x".into()], TagCombinator::Any), 5)
            .await
            .expect("tag search");
        assert!(tagged.is_empty());

        assert!(backend.recent(5).await.is_err());
        assert_eq!(backend.tag_vocabulary().await.expect("tags"), vec!["cognition"]);
    }
}
