//! Error types for the biblio-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or sensitive data appear in
//! error messages.

/// Errors that can occur while searching, normalising, or filtering items.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A search primitive could not reach the bibliographic store at all.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A single raw record could not be normalised into an item.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The caller supplied filter criteria that cannot be satisfied as given.
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    /// The backend has no semantic search capability.
    #[error("semantic search unavailable: {0}")]
    SemanticUnavailable(String),

    /// A primitive call or strategy exceeded its time bound.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// The backend answered with an unexpected HTTP status or body.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Invalid search or backend configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for biblio-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_backend_unavailable() {
        let err = SearchError::BackendUnavailable("connection refused".into());
        assert_eq!(err.to_string(), "backend unavailable: connection refused");
    }

    #[test]
    fn display_malformed_record() {
        let err = SearchError::MalformedRecord("record has no key".into());
        assert_eq!(err.to_string(), "malformed record: record has no key");
    }

    #[test]
    fn display_invalid_criteria() {
        let err = SearchError::InvalidCriteria("date range start 2025 is after end 2020".into());
        assert_eq!(
            err.to_string(),
            "invalid criteria: date range start 2025 is after end 2020"
        );
    }

    #[test]
    fn display_semantic_unavailable() {
        let err = SearchError::SemanticUnavailable("no embedding index".into());
        assert_eq!(
            err.to_string(),
            "semantic search unavailable: no embedding index"
        );
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("keyword exceeded 30s".into());
        assert_eq!(err.to_string(), "search timed out: keyword exceeded 30s");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("per_strategy_limit must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: per_strategy_limit must be greater than 0"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
