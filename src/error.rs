//! Error types for the biblio host.

use biblio_search::SearchError;

/// Top-level error type for the host package.
#[derive(Debug, thiserror::Error)]
pub enum BiblioError {
    /// Search core error.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration file could not be parsed or serialised.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BiblioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_errors_display_transparently() {
        let err = BiblioError::from(SearchError::InvalidCriteria("bad range".into()));
        assert_eq!(err.to_string(), SearchError::InvalidCriteria("bad range".into()).to_string());
    }

    #[test]
    fn io_errors_convert() {
        let err = BiblioError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
