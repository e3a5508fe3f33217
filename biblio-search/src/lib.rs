//! # biblio-search
//!
//! Multi-strategy search over a bibliographic library that returns one
//! deduplicated, relevance-ranked list bounded to a caller-chosen size.
//!
//! A consuming agent asks one question and receives at most `max_results`
//! items instead of several unbounded raw result sets.
//!
//! ## Design
//!
//! - Backends expose raw primitives (keyword, semantic, tag, recent, tag
//!   vocabulary) through the [`Backend`] trait; [`ZoteroWebBackend`] talks
//!   to the Zotero Web API
//! - Raw records are normalised once into [`Item`]; malformed records are
//!   skipped individually
//! - Strategies run concurrently; one failing or slow strategy contributes
//!   nothing instead of failing the search
//! - Items merge by key (first copy wins), are ranked by weighted token
//!   matches plus a recency bonus, then truncated
//! - A criteria filter narrows any item list by type, year and tags
//!
//! ## Logging
//!
//! Queries are logged only at trace level. Strategy failures and skipped
//! records are logged at warn level.

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod item;
pub mod orchestrator;
pub mod primitives;
pub mod types;
pub mod zotero;

pub use backend::Backend;
pub use config::{LibraryType, ScoringWeights, SearchConfig, StrategyToggles, ZoteroConfig};
pub use error::{Result, SearchError};
pub use format::{format_results, FormatOptions};
pub use item::Item;
pub use orchestrator::filter::FilterCriteria;
pub use orchestrator::search::{SearchOrchestrator, SearchReport, StrategyFailure};
pub use primitives::Primitives;
pub use types::{KeywordQuery, QueryMode, SemanticMode, Strategy, TagCombinator, TagQuery};
pub use zotero::ZoteroWebBackend;

/// Search `backend` with every strategy enabled in `config`.
///
/// Convenience wrapper around [`SearchOrchestrator::comprehensive_search`]
/// for one-off calls.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid. Strategy failures
/// are logged, never returned.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> biblio_search::Result<()> {
/// let backend = biblio_search::ZoteroWebBackend::new(biblio_search::ZoteroConfig {
///     library_id: "123456".into(),
///     ..Default::default()
/// })?;
/// let config = biblio_search::SearchConfig::default();
/// let items = biblio_search::comprehensive_search(&backend, "embodied cognition", &config).await?;
/// for item in &items {
///     println!("{}: {}", item.key, item.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn comprehensive_search<B: Backend>(
    backend: B,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<Item>> {
    SearchOrchestrator::new(backend)
        .comprehensive_search(query, config)
        .await
}

/// Keep the items satisfying `criteria`, preserving order.
///
/// # Errors
///
/// Returns [`SearchError::InvalidCriteria`] for an inverted date range or an
/// unknown item type.
pub fn filter_by_criteria(items: Vec<Item>, criteria: &FilterCriteria) -> Result<Vec<Item>> {
    orchestrator::filter::filter_by_criteria(items, criteria)
}

/// Order `items` by descending relevance to `query` using `weights`.
pub fn rank(items: Vec<Item>, query: &str, weights: &ScoringWeights) -> Vec<Item> {
    orchestrator::rank::rank(items, query, weights)
}
