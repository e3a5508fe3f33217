//! Core search orchestrator: concurrent multi-strategy fan-out, merge, rank, truncate.
//!
//! Runs every enabled strategy concurrently, merges their items by key,
//! ranks the merged set against the query and truncates to the requested
//! result budget.

use std::time::Duration;

use crate::backend::Backend;
use crate::config::{ScoringWeights, SearchConfig};
use crate::error::SearchError;
use crate::item::Item;
use crate::primitives::Primitives;
use crate::types::{KeywordQuery, Strategy, TagQuery};

use super::filter::{filter_by_criteria, FilterCriteria};
use super::merge::merge;
use super::rank::{rank, tokenize};

/// One strategy that contributed nothing because it failed.
#[derive(Debug)]
pub struct StrategyFailure {
    pub strategy: Strategy,
    pub error: SearchError,
}

/// The outcome of a comprehensive search, with per-strategy diagnostics.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Ranked, truncated items.
    pub items: Vec<Item>,
    /// Strategies that ran.
    pub attempted: Vec<Strategy>,
    /// Strategies that failed and contributed nothing.
    pub failures: Vec<StrategyFailure>,
}

impl SearchReport {
    /// Whether at least one strategy ran and every strategy that ran failed.
    ///
    /// Distinguishes "nothing matched" from "nothing could be searched".
    pub fn all_failed(&self) -> bool {
        !self.attempted.is_empty() && self.failures.len() == self.attempted.len()
    }
}

/// Multi-strategy search over one backend handle.
///
/// Holds no state between calls beyond the backend itself; every merge set
/// and ranked list is built fresh per call.
#[derive(Debug, Clone)]
pub struct SearchOrchestrator<B> {
    primitives: Primitives<B>,
}

impl<B: Backend> SearchOrchestrator<B> {
    /// Orchestrate searches against `backend` with default call timeouts.
    pub fn new(backend: B) -> Self {
        Self::with_primitives(Primitives::new(backend))
    }

    /// Orchestrate searches through pre-configured primitives.
    pub fn with_primitives(primitives: Primitives<B>) -> Self {
        Self { primitives }
    }

    /// The primitives, for caller-driven pipelines.
    pub fn primitives(&self) -> &Primitives<B> {
        &self.primitives
    }

    /// Search with every enabled strategy and return the ranked top items.
    ///
    /// Strategy failures never escape: they are logged and the strategy
    /// contributes nothing. When every strategy fails the result is empty.
    /// Use [`Self::comprehensive_search_report`] to tell the cases apart.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] only if `config` is invalid.
    pub async fn comprehensive_search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<Item>, SearchError> {
        Ok(self.comprehensive_search_report(query, config).await?.items)
    }

    /// Like [`Self::comprehensive_search`], also reporting which strategies
    /// failed.
    ///
    /// # Pipeline
    ///
    /// 1. Run each enabled strategy concurrently with
    ///    [`futures::future::join_all`], each bounded by
    ///    `config.strategy_timeout_seconds`
    /// 2. Log per-strategy failures at warn level; keep successful lists
    /// 3. Merge by item key, first strategy in fixed order winning
    /// 4. Rank against `query`
    /// 5. Truncate to `config.max_results`
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] only if `config` is invalid.
    pub async fn comprehensive_search_report(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<SearchReport, SearchError> {
        config.validate()?;

        if config.max_results == 0 {
            tracing::debug!("max_results is 0, skipping search");
            return Ok(SearchReport::default());
        }

        let strategies = config.strategies.enabled();
        let bound = Duration::from_secs(config.strategy_timeout_seconds);

        // 1. Fan out to all strategies concurrently.
        let futures: Vec<_> = strategies
            .iter()
            .map(|&strategy| async move {
                let outcome = match tokio::time::timeout(bound, self.run_strategy(strategy, query, config)).await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(SearchError::Timeout(format!(
                        "{strategy} strategy exceeded {}s",
                        bound.as_secs()
                    ))),
                };
                (strategy, outcome)
            })
            .collect();

        let outcomes = futures::future::join_all(futures).await;

        // 2. Collect lists, recording failures.
        let mut lists: Vec<Vec<Item>> = Vec::with_capacity(outcomes.len());
        let mut failures: Vec<StrategyFailure> = Vec::new();

        for (strategy, outcome) in outcomes {
            match outcome {
                Ok(items) => {
                    tracing::debug!(%strategy, count = items.len(), "strategy returned items");
                    lists.push(items);
                }
                Err(error) => {
                    tracing::warn!(%strategy, %error, "strategy failed, contributing nothing");
                    failures.push(StrategyFailure { strategy, error });
                }
            }
        }

        if !strategies.is_empty() && failures.len() == strategies.len() {
            tracing::warn!(
                strategies = strategies.len(),
                "all search strategies failed, returning no results"
            );
        }

        // 3. Merge by key. Sorting by key gives ranking ties a fixed order.
        let mut merged: Vec<Item> = merge(lists).into_iter().collect();
        merged.sort_by(|a, b| a.key.cmp(&b.key));

        // 4. Rank and 5. truncate.
        let mut items = rank(merged, query, &config.weights);
        items.truncate(config.max_results);

        Ok(SearchReport {
            items,
            attempted: strategies,
            failures,
        })
    }

    /// Narrow `items` by criteria, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidCriteria`] for invalid criteria.
    pub fn filter_by_criteria(
        &self,
        items: Vec<Item>,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Item>, SearchError> {
        filter_by_criteria(items, criteria)
    }

    /// Rank `items` against `query`.
    pub fn rank(&self, items: Vec<Item>, query: &str, weights: &ScoringWeights) -> Vec<Item> {
        rank(items, query, weights)
    }

    /// Run one strategy to completion, returning its items.
    ///
    /// Strategies with several calls (one per mode) succeed if any call
    /// succeeds; the first error is returned only when all of them fail.
    async fn run_strategy(
        &self,
        strategy: Strategy,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<Item>, SearchError> {
        let limit = config.per_strategy_limit;
        let tokens = tokenize(query);

        match strategy {
            Strategy::Semantic => {
                if tokens.is_empty() {
                    return Ok(Vec::new());
                }
                let calls = config
                    .semantic_modes
                    .iter()
                    .map(|&mode| self.primitives.semantic(query, mode, limit));
                collect_calls(strategy, futures::future::join_all(calls).await)
            }
            Strategy::Keyword => {
                if tokens.is_empty() {
                    return Ok(Vec::new());
                }
                let queries: Vec<KeywordQuery> = config
                    .keyword_modes
                    .iter()
                    .map(|&mode| KeywordQuery::new(query, mode))
                    .collect();
                let calls = queries.iter().map(|q| self.primitives.keyword(q, limit));
                collect_calls(strategy, futures::future::join_all(calls).await)
            }
            Strategy::Tag => {
                if tokens.is_empty() {
                    return Ok(Vec::new());
                }
                let vocabulary = self.primitives.tags().await?;
                let matching = matching_tags(&vocabulary, &tokens, config.max_matching_tags);
                if matching.is_empty() {
                    tracing::debug!("no library tags match the query");
                    return Ok(Vec::new());
                }
                let tag_query = TagQuery::new(matching, config.tag_combinator);
                self.primitives.by_tags(&tag_query, limit).await
            }
            Strategy::Recent => self.primitives.recent(limit).await,
        }
    }
}

/// Fold the outcomes of one strategy's calls into a single list.
fn collect_calls(
    strategy: Strategy,
    outcomes: Vec<Result<Vec<Item>, SearchError>>,
) -> Result<Vec<Item>, SearchError> {
    let mut items = Vec::new();
    let mut first_error = None;
    let mut succeeded = false;
    for outcome in outcomes {
        match outcome {
            Ok(batch) => {
                succeeded = true;
                items.extend(batch);
            }
            Err(err) => {
                tracing::debug!(%strategy, error = %err, "strategy call failed");
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) if !succeeded => Err(err),
        _ => Ok(items),
    }
}

/// Vocabulary tags whose lowercase form contains any query token.
///
/// Distinct (case-insensitively), in vocabulary order, at most `max`.
pub fn matching_tags(vocabulary: &[String], tokens: &[String], max: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    for tag in vocabulary {
        if out.len() >= max {
            break;
        }
        let lower = tag.trim().to_lowercase();
        if lower.is_empty() || seen.contains(&lower) {
            continue;
        }
        if tokens.iter().any(|t| lower.contains(t.as_str())) {
            seen.push(lower);
            out.push(tag.trim().to_owned());
        }
    }
    out
}
