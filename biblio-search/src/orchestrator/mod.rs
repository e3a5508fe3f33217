//! Search orchestrator: concurrent strategies, merge, rank, filter.
//!
//! This module fans a query out to several search strategies concurrently,
//! merges their items by key, scores the merged set against the query,
//! and returns a sorted, truncated result list. The criteria filter and the
//! ranker are exposed on their own for caller-driven pipelines.

pub mod filter;
pub mod merge;
pub mod rank;
pub mod search;
