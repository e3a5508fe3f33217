//! Query relevance scoring and ranking.
//!
//! Each item is scored against the whitespace-split, lowercased query tokens:
//!
//! ```text
//! score = title_weight    * (tokens found in the title)
//!       + abstract_weight * (tokens found in the abstract)
//!       + tag_weight      * (tokens found in any tag)
//!       + recency_bonus
//! ```
//!
//! Matching is substring-based and additive, so multi-token queries give
//! partial credit rather than boolean AND/OR behaviour. The recency bonus
//! scales linearly from `recency_min` at a floor year to `recency_max` at a
//! ceiling year, clamped outside that window; undated items get no bonus.

use std::cmp::Ordering;

use crate::config::ScoringWeights;
use crate::item::Item;

/// Lowercased, distinct whitespace tokens of `query`, in first-seen order.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for token in query.split_whitespace() {
        let token = token.to_lowercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    tokens
}

/// Text-match score of one item against pre-tokenised query terms.
///
/// Excludes the recency bonus; see [`score_item`].
pub fn text_score(item: &Item, tokens: &[String], weights: &ScoringWeights) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let title = item.title.to_lowercase();
    let abstract_text = item.abstract_text.to_lowercase();
    let tags: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();

    let mut title_hits = 0.0;
    let mut abstract_hits = 0.0;
    let mut tag_hits = 0.0;
    for token in tokens {
        let token = token.as_str();
        if title.contains(token) {
            title_hits += 1.0;
        }
        if abstract_text.contains(token) {
            abstract_hits += 1.0;
        }
        if tags.iter().any(|tag| tag.contains(token)) {
            tag_hits += 1.0;
        }
    }

    title_hits * weights.title + abstract_hits * weights.abstract_text + tag_hits * weights.tag
}

/// Bonus for an item published in `year`.
///
/// Linear from `recency_min` at `recency_floor_year` to `recency_max` at
/// `recency_ceiling_year`, clamped outside that window. Depends only on the
/// item, never on the rest of the ranked set.
pub fn recency_bonus(year: i32, weights: &ScoringWeights) -> f64 {
    let floor = weights.recency_floor_year;
    let ceiling = weights.recency_ceiling_year;
    if ceiling <= floor {
        return if year >= ceiling {
            weights.recency_max
        } else {
            weights.recency_min
        };
    }
    let clamped = year.clamp(floor, ceiling);
    let fraction = f64::from(clamped - floor) / f64::from(ceiling - floor);
    weights.recency_min + fraction * (weights.recency_max - weights.recency_min)
}

/// Full relevance score of one item: text matches plus recency bonus.
/// Undated items get no recency bonus.
pub fn score_item(item: &Item, tokens: &[String], weights: &ScoringWeights) -> f64 {
    let recency = item.year().map_or(0.0, |year| recency_bonus(year, weights));
    text_score(item, tokens, weights) + recency
}

/// Score every item against `query`; scores are returned in input order.
pub fn score_items(items: &[Item], query: &str, weights: &ScoringWeights) -> Vec<f64> {
    let tokens = tokenize(query);
    items
        .iter()
        .map(|item| score_item(item, &tokens, weights))
        .collect()
}

/// Order `items` by descending relevance to `query`.
///
/// Equal scores fall back to the newer year first, undated last. The sort
/// is stable, so items equal on both keep their input order. The relative
/// order of two items never depends on which other items are ranked.
pub fn rank(items: Vec<Item>, query: &str, weights: &ScoringWeights) -> Vec<Item> {
    let scores = score_items(&items, query, weights);
    let mut scored: Vec<(f64, Item)> = scores.into_iter().zip(items).collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.1.year().cmp(&a.1.year()))
    });
    scored.into_iter().map(|(_, item)| item).collect()
}
