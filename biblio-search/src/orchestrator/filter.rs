//! Criteria-based post-filtering of item lists.
//!
//! Narrows a list by item type, publication year range and tag
//! inclusion/exclusion. Every supplied constraint must hold (logical AND).
//! Input order is preserved; this is a filter, not a ranking.

use crate::error::SearchError;
use crate::item::Item;
use crate::types::is_known_item_type;

/// Filter constraints. Unset or empty fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Keep only these Zotero item types.
    pub item_types: Vec<String>,
    /// Inclusive `(start_year, end_year)`. Items without a parseable year
    /// fail this constraint.
    pub date_range: Option<(i32, i32)>,
    /// Items must carry every one of these tags.
    pub required_tags: Vec<String>,
    /// Items carrying any of these tags are dropped.
    pub excluded_tags: Vec<String>,
}

impl FilterCriteria {
    /// Create empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item type constraint.
    pub fn with_item_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.item_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Set the inclusive year range.
    pub fn with_date_range(mut self, start_year: i32, end_year: i32) -> Self {
        self.date_range = Some((start_year, end_year));
        self
    }

    /// Set the tags every item must carry.
    pub fn with_required_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.required_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tags no item may carry.
    pub fn with_excluded_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.excluded_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check if any constraint is set.
    pub fn is_empty(&self) -> bool {
        self.item_types.is_empty()
            && self.date_range.is_none()
            && self.required_tags.is_empty()
            && self.excluded_tags.is_empty()
    }

    /// Validates the criteria.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidCriteria`] if the date range is inverted
    /// or an item type is not a known Zotero item type.
    pub fn validate(&self) -> Result<(), SearchError> {
        if let Some((start, end)) = self.date_range {
            if start > end {
                return Err(SearchError::InvalidCriteria(format!(
                    "date range start {start} is after end {end}"
                )));
            }
        }
        if let Some(unknown) = self.item_types.iter().find(|t| !is_known_item_type(t)) {
            return Err(SearchError::InvalidCriteria(format!(
                "unknown item type `{unknown}`"
            )));
        }
        Ok(())
    }

    /// Check if an item passes every constraint.
    pub fn matches(&self, item: &Item) -> bool {
        if !self.item_types.is_empty() && !self.item_types.iter().any(|t| *t == item.item_type) {
            return false;
        }

        if let Some((start, end)) = self.date_range {
            match item.year() {
                Some(year) if (start..=end).contains(&year) => {}
                _ => return false,
            }
        }

        if !self.required_tags.iter().all(|tag| item.has_tag(tag)) {
            return false;
        }

        !self.excluded_tags.iter().any(|tag| item.has_tag(tag))
    }
}

/// Keep the items that satisfy `criteria`, in their original order.
///
/// # Errors
///
/// Returns [`SearchError::InvalidCriteria`] without filtering anything when
/// the criteria themselves are invalid.
pub fn filter_by_criteria(items: Vec<Item>, criteria: &FilterCriteria) -> Result<Vec<Item>, SearchError> {
    criteria.validate()?;
    if criteria.is_empty() {
        return Ok(items);
    }
    let before = items.len();
    let kept: Vec<Item> = items.into_iter().filter(|item| criteria.matches(item)).collect();
    tracing::debug!(before, after = kept.len(), "applied filter criteria");
    Ok(kept)
}
