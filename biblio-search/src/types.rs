//! Core types for search strategies and backend query parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The independent search methods the orchestrator can combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Embedding-backed search; contributes nothing when the backend lacks it.
    Semantic,
    /// Full-text keyword search over titles, creators, and optionally all fields.
    Keyword,
    /// Search by library tags whose names match the query tokens.
    Tag,
    /// The most recently added items, newest first.
    Recent,
}

impl Strategy {
    /// Returns the human-readable name of this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Keyword => "keyword",
            Self::Tag => "tag",
            Self::Recent => "recent",
        }
    }

    /// Returns all strategy variants.
    pub fn all() -> &'static [Strategy] {
        &[Self::Semantic, Self::Keyword, Self::Tag, Self::Recent]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which fields a keyword search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    /// Title, creators and year only.
    TitleCreatorYear,
    /// All fields, including full text where the backend indexes it.
    Everything,
}

impl QueryMode {
    /// The value the Zotero Web API expects for `qmode`.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::TitleCreatorYear => "titleCreatorYear",
            Self::Everything => "everything",
        }
    }
}

/// Flavour of semantic retrieval requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticMode {
    /// Vector similarity blended with keyword relevance.
    Hybrid,
    /// Pure vector similarity, for conceptual matches.
    Vector,
}

/// How the tags of a [`TagQuery`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCombinator {
    /// Items must carry every tag.
    All,
    /// Items must carry at least one tag.
    Any,
    /// Items must carry none of the tags.
    Not,
}

/// Parameters for a keyword search primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordQuery {
    pub text: String,
    pub mode: QueryMode,
    /// Backend item-type filter, e.g. `journalArticle` or `-attachment`.
    /// `None` leaves the backend default in place.
    pub item_type: Option<String>,
    /// Restrict to items carrying this tag.
    pub tag: Option<String>,
}

impl KeywordQuery {
    /// A keyword query with no item-type or tag restriction.
    pub fn new(text: impl Into<String>, mode: QueryMode) -> Self {
        Self {
            text: text.into(),
            mode,
            item_type: None,
            tag: None,
        }
    }
}

/// Parameters for a tag search primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    pub tags: Vec<String>,
    pub combinator: TagCombinator,
    pub item_type: Option<String>,
}

impl TagQuery {
    /// A tag query with no item-type restriction.
    pub fn new(tags: Vec<String>, combinator: TagCombinator) -> Self {
        Self {
            tags,
            combinator,
            item_type: None,
        }
    }
}

/// Zotero item types accepted by the criteria filter.
pub const ITEM_TYPES: &[&str] = &[
    "annotation",
    "artwork",
    "attachment",
    "audioRecording",
    "bill",
    "blogPost",
    "book",
    "bookSection",
    "case",
    "computerProgram",
    "conferencePaper",
    "dataset",
    "dictionaryEntry",
    "document",
    "email",
    "encyclopediaArticle",
    "film",
    "forumPost",
    "hearing",
    "instantMessage",
    "interview",
    "journalArticle",
    "letter",
    "magazineArticle",
    "manuscript",
    "map",
    "newspaperArticle",
    "note",
    "patent",
    "podcast",
    "preprint",
    "presentation",
    "radioBroadcast",
    "report",
    "standard",
    "statute",
    "thesis",
    "tvBroadcast",
    "videoRecording",
    "webpage",
];

/// Whether `item_type` is a known Zotero item type.
pub fn is_known_item_type(item_type: &str) -> bool {
    ITEM_TYPES.contains(&item_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_display() {
        assert_eq!(Strategy::Semantic.to_string(), "semantic");
        assert_eq!(Strategy::Keyword.to_string(), "keyword");
        assert_eq!(Strategy::Tag.to_string(), "tag");
        assert_eq!(Strategy::Recent.to_string(), "recent");
    }

    #[test]
    fn strategy_all() {
        let all = Strategy::all();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&Strategy::Tag));
    }

    #[test]
    fn strategy_serde_uses_snake_case() {
        let json = serde_json::to_string(&Strategy::Semantic).expect("serialize");
        assert_eq!(json, "\"semantic\"");
        let mode: QueryMode = serde_json::from_str("\"title_creator_year\"").expect("deserialize");
        assert_eq!(mode, QueryMode::TitleCreatorYear);
    }

    #[test]
    fn query_mode_api_strings() {
        assert_eq!(QueryMode::TitleCreatorYear.as_api_str(), "titleCreatorYear");
        assert_eq!(QueryMode::Everything.as_api_str(), "everything");
    }

    #[test]
    fn keyword_query_defaults() {
        let q = KeywordQuery::new("embodied", QueryMode::Everything);
        assert_eq!(q.text, "embodied");
        assert!(q.item_type.is_none());
        assert!(q.tag.is_none());
    }

    #[test]
    fn known_item_types() {
        assert!(is_known_item_type("journalArticle"));
        assert!(is_known_item_type("book"));
        assert!(!is_known_item_type("journal_article"));
        assert!(!is_known_item_type(""));
    }
}
