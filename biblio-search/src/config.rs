//! Search and backend configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which strategies run, how many items each may
//! fetch, the result budget, the per-strategy time bound and the ranking
//! weights. [`ZoteroConfig`] describes how to reach the Zotero Web API. Both
//! are plain values handed in by the caller; nothing here reads process state.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::{QueryMode, SemanticMode, Strategy, TagCombinator};

/// Which strategies a comprehensive search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyToggles {
    pub semantic: bool,
    pub keyword: bool,
    pub tags: bool,
    /// Merge the newest items into the candidate set. Off by default.
    pub recent: bool,
}

impl Default for StrategyToggles {
    fn default() -> Self {
        Self {
            semantic: true,
            keyword: true,
            tags: true,
            recent: false,
        }
    }
}

impl StrategyToggles {
    /// The enabled strategies, in a fixed order.
    pub fn enabled(&self) -> Vec<Strategy> {
        let mut out = Vec::with_capacity(4);
        if self.semantic {
            out.push(Strategy::Semantic);
        }
        if self.keyword {
            out.push(Strategy::Keyword);
        }
        if self.tags {
            out.push(Strategy::Tag);
        }
        if self.recent {
            out.push(Strategy::Recent);
        }
        out
    }
}

/// Relevance scoring weights.
///
/// Text weights are applied per matching query token. The recency bonus is
/// scaled linearly from `recency_min` at `recency_floor_year` to
/// `recency_max` at `recency_ceiling_year`; years outside the window clamp
/// to its ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub title: f64,
    pub abstract_text: f64,
    pub tag: f64,
    pub recency_min: f64,
    pub recency_max: f64,
    pub recency_floor_year: i32,
    pub recency_ceiling_year: i32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 10.0,
            abstract_text: 2.0,
            tag: 5.0,
            recency_min: 1.0,
            recency_max: 3.0,
            recency_floor_year: 2015,
            recency_ceiling_year: 2020,
        }
    }
}

impl ScoringWeights {
    /// Validates the weights.
    ///
    /// All weights must be finite and non-negative, and
    /// `recency_min <= recency_max`, and the year window must not be
    /// inverted.
    pub fn validate(&self) -> Result<(), SearchError> {
        let all = [
            ("title", self.title),
            ("abstract_text", self.abstract_text),
            ("tag", self.tag),
            ("recency_min", self.recency_min),
            ("recency_max", self.recency_max),
        ];
        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(SearchError::Config(format!(
                    "weight {name} must be a non-negative number"
                )));
            }
        }
        if self.recency_min > self.recency_max {
            return Err(SearchError::Config(
                "recency_min must be <= recency_max".into(),
            ));
        }
        if self.recency_floor_year > self.recency_ceiling_year {
            return Err(SearchError::Config(
                "recency_floor_year must be <= recency_ceiling_year".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for a comprehensive search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategies: StrategyToggles,
    /// Maximum number of items returned after merging and ranking. Zero is
    /// allowed and yields an empty result.
    pub max_results: usize,
    /// Items requested from each primitive call.
    pub per_strategy_limit: usize,
    /// Upper bound on how long any one strategy may take, in seconds.
    pub strategy_timeout_seconds: u64,
    /// How many vocabulary tags the tag strategy may search for.
    pub max_matching_tags: usize,
    /// How the tag strategy combines the matched tags.
    pub tag_combinator: TagCombinator,
    /// One keyword call is issued per mode.
    pub keyword_modes: Vec<QueryMode>,
    /// One semantic call is issued per mode.
    pub semantic_modes: Vec<SemanticMode>,
    pub weights: ScoringWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategies: StrategyToggles::default(),
            max_results: 20,
            per_strategy_limit: 50,
            strategy_timeout_seconds: 30,
            max_matching_tags: 5,
            tag_combinator: TagCombinator::All,
            keyword_modes: vec![QueryMode::Everything, QueryMode::TitleCreatorYear],
            semantic_modes: vec![SemanticMode::Hybrid, SemanticMode::Vector],
            weights: ScoringWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `per_strategy_limit` must be greater than 0
    /// - `strategy_timeout_seconds` must be greater than 0
    /// - `keyword_modes` must not be empty when keyword search is enabled
    /// - `semantic_modes` must not be empty when semantic search is enabled
    /// - the scoring weights must be valid
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.per_strategy_limit == 0 {
            return Err(SearchError::Config(
                "per_strategy_limit must be greater than 0".into(),
            ));
        }
        if self.strategy_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "strategy_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.strategies.keyword && self.keyword_modes.is_empty() {
            return Err(SearchError::Config(
                "keyword search is enabled but keyword_modes is empty".into(),
            ));
        }
        if self.strategies.semantic && self.semantic_modes.is_empty() {
            return Err(SearchError::Config(
                "semantic search is enabled but semantic_modes is empty".into(),
            ));
        }
        self.weights.validate()
    }
}

/// Whether a Zotero library belongs to a user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryType {
    User,
    Group,
}

impl LibraryType {
    /// Path prefix segment used by the Zotero Web API.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

/// How to reach a Zotero library over the Web API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoteroConfig {
    pub library_type: LibraryType,
    pub library_id: String,
    /// Sent as `Zotero-API-Key`. Public libraries need none.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Per-HTTP-request timeout in seconds.
    pub request_timeout_seconds: u64,
    /// Item-type filter applied when a query does not name one.
    pub default_item_type: Option<String>,
}

impl Default for ZoteroConfig {
    fn default() -> Self {
        Self {
            library_type: LibraryType::User,
            library_id: String::new(),
            api_key: None,
            base_url: "https://api.zotero.org".into(),
            request_timeout_seconds: 15,
            default_item_type: Some("-attachment".into()),
        }
    }
}

impl ZoteroConfig {
    /// Validates this configuration.
    ///
    /// Checks that `library_id` is numeric, `base_url` parses, and the
    /// request timeout is greater than 0.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.library_id.is_empty() || !self.library_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SearchError::Config(
                "library_id must be a numeric Zotero library id".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "request_timeout_seconds must be greater than 0".into(),
            ));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| SearchError::Config(format!("invalid base_url: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.max_results, 20);
        assert_eq!(config.per_strategy_limit, 50);
        assert_eq!(config.strategy_timeout_seconds, 30);
        assert_eq!(config.max_matching_tags, 5);
        assert_eq!(config.keyword_modes.len(), 2);
        assert_eq!(config.semantic_modes.len(), 2);
    }

    #[test]
    fn default_strategies_exclude_recent() {
        let enabled = StrategyToggles::default().enabled();
        assert_eq!(
            enabled,
            vec![Strategy::Semantic, Strategy::Keyword, Strategy::Tag]
        );
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_results_is_allowed() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_per_strategy_limit_rejected() {
        let config = SearchConfig {
            per_strategy_limit: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("per_strategy_limit"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            strategy_timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("strategy_timeout_seconds"));
    }

    #[test]
    fn empty_keyword_modes_rejected_only_when_enabled() {
        let mut config = SearchConfig {
            keyword_modes: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.strategies.keyword = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tag_strategy_defaults_to_all_tags() {
        assert_eq!(SearchConfig::default().tag_combinator, TagCombinator::All);
    }

    #[test]
    fn inverted_recency_window_rejected() {
        let weights = ScoringWeights {
            recency_floor_year: 2024,
            recency_ceiling_year: 2000,
            ..Default::default()
        };
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("recency_floor_year"));
    }

    #[test]
    fn inverted_recency_range_rejected() {
        let config = SearchConfig {
            weights: ScoringWeights {
                recency_min: 4.0,
                recency_max: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("recency_min"));
    }

    #[test]
    fn negative_weight_rejected() {
        let weights = ScoringWeights {
            tag: -1.0,
            ..Default::default()
        };
        assert!(weights.validate().unwrap_err().to_string().contains("tag"));
    }

    #[test]
    fn search_config_deserialises_partial_json() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_results": 5, "strategies": {"semantic": false}}"#)
                .expect("deserialize");
        assert_eq!(config.max_results, 5);
        assert!(!config.strategies.semantic);
        assert!(config.strategies.keyword);
        assert_eq!(config.per_strategy_limit, 50);
    }

    #[test]
    fn zotero_config_validation() {
        let mut config = ZoteroConfig {
            library_id: "123456".into(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.library_id = "abc".into();
        assert!(config.validate().unwrap_err().to_string().contains("library_id"));

        config.library_id = "1".into();
        config.base_url = "not a url".into();
        assert!(config.validate().unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn library_type_path_segments() {
        assert_eq!(LibraryType::User.path_segment(), "users");
        assert_eq!(LibraryType::Group.path_segment(), "groups");
    }
}
