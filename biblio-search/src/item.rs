//! The normalised bibliographic item and its construction from raw records.
//!
//! Backend payloads are loosely typed JSON. They are normalised once, at the
//! boundary, into [`Item`]; nothing downstream sees a backend-shaped value
//! except through [`Item::raw_data`].

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SearchError;

/// One bibliographic record.
///
/// Identity is the `key` alone: two items with the same key compare and hash
/// equal even when their other fields differ. Merging keeps the first copy
/// seen, so conflicting field values between strategies are never reconciled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable backend identifier.
    pub key: String,
    pub title: String,
    /// Zotero item type, e.g. `journalArticle`.
    pub item_type: String,
    /// Year-first date string as stored by the backend; may be partial or empty.
    pub date: String,
    /// Pre-joined creator display string.
    pub authors: String,
    /// Abstract text; empty when the record has none.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Distinct tags in backend order.
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub doi: Option<String>,
    /// The untouched backend payload. Excluded from identity.
    #[serde(default)]
    pub raw_data: Value,
}

impl Item {
    /// Normalise a raw backend record into an [`Item`].
    ///
    /// Accepts the Zotero API shape (`{"key": .., "data": {..}}`) as well as a
    /// bare data object. Missing optional fields become empty strings or
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MalformedRecord`] if the record is not a JSON
    /// object or carries no non-empty key.
    pub fn from_raw(record: Value) -> Result<Self, SearchError> {
        let Some(outer) = record.as_object() else {
            return Err(SearchError::MalformedRecord(format!(
                "expected a JSON object, got {}",
                json_kind(&record)
            )));
        };
        let data = match outer.get("data") {
            Some(Value::Object(data)) => data,
            Some(other) => {
                return Err(SearchError::MalformedRecord(format!(
                    "`data` must be an object, got {}",
                    json_kind(other)
                )))
            }
            None => outer,
        };

        // An empty or non-string `data.key` falls back to the envelope key.
        let key = [data.get("key"), outer.get("key")]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|k| !k.is_empty())
            .ok_or_else(|| SearchError::MalformedRecord("record has no key".into()))?
            .to_owned();

        let field = |name: &str| {
            data.get(name)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_default()
        };
        let optional = |name: &str| {
            data.get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };

        let title = optional("title").unwrap_or_else(|| "Untitled".to_owned());
        let item_type = optional("itemType").unwrap_or_else(|| "unknown".to_owned());
        let authors = data
            .get("creators")
            .and_then(Value::as_array)
            .map(|creators| format_creators(creators))
            .unwrap_or_default();

        let mut tags: Vec<String> = Vec::new();
        if let Some(raw_tags) = data.get("tags").and_then(Value::as_array) {
            for raw in raw_tags {
                let tag = match raw {
                    Value::String(s) => s.as_str(),
                    Value::Object(obj) => obj.get("tag").and_then(Value::as_str).unwrap_or(""),
                    _ => "",
                };
                let tag = tag.trim();
                if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                    tags.push(tag.to_owned());
                }
            }
        }

        let date = field("date");
        let abstract_text = field("abstractNote");
        let url = optional("url");
        let doi = optional("DOI");

        Ok(Self {
            key,
            title,
            item_type,
            date,
            authors,
            abstract_text,
            tags,
            url,
            doi,
            raw_data: record,
        })
    }

    /// Publication year parsed from the leading four digits of `date`.
    ///
    /// Returns `None` for empty or non-year-first dates.
    pub fn year(&self) -> Option<i32> {
        parse_year(&self.date)
    }

    /// Whether the item carries `tag`, compared case-insensitively.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == wanted)
    }

    /// Render this item as a Markdown section headed by its title.
    pub fn to_markdown(&self, include_abstract: bool) -> String {
        self.render_markdown(
            &self.title,
            include_abstract.then_some(self.abstract_text.as_str()),
        )
    }

    /// Markdown section with a caller-chosen heading and abstract text.
    /// Empty abstracts are omitted.
    pub(crate) fn render_markdown(&self, heading: &str, abstract_text: Option<&str>) -> String {
        let mut lines = vec![
            format!("## {heading}"),
            format!("**Key:** {}", self.key),
            format!("**Type:** {}", self.item_type),
            format!("**Date:** {}", self.date),
            format!("**Authors:** {}", self.authors),
        ];
        if let Some(ref doi) = self.doi {
            lines.push(format!("**DOI:** {doi}"));
        }
        if let Some(ref url) = self.url {
            lines.push(format!("**URL:** {url}"));
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("`{t}`")).collect();
            lines.push(format!("**Tags:** {}", tags.join(" ")));
        }
        if let Some(text) = abstract_text.filter(|t| !t.is_empty()) {
            lines.push(String::new());
            lines.push(format!("**Abstract:** {text}"));
        }
        lines.join("\n")
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Normalise a batch of raw records, skipping the ones that are malformed.
///
/// One bad record never aborts the batch: it is logged at warn level and
/// dropped. `source` names the primitive for the log line.
pub fn normalize_batch(records: Vec<Value>, source: &str) -> Vec<Item> {
    let total = records.len();
    let items: Vec<Item> = records
        .into_iter()
        .filter_map(|record| match Item::from_raw(record) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(source, error = %err, "skipping record");
                None
            }
        })
        .collect();
    if items.len() < total {
        tracing::debug!(source, total, kept = items.len(), "normalised batch with skips");
    }
    items
}

/// Parse a year from the first four characters of a year-first date string.
pub fn parse_year(date: &str) -> Option<i32> {
    let head = date.trim().get(..4)?;
    if head.bytes().all(|b| b.is_ascii_digit()) {
        head.parse().ok()
    } else {
        None
    }
}

/// Join Zotero creator objects into a display string.
///
/// Person creators render as `Last, First`; single-field creators use
/// `name`. Creators with neither are skipped.
fn format_creators(creators: &[Value]) -> String {
    creators
        .iter()
        .filter_map(|creator| {
            let get = |k: &str| {
                creator
                    .get(k)
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            };
            match (get("lastName"), get("firstName"), get("name")) {
                (Some(last), Some(first), _) => Some(format!("{last}, {first}")),
                (Some(last), None, _) => Some(last.to_owned()),
                (None, _, Some(name)) => Some(name.to_owned()),
                (None, Some(first), None) => Some(first.to_owned()),
                (None, None, None) => None,
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn zotero_record() -> Value {
        json!({
            "key": "ABCD1234",
            "version": 42,
            "data": {
                "key": "ABCD1234",
                "itemType": "journalArticle",
                "title": "Embodied Cognition Revisited",
                "date": "2021-03-04",
                "abstractNote": "How the body shapes the mind.",
                "creators": [
                    {"creatorType": "author", "firstName": "Andy", "lastName": "Clark"},
                    {"creatorType": "author", "name": "Cognition Lab"}
                ],
                "tags": [{"tag": "embodiment"}, {"tag": "cognition", "type": 1}, {"tag": "embodiment"}],
                "url": "https://example.org/paper",
                "DOI": "10.1000/xyz"
            }
        })
    }

    #[test]
    fn from_raw_normalises_zotero_shape() {
        let item = Item::from_raw(zotero_record()).expect("valid record");
        assert_eq!(item.key, "ABCD1234");
        assert_eq!(item.title, "Embodied Cognition Revisited");
        assert_eq!(item.item_type, "journalArticle");
        assert_eq!(item.date, "2021-03-04");
        assert_eq!(item.authors, "Clark, Andy; Cognition Lab");
        assert_eq!(item.abstract_text, "How the body shapes the mind.");
        assert_eq!(item.tags, vec!["embodiment", "cognition"]);
        assert_eq!(item.url.as_deref(), Some("https://example.org/paper"));
        assert_eq!(item.doi.as_deref(), Some("10.1000/xyz"));
        assert_eq!(item.raw_data["version"], 42);
    }

    #[test]
    fn from_raw_tolerates_missing_optional_fields() {
        let item = Item::from_raw(json!({"key": "K1", "data": {}})).expect("key is enough");
        assert_eq!(item.key, "K1");
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.item_type, "unknown");
        assert_eq!(item.date, "");
        assert_eq!(item.authors, "");
        assert!(item.abstract_text.is_empty());
        assert!(item.tags.is_empty());
        assert!(item.url.is_none());
        assert!(item.doi.is_none());
        assert!(item.year().is_none());
    }

    #[test]
    fn from_raw_accepts_bare_data_object() {
        let item = Item::from_raw(json!({"key": "K2", "title": "Flat", "tags": ["a", "b"]}))
            .expect("flat record");
        assert_eq!(item.title, "Flat");
        assert_eq!(item.tags, vec!["a", "b"]);
    }

    #[test]
    fn empty_data_key_falls_back_to_envelope_key() {
        let empty = Item::from_raw(json!({"key": "OUTER", "data": {"key": "", "title": "t"}}))
            .expect("envelope key used");
        assert_eq!(empty.key, "OUTER");

        let numeric = Item::from_raw(json!({"key": "OUTER", "data": {"key": 7}}))
            .expect("envelope key used");
        assert_eq!(numeric.key, "OUTER");

        assert!(Item::from_raw(json!({"key": " ", "data": {"key": ""}})).is_err());
    }

    #[test]
    fn to_markdown_renders_fields() {
        let item = Item::from_raw(zotero_record()).expect("valid");
        let with = item.to_markdown(true);
        assert!(with.starts_with(&format!("## {}\n**Key:** {}", item.title, item.key)));
        assert!(with.contains("**Type:** journalArticle"));
        assert!(with.contains("**Authors:** Clark, Andy; Cognition Lab"));
        assert!(with.contains("**DOI:** 10.1000/xyz"));
        assert!(with.contains("**Tags:** `embodiment` `cognition`"));
        assert!(with.ends_with("\n\n**Abstract:** How the body shapes the mind."));

        let without = item.to_markdown(false);
        assert!(!without.contains("**Abstract:**"));
        assert!(without.ends_with("**Tags:** `embodiment` `cognition`"));
    }

    #[test]
    fn from_raw_rejects_missing_key() {
        let err = Item::from_raw(json!({"data": {"title": "No key"}})).unwrap_err();
        assert!(matches!(err, SearchError::MalformedRecord(_)));
    }

    #[test]
    fn from_raw_rejects_non_object() {
        let err = Item::from_raw(json!("just a string")).unwrap_err();
        assert!(err.to_string().contains("a string"));
    }

    #[test]
    fn empty_doi_and_url_become_none() {
        let item = Item::from_raw(json!({"key": "K3", "data": {"url": "", "DOI": "  "}}))
            .expect("valid");
        assert!(item.url.is_none());
        assert!(item.doi.is_none());
    }

    #[test]
    fn equality_and_hash_use_key_only() {
        let a = Item::from_raw(json!({"key": "SAME", "title": "First copy"})).expect("valid");
        let b = Item::from_raw(json!({"key": "SAME", "title": "Second copy"})).expect("valid");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().map(|i| i.title.as_str()), Some("First copy"));
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("2020-05-01"), Some(2020));
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year(" 2015/07"), Some(2015));
        assert_eq!(parse_year("May 2020"), None);
        assert_eq!(parse_year("20"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn has_tag_is_case_insensitive() {
        let item = Item::from_raw(zotero_record()).expect("valid");
        assert!(item.has_tag("Embodiment"));
        assert!(!item.has_tag("physics"));
    }

    #[test]
    fn normalize_batch_skips_bad_records() {
        let records = vec![
            zotero_record(),
            json!(17),
            json!({"data": {"title": "keyless"}}),
            json!({"key": "OK2"}),
        ];
        let items = normalize_batch(records, "test");
        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["ABCD1234", "OK2"]);
    }
}
