//! Zotero Web API v3 backend.
//!
//! A thin pass-through: each primitive becomes one or more `GET` requests
//! against `/{users|groups}/{id}/items` or `/tags`. The API serves at most
//! 100 records per request, so larger limits are fetched page by page using
//! `start`. Semantic search is not offered by the Web API; the default
//! [`Backend::semantic_search`] reports it as unavailable.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::backend::Backend;
use crate::config::ZoteroConfig;
use crate::error::SearchError;
use crate::types::{KeywordQuery, TagCombinator, TagQuery};

/// Largest page the Zotero Web API serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Upper bound on tag vocabulary pages fetched.
const MAX_TAG_PAGES: usize = 500;

/// Zotero Web API client implementing [`Backend`].
#[derive(Debug, Clone)]
pub struct ZoteroWebBackend {
    client: reqwest::Client,
    config: ZoteroConfig,
}

impl ZoteroWebBackend {
    /// Build a backend from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the configuration is invalid or
    /// the API key is not a valid header value, and [`SearchError::Http`]
    /// if the HTTP client cannot be constructed.
    pub fn new(config: ZoteroConfig) -> Result<Self, SearchError> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert("Zotero-API-Version", HeaderValue::from_static("3"));
        if let Some(ref key) = config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| SearchError::Config("api_key is not a valid header value".into()))?;
            headers.insert("Zotero-API-Key", value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .default_headers(headers)
            .user_agent(concat!("biblio-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The configuration this backend was built with.
    pub fn config(&self) -> &ZoteroConfig {
        &self.config
    }

    /// `{base_url}/{users|groups}/{library_id}/{resource}`.
    fn endpoint(&self, resource: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SearchError::Config(format!("invalid base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| SearchError::Config("base_url cannot carry a path".into()))?
            .pop_if_empty()
            .extend([
                self.config.library_type.path_segment(),
                self.config.library_id.as_str(),
                resource,
            ]);
        Ok(url)
    }

    /// Fetch up to `limit` item records, paging as needed.
    async fn fetch_items(&self, params: &[(&str, String)], limit: usize) -> Result<Vec<Value>, SearchError> {
        let mut records: Vec<Value> = Vec::new();
        let mut start = 0usize;

        while records.len() < limit {
            let page_size = (limit - records.len()).min(MAX_PAGE_SIZE);
            let mut url = self.endpoint("items")?;
            {
                let mut pairs = url.query_pairs_mut();
                for (name, value) in params {
                    pairs.append_pair(name, value);
                }
                pairs
                    .append_pair("format", "json")
                    .append_pair("limit", &page_size.to_string())
                    .append_pair("start", &start.to_string());
            }

            let page = self.get_array(url).await?;
            let received = page.len();
            records.extend(page);
            if received < page_size {
                break;
            }
            start += received;
        }

        records.truncate(limit);
        Ok(records)
    }

    async fn get_array(&self, url: Url) -> Result<Vec<Value>, SearchError> {
        let response = self.client.get(url).send().await.map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(format!("Zotero API returned status {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Http(format!("invalid JSON from Zotero API: {e}")))?;
        match body {
            Value::Array(records) => Ok(records),
            other => Err(SearchError::Http(format!(
                "expected a JSON array from Zotero API, got {}",
                if other.is_object() { "an object" } else { "a scalar" }
            ))),
        }
    }

    fn item_type_param(&self, requested: Option<&String>) -> Option<String> {
        requested.cloned().or_else(|| self.config.default_item_type.clone())
    }
}

/// Query parameters encoding a tag combination in Zotero's syntax.
///
/// Repeated `tag` parameters are ANDed; `||` inside one parameter is OR;
/// a leading `-` negates.
pub fn tag_params(query: &TagQuery) -> Vec<(&'static str, String)> {
    match query.combinator {
        TagCombinator::All => query.tags.iter().map(|t| ("tag", t.clone())).collect(),
        TagCombinator::Any => vec![("tag", query.tags.join(" || "))],
        TagCombinator::Not => query.tags.iter().map(|t| ("tag", format!("-{t}"))).collect(),
    }
}

fn map_transport_error(err: reqwest::Error) -> SearchError {
    if err.is_connect() {
        SearchError::BackendUnavailable(format!("cannot reach Zotero API: {err}"))
    } else if err.is_timeout() {
        SearchError::Timeout(format!("Zotero API request timed out: {err}"))
    } else {
        SearchError::Http(err.to_string())
    }
}

impl Backend for ZoteroWebBackend {
    async fn keyword_search(&self, query: &KeywordQuery, limit: usize) -> Result<Vec<Value>, SearchError> {
        let mut params: Vec<(&str, String)> = vec![
            ("q", query.text.clone()),
            ("qmode", query.mode.as_api_str().to_owned()),
        ];
        if let Some(item_type) = self.item_type_param(query.item_type.as_ref()) {
            params.push(("itemType", item_type));
        }
        if let Some(ref tag) = query.tag {
            params.push(("tag", tag.clone()));
        }
        self.fetch_items(&params, limit).await
    }

    async fn tag_search(&self, query: &TagQuery, limit: usize) -> Result<Vec<Value>, SearchError> {
        let mut params: Vec<(&str, String)> = tag_params(query);
        if let Some(item_type) = self.item_type_param(query.item_type.as_ref()) {
            params.push(("itemType", item_type));
        }
        self.fetch_items(&params, limit).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<Value>, SearchError> {
        let mut params: Vec<(&str, String)> = vec![
            ("sort", "dateAdded".to_owned()),
            ("direction", "desc".to_owned()),
        ];
        if let Some(item_type) = self.item_type_param(None) {
            params.push(("itemType", item_type));
        }
        self.fetch_items(&params, limit).await
    }

    async fn tag_vocabulary(&self) -> Result<Vec<String>, SearchError> {
        let mut tags: Vec<String> = Vec::new();
        for page_index in 0..MAX_TAG_PAGES {
            let mut url = self.endpoint("tags")?;
            url.query_pairs_mut()
                .append_pair("format", "json")
                .append_pair("limit", &MAX_PAGE_SIZE.to_string())
                .append_pair("start", &(page_index * MAX_PAGE_SIZE).to_string());

            let page = self.get_array(url).await?;
            let received = page.len();
            tags.extend(
                page.iter()
                    .filter_map(|entry| entry.get("tag").and_then(Value::as_str))
                    .map(str::to_owned),
            );
            if received < MAX_PAGE_SIZE {
                return Ok(tags);
            }
        }
        tracing::warn!(pages = MAX_TAG_PAGES, "tag vocabulary truncated at page cap");
        Ok(tags)
    }
}
