use crate::domain::model::PageSummary;
use crate::domain::ports::KnowledgeSource;
use crate::utils::error::{describe_http_error, ExploreError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    query: Option<QueryBlock>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    info: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    /// Search rank when pages come from `generator=search`.
    index: Option<u32>,
    thumbnail: Option<Thumbnail>,
    description: Option<String>,
    fullurl: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Best-ranked page first; page id breaks ties and covers missing ranks.
fn first_page(pages: HashMap<String, Page>) -> Option<Page> {
    pages
        .into_iter()
        .min_by_key(|(id, page)| {
            (
                page.index.unwrap_or(u32::MAX),
                id.parse::<i64>().unwrap_or(i64::MAX),
            )
        })
        .map(|(_, page)| page)
}

fn summarize(page: Page) -> PageSummary {
    PageSummary {
        description: non_empty(page.description),
        image_url: non_empty(page.thumbnail.map(|thumbnail| thumbnail.source)),
        reference_link: non_empty(page.fullurl),
    }
}

pub struct WikipediaClient {
    client: Client,
    endpoint: String,
}

impl WikipediaClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn lookup_error(&self, term: &str, message: String) -> ExploreError {
        ExploreError::EnrichmentLookupError {
            term: term.to_string(),
            message,
        }
    }
}

#[async_trait]
impl KnowledgeSource for WikipediaClient {
    async fn lookup(&self, term: &str) -> Result<Option<PageSummary>> {
        tracing::debug!("📡 Looking up '{}' via {}", term, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "pageimages|description|info"),
                ("inprop", "url"),
                ("generator", "search"),
                ("gsrsearch", term),
            ])
            .send()
            .await
            .map_err(|e| self.lookup_error(term, describe_http_error(&e, &self.endpoint)))?
            .error_for_status()
            .map_err(|e| self.lookup_error(term, describe_http_error(&e, &self.endpoint)))?;

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| self.lookup_error(term, describe_http_error(&e, &self.endpoint)))?;

        if let Some(error) = body.error {
            return Err(self.lookup_error(
                term,
                format!("{}: {}", error.code, error.info.unwrap_or_default()),
            ));
        }

        // no `query` block means the search matched nothing
        Ok(body
            .query
            .and_then(|query| first_page(query.pages))
            .map(summarize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(json: serde_json::Value) -> HashMap<String, Page> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_first_page_follows_search_rank() {
        let pages = pages(serde_json::json!({
            "100": {"index": 2, "description": "second"},
            "900": {"index": 1, "description": "first"},
            "50": {"index": 3, "description": "third"}
        }));

        let first = first_page(pages).unwrap();

        assert_eq!(first.description.as_deref(), Some("first"));
    }

    #[test]
    fn test_first_page_without_rank_uses_lowest_id() {
        let pages = pages(serde_json::json!({
            "300": {"description": "c"},
            "20": {"description": "a"},
            "1000": {"description": "b"}
        }));

        let first = first_page(pages).unwrap();

        assert_eq!(first.description.as_deref(), Some("a"));
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let page: Page = serde_json::from_value(serde_json::json!({
            "description": "",
            "thumbnail": {"source": "https://upload.example/t.jpg"}
        }))
        .unwrap();

        let summary = summarize(page);

        assert_eq!(summary.description, None);
        assert_eq!(summary.image_url.as_deref(), Some("https://upload.example/t.jpg"));
        assert_eq!(summary.reference_link, None);
    }
}
