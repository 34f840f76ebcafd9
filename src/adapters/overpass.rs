use crate::domain::model::RawFeature;
use crate::domain::ports::SpatialSource;
use crate::utils::error::{describe_http_error, ExploreError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    /// Decoded one by one so a single odd element cannot sink the batch.
    #[serde(default)]
    elements: Vec<serde_json::Value>,
    /// Set when the server gave up part-way (e.g. its own timeout hit).
    remark: Option<String>,
}

pub struct OverpassClient {
    client: Client,
    endpoint: String,
}

impl OverpassClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn service_error(&self, error: &reqwest::Error) -> ExploreError {
        ExploreError::SpatialQueryError {
            message: describe_http_error(error, &self.endpoint),
        }
    }
}

#[async_trait]
impl SpatialSource for OverpassClient {
    async fn run_query(&self, query: &str) -> Result<Vec<RawFeature>> {
        tracing::debug!("📡 Posting {} byte query to {}", query.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| self.service_error(&e))?
            .error_for_status()
            .map_err(|e| self.service_error(&e))?;

        let body: OverpassResponse = response.json().await.map_err(|e| self.service_error(&e))?;

        if let Some(remark) = &body.remark {
            tracing::warn!("⚠️ Geodata service remark: {}", remark);
        }

        Ok(body.elements.into_iter().filter_map(decode_element).collect())
    }
}

fn decode_element(element: serde_json::Value) -> Option<RawFeature> {
    match serde_json::from_value::<RawFeature>(element) {
        Ok(feature) => Some(feature),
        Err(e) => {
            tracing::debug!("Skipping unreadable geodata element: {}", e);
            None
        }
    }
}
