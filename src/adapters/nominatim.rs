use crate::domain::model::Coordinate;
use crate::domain::ports::Geocoder;
use crate::utils::error::{describe_http_error, ExploreError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim sends coordinates as strings; other geocoders send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    lat: Degrees,
    lon: Degrees,
    display_name: Option<String>,
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn service_error(&self, error: &reqwest::Error) -> ExploreError {
        ExploreError::GeocodingServiceError {
            message: describe_http_error(error, &self.endpoint),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn lookup(&self, query: &str) -> Result<Vec<Coordinate>> {
        tracing::debug!("📡 Geocoding '{}' via {}", query, self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await
            .map_err(|e| self.service_error(&e))?
            .error_for_status()
            .map_err(|e| self.service_error(&e))?;

        let candidates: Vec<Candidate> =
            response.json().await.map_err(|e| self.service_error(&e))?;

        let coordinates: Vec<Coordinate> = candidates
            .iter()
            .filter_map(|candidate| {
                let lat = candidate.lat.value()?;
                let lon = candidate.lon.value()?;
                match Coordinate::new(lat, lon) {
                    Ok(coordinate) => Some(coordinate),
                    Err(_) => {
                        tracing::debug!(
                            "Skipping candidate {:?} with invalid position",
                            candidate.display_name
                        );
                        None
                    }
                }
            })
            .collect();

        tracing::debug!("📡 Geocoder returned {} candidates", coordinates.len());
        Ok(coordinates)
    }
}
