// Adapters layer: concrete implementations of the domain ports (HTTP services, location, sinks).

pub mod http;
pub mod location;
pub mod nominatim;
pub mod overpass;
pub mod sink;
pub mod wikipedia;

use crate::core::pipeline::SearchPipeline;
use crate::core::query_builder::QueryBuilder;
use crate::domain::ports::{ConfigProvider, LocationProvider, ResultSink};
use crate::utils::error::Result;
use std::sync::Arc;

/// Wires the public OSM / Wikipedia services into a pipeline.
pub fn build_http_pipeline(
    config: &dyn ConfigProvider,
    location: Arc<dyn LocationProvider>,
    sink: Arc<dyn ResultSink>,
) -> Result<SearchPipeline> {
    let client = http::build_client(config)?;

    tracing::debug!(
        "Services: geocoder={}, geodata={}, knowledge={}",
        config.geocoder_endpoint(),
        config.geodata_endpoint(),
        config.knowledge_endpoint()
    );

    Ok(SearchPipeline::new(
        location,
        Arc::new(nominatim::NominatimGeocoder::new(
            client.clone(),
            config.geocoder_endpoint(),
        )),
        Arc::new(overpass::OverpassClient::new(
            client.clone(),
            config.geodata_endpoint(),
        )),
        Arc::new(wikipedia::WikipediaClient::new(
            client,
            config.knowledge_endpoint(),
        )),
        sink,
        QueryBuilder::from_config(config),
    ))
}
