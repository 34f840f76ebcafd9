use crate::domain::model::{Coordinate, CycleToken, PageSummary, RawFeature, SearchPhase, SearchResultSet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One-shot position fix from the host platform.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate>;
}

/// Free-text place name to ranked candidate coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<Coordinate>>;
}

/// Runs a serialized spatial query and returns the raw elements in response order.
#[async_trait]
pub trait SpatialSource: Send + Sync {
    async fn run_query(&self, query: &str) -> Result<Vec<RawFeature>>;
}

/// `Ok(None)` means the service answered but had no matching page.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    async fn lookup(&self, term: &str) -> Result<Option<PageSummary>>;
}

/// Callbacks may read back through the pipeline; no lock is held while they run.
pub trait ResultSink: Send + Sync {
    /// `center` is where the cycle searched, `None` when it never resolved one.
    fn publish(&self, token: CycleToken, center: Option<Coordinate>, results: &SearchResultSet);

    fn phase_changed(&self, _token: CycleToken, _phase: SearchPhase) {}
}

pub trait ConfigProvider: Send + Sync {
    fn geocoder_endpoint(&self) -> &str;
    fn geodata_endpoint(&self) -> &str;
    fn knowledge_endpoint(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn search_radius_m(&self) -> u32;
    fn query_timeout_secs(&self) -> u32;
    fn request_timeout(&self) -> Option<Duration>;
}
