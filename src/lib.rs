pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{build_http_pipeline, location::FixedLocation, sink::MemorySink};
pub use config::toml_config::TomlConfig;
pub use core::pipeline::{CycleOutcome, SearchPipeline};
pub use domain::model::{Coordinate, LocationIntent, Poi, SearchPhase, SearchResultSet};
pub use utils::error::{ErrorKind, ExploreError, Result};
