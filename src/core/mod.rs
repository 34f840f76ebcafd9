pub mod cycle;
pub mod enricher;
pub mod executor;
pub mod pipeline;
pub mod query_builder;
pub mod resolver;

pub use crate::domain::model::{Coordinate, LocationIntent, Poi, QuerySpec, SearchResultSet};
pub use crate::domain::ports::{ConfigProvider, KnowledgeSource, ResultSink, SpatialSource};
pub use crate::utils::error::Result;
