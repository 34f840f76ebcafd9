use crate::domain::model::Coordinate;
use crate::domain::ports::LocationProvider;
use crate::utils::error::{ExploreError, Result};
use async_trait::async_trait;

/// A position fix handed over by the host (or none, when the host could not
/// get one).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    position: Option<Coordinate>,
}

impl FixedLocation {
    pub fn new(position: Coordinate) -> Self {
        Self {
            position: Some(position),
        }
    }

    pub fn unavailable() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinate> {
        self.position.ok_or_else(|| ExploreError::LocationUnavailable {
            reason: "no position fix was provided".to_string(),
        })
    }
}
