use crate::domain::model::{Coordinate, LocationIntent};
use crate::domain::ports::{Geocoder, LocationProvider};
use crate::utils::error::{ExploreError, Result};
use std::sync::Arc;

pub struct CoordinateResolver {
    location: Arc<dyn LocationProvider>,
    geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
    pub fn new(location: Arc<dyn LocationProvider>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { location, geocoder }
    }

    pub async fn resolve(&self, intent: &LocationIntent) -> Result<Coordinate> {
        match intent {
            LocationIntent::DeviceLocation => self.device_position().await,
            LocationIntent::City(name) => self.geocode(name).await,
        }
    }

    async fn device_position(&self) -> Result<Coordinate> {
        let position = self.location.current_position().await.map_err(|e| match e {
            ExploreError::LocationUnavailable { .. } => e,
            other => ExploreError::LocationUnavailable {
                reason: other.to_string(),
            },
        })?;
        tracing::info!("📍 Device position {}", position);
        Ok(position)
    }

    /// The service ranks candidates; the first one wins.
    async fn geocode(&self, name: &str) -> Result<Coordinate> {
        let query = name.trim();
        if query.is_empty() {
            return Err(ExploreError::PlaceNotFound {
                query: name.to_string(),
            });
        }

        let candidates = self.geocoder.lookup(query).await.map_err(|e| match e {
            ExploreError::GeocodingServiceError { .. } | ExploreError::PlaceNotFound { .. } => e,
            other => ExploreError::GeocodingServiceError {
                message: other.to_string(),
            },
        })?;

        let first = candidates
            .first()
            .copied()
            .ok_or_else(|| ExploreError::PlaceNotFound {
                query: query.to_string(),
            })?;

        tracing::info!(
            "📍 '{}' resolved to {} ({} candidates)",
            query,
            first,
            candidates.len()
        );
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockLocation(Option<Coordinate>);

    #[async_trait]
    impl LocationProvider for MockLocation {
        async fn current_position(&self) -> Result<Coordinate> {
            self.0.ok_or_else(|| ExploreError::LocationUnavailable {
                reason: "permission denied".to_string(),
            })
        }
    }

    struct MockGeocoder {
        candidates: Vec<Coordinate>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl MockGeocoder {
        fn with(candidates: Vec<Coordinate>) -> Self {
            Self {
                candidates,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Geocoder for MockGeocoder {
        async fn lookup(&self, _query: &str) -> Result<Vec<Coordinate>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExploreError::SerializationError(
                    serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
                ));
            }
            Ok(self.candidates.clone())
        }
    }

    fn resolver(location: Option<Coordinate>, geocoder: MockGeocoder) -> CoordinateResolver {
        CoordinateResolver::new(Arc::new(MockLocation(location)), Arc::new(geocoder))
    }

    #[tokio::test]
    async fn test_device_mode_uses_position_fix() {
        let fix = Coordinate::new(51.505, -0.09).unwrap();
        let resolver = resolver(Some(fix), MockGeocoder::with(vec![]));

        let coordinate = resolver.resolve(&LocationIntent::DeviceLocation).await.unwrap();

        assert_eq!(coordinate, fix);
    }

    #[tokio::test]
    async fn test_device_mode_denied() {
        let resolver = resolver(None, MockGeocoder::with(vec![]));

        let err = resolver
            .resolve(&LocationIntent::DeviceLocation)
            .await
            .unwrap_err();

        assert!(matches!(err, ExploreError::LocationUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_city_mode_takes_first_candidate() {
        let paris = Coordinate::new(48.8566, 2.3522).unwrap();
        let texas = Coordinate::new(33.6609, -95.5555).unwrap();
        let resolver = resolver(None, MockGeocoder::with(vec![paris, texas]));

        let coordinate = resolver
            .resolve(&LocationIntent::City("Paris".to_string()))
            .await
            .unwrap();

        assert_eq!(coordinate, paris);
    }

    #[tokio::test]
    async fn test_city_mode_without_candidates() {
        let resolver = resolver(None, MockGeocoder::with(vec![]));

        let err = resolver
            .resolve(&LocationIntent::City("Atlantis".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ExploreError::PlaceNotFound { query } if query == "Atlantis"));
    }

    #[tokio::test]
    async fn test_city_mode_service_failure() {
        let mut geocoder = MockGeocoder::with(vec![]);
        geocoder.fail = true;
        let resolver = resolver(None, geocoder);

        let err = resolver
            .resolve(&LocationIntent::City("Paris".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ExploreError::GeocodingServiceError { .. }));
    }

    #[tokio::test]
    async fn test_blank_city_skips_the_service() {
        let geocoder = Arc::new(MockGeocoder::with(vec![]));
        let resolver = CoordinateResolver::new(Arc::new(MockLocation(None)), geocoder.clone());

        let err = resolver
            .resolve(&LocationIntent::City("   ".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ExploreError::PlaceNotFound { .. }));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }
}
