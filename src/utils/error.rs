use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("Device location unavailable: {reason}")]
    LocationUnavailable { reason: String },

    #[error("No place found for '{query}'")]
    PlaceNotFound { query: String },

    #[error("Geocoding service error: {message}")]
    GeocodingServiceError { message: String },

    #[error("Spatial query failed: {message}")]
    SpatialQueryError { message: String },

    #[error("Knowledge lookup for '{term}' failed: {message}")]
    EnrichmentLookupError { term: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, ExploreError>;

/// Copyable classification of an [`ExploreError`], carried in cycle outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LocationUnavailable,
    PlaceNotFound,
    GeocodingService,
    SpatialQuery,
    EnrichmentLookup,
    Io,
    Serialization,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorKind {
    pub fn severity(self) -> ErrorSeverity {
        match self {
            Self::EnrichmentLookup => ErrorSeverity::Low,
            Self::LocationUnavailable | Self::PlaceNotFound => ErrorSeverity::Medium,
            Self::GeocodingService | Self::SpatialQuery => ErrorSeverity::High,
            Self::Io | Self::Serialization | Self::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(self) -> &'static str {
        match self {
            Self::LocationUnavailable => "Allow location access or search by city name instead",
            Self::PlaceNotFound => "Check the spelling of the place name and search again",
            Self::GeocodingService | Self::SpatialQuery => {
                "The map service may be busy; search again in a moment"
            }
            Self::EnrichmentLookup => "No action needed; the place is shown without details",
            Self::Io | Self::Serialization => "Check the output destination and retry",
            Self::Configuration => "Review the configuration values and restart",
        }
    }
}

impl ExploreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LocationUnavailable { .. } => ErrorKind::LocationUnavailable,
            Self::PlaceNotFound { .. } => ErrorKind::PlaceNotFound,
            Self::GeocodingServiceError { .. } => ErrorKind::GeocodingService,
            Self::SpatialQueryError { .. } => ErrorKind::SpatialQuery,
            Self::EnrichmentLookupError { .. } => ErrorKind::EnrichmentLookup,
            Self::IoError(_) => ErrorKind::Io,
            Self::SerializationError(_) | Self::CsvError(_) => ErrorKind::Serialization,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorKind::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.kind().severity()
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        self.kind().recovery_suggestion()
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::LocationUnavailable { .. } => "Your location could not be determined".to_string(),
            Self::PlaceNotFound { query } => format!("We couldn't find a place called '{}'", query),
            Self::GeocodingServiceError { .. } => "The place search service is unavailable".to_string(),
            Self::SpatialQueryError { .. } => "Nearby places could not be loaded".to_string(),
            other => other.to_string(),
        }
    }
}

/// Describes a transport failure the way the service adapters report it.
pub fn describe_http_error(error: &reqwest::Error, url: &str) -> String {
    if error.is_timeout() {
        return format!("request to {} timed out", url);
    }

    if let Some(status) = error.status() {
        return format!("{} answered with HTTP {}", url, status.as_u16());
    }

    if error.is_decode() {
        return format!("malformed response from {}: {}", url, error);
    }

    format!("network error talking to {}: {}", url, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_errors_are_classified() {
        let err = ExploreError::PlaceNotFound {
            query: "Atlantis".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::PlaceNotFound);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("Atlantis"));

        let err = ExploreError::SpatialQueryError {
            message: "boom".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::SpatialQuery);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = ExploreError::MissingConfigError {
            field: "services.geocoder".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(
            err.to_string(),
            "Missing required configuration: services.geocoder"
        );
    }
}
