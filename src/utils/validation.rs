use crate::utils::error::{ExploreError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ExploreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ExploreError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ExploreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ExploreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so test for containment instead of exclusion
    if !(value >= min && value <= max) {
        return Err(ExploreError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ExploreError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("services.geocoder", "https://example.com").is_ok());
        assert!(validate_url("services.geocoder", "http://example.com").is_ok());
        assert!(validate_url("services.geocoder", "").is_err());
        assert!(validate_url("services.geocoder", "invalid-url").is_err());
        assert!(validate_url("services.geocoder", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("latitude", 51.5, -90.0, 90.0).is_ok());
        assert!(validate_range("latitude", 90.0, -90.0, 90.0).is_ok());
        assert!(validate_range("latitude", 90.1, -90.0, 90.0).is_err());
        assert!(validate_range("latitude", f64::NAN, -90.0, 90.0).is_err());
        assert!(validate_range("search.radius_m", 0u32, 1, 50_000).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("user_agent", "explore-local/0.1").is_ok());
        assert!(validate_non_empty_string("user_agent", "   ").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3000u32);
        let missing: Option<u32> = None;
        assert_eq!(*validate_required_field("radius", &present).unwrap(), 3000);
        assert!(matches!(
            validate_required_field("radius", &missing),
            Err(ExploreError::MissingConfigError { .. })
        ));
    }
}
