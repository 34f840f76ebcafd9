use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::adapters::sink::OutputFormat;
use crate::adapters::{nominatim, overpass, wikipedia};
use crate::core::query_builder::{DEFAULT_QUERY_TIMEOUT_SECS, DEFAULT_RADIUS_M};
use crate::core::ConfigProvider;
use crate::utils::error::{ExploreError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub services: ServicesConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub geocoder: String,
    pub geodata: String,
    pub knowledge: String,
    pub user_agent: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            geocoder: nominatim::DEFAULT_ENDPOINT.to_string(),
            geodata: overpass::DEFAULT_ENDPOINT.to_string(),
            knowledge: wikipedia::DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_m: u32,
    pub query_timeout_secs: u32,
    /// Searched when no location is given on the command line.
    pub city: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            city: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl TomlConfig {
    /// Loads a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExploreError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text, expanding `${VAR}` from the environment first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExploreError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExploreError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn geocoder_endpoint(&self) -> &str {
        &self.services.geocoder
    }

    fn geodata_endpoint(&self) -> &str {
        &self.services.geodata
    }

    fn knowledge_endpoint(&self) -> &str {
        &self.services.knowledge
    }

    fn user_agent(&self) -> &str {
        &self.services.user_agent
    }

    fn search_radius_m(&self) -> u32 {
        self.search.radius_m
    }

    fn query_timeout_secs(&self) -> u32 {
        self.search.query_timeout_secs
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.services.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("services.geocoder", &self.services.geocoder)?;
        validation::validate_url("services.geodata", &self.services.geodata)?;
        validation::validate_url("services.knowledge", &self.services.knowledge)?;
        validation::validate_non_empty_string("services.user_agent", &self.services.user_agent)?;
        validation::validate_range("search.radius_m", self.search.radius_m, 1, super::MAX_RADIUS_M)?;
        validation::validate_range(
            "search.query_timeout_secs",
            self.search.query_timeout_secs,
            1,
            super::MAX_QUERY_TIMEOUT_SECS,
        )?;
        if let Some(city) = &self.search.city {
            validation::validate_non_empty_string("search.city", city)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[services]
geocoder = "https://geocode.example.com/search"
geodata = "https://overpass.example.com/api/interpreter"
knowledge = "https://wiki.example.com/w/api.php"
user_agent = "my-explorer/1.0 (me@example.com)"
request_timeout_secs = 20

[search]
radius_m = 1500
query_timeout_secs = 60
city = "Lisbon"

[output]
format = "csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.geocoder_endpoint(), "https://geocode.example.com/search");
        assert_eq!(config.user_agent(), "my-explorer/1.0 (me@example.com)");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.search_radius_m(), 1500);
        assert_eq!(config.query_timeout_secs(), 60);
        assert_eq!(config.search.city.as_deref(), Some("Lisbon"));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_tables_fall_back_to_defaults() {
        let config = TomlConfig::from_toml_str("[search]\nradius_m = 800\n").unwrap();

        assert_eq!(config.search_radius_m(), 800);
        assert_eq!(config.query_timeout_secs(), DEFAULT_QUERY_TIMEOUT_SECS);
        assert_eq!(config.geodata_endpoint(), overpass::DEFAULT_ENDPOINT);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EXPLORE_TEST_GEODATA", "https://overpass.test");

        let toml_content = r#"
[services]
geodata = "${EXPLORE_TEST_GEODATA}"
knowledge = "${EXPLORE_TEST_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.services.geodata, "https://overpass.test");
        assert_eq!(config.services.knowledge, "${EXPLORE_TEST_UNSET_VARIABLE}");

        std::env::remove_var("EXPLORE_TEST_GEODATA");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[services]\ngeocoder = \"invalid-url\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[search]\nradius_m = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = TomlConfig::from_toml_str("[search\nradius_m = 1").unwrap_err();
        assert!(matches!(err, ExploreError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[search]\ncity = \"Kyoto\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.search.city.as_deref(), Some("Kyoto"));
    }
}
