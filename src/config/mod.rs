pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use crate::adapters::http::DEFAULT_USER_AGENT;
    use crate::adapters::sink::OutputFormat;
    use crate::adapters::{nominatim, overpass, wikipedia};
    use crate::core::query_builder::{DEFAULT_QUERY_TIMEOUT_SECS, DEFAULT_RADIUS_M};
    use crate::core::ConfigProvider;
    use crate::domain::model::Coordinate;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "explore-local")]
    #[command(about = "Discover historic sites, museums, parks and eateries near a place")]
    pub struct CliConfig {
        #[arg(long, help = "Search around this city instead of a position fix")]
        pub city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true, help = "Latitude of the device position fix")]
        pub lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true, help = "Longitude of the device position fix")]
        pub lon: Option<f64>,

        #[arg(long, default_value_t = DEFAULT_RADIUS_M, help = "Search radius in meters")]
        pub radius: u32,

        #[arg(long, default_value_t = DEFAULT_QUERY_TIMEOUT_SECS, help = "Server-side timeout hint for the spatial query")]
        pub query_timeout: u32,

        #[arg(long, default_value = nominatim::DEFAULT_ENDPOINT)]
        pub geocoder_endpoint: String,

        #[arg(long, default_value = overpass::DEFAULT_ENDPOINT)]
        pub geodata_endpoint: String,

        #[arg(long, default_value = wikipedia::DEFAULT_ENDPOINT)]
        pub knowledge_endpoint: String,

        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        pub user_agent: String,

        #[arg(long, help = "Client-side timeout for each HTTP request")]
        pub request_timeout_secs: Option<u64>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        pub format: OutputFormat,

        #[arg(long, help = "TOML file with service and search settings")]
        pub config: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// The position fix passed on the command line, if any.
        pub fn device_fix(&self) -> Result<Option<Coordinate>> {
            match self.lat {
                None => Ok(None),
                Some(lat) => {
                    let lon = validation::validate_required_field("lon", &self.lon)?;
                    Coordinate::new(lat, *lon).map(Some)
                }
            }
        }
    }

    impl ConfigProvider for CliConfig {
        fn geocoder_endpoint(&self) -> &str {
            &self.geocoder_endpoint
        }

        fn geodata_endpoint(&self) -> &str {
            &self.geodata_endpoint
        }

        fn knowledge_endpoint(&self) -> &str {
            &self.knowledge_endpoint
        }

        fn user_agent(&self) -> &str {
            &self.user_agent
        }

        fn search_radius_m(&self) -> u32 {
            self.radius
        }

        fn query_timeout_secs(&self) -> u32 {
            self.query_timeout
        }

        fn request_timeout(&self) -> Option<Duration> {
            self.request_timeout_secs.map(Duration::from_secs)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("geocoder_endpoint", &self.geocoder_endpoint)?;
            validation::validate_url("geodata_endpoint", &self.geodata_endpoint)?;
            validation::validate_url("knowledge_endpoint", &self.knowledge_endpoint)?;
            validation::validate_non_empty_string("user_agent", &self.user_agent)?;
            validation::validate_range("radius", self.radius, 1, super::MAX_RADIUS_M)?;
            validation::validate_range("query_timeout", self.query_timeout, 1, super::MAX_QUERY_TIMEOUT_SECS)?;
            if let Some(city) = &self.city {
                validation::validate_non_empty_string("city", city)?;
            }
            self.device_fix()?;
            Ok(())
        }
    }

}

pub(crate) const MAX_RADIUS_M: u32 = 50_000;
pub(crate) const MAX_QUERY_TIMEOUT_SECS: u32 = 3_600;
