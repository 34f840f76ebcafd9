use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ExploreError, Result};
use reqwest::Client;

pub const DEFAULT_USER_AGENT: &str = concat!("explore-local/", env!("CARGO_PKG_VERSION"));

/// One client shared by every service adapter. Public OSM endpoints reject
/// requests without an identifying user agent.
pub fn build_client(config: &dyn ConfigProvider) -> Result<Client> {
    let mut builder = Client::builder().user_agent(config.user_agent());

    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build().map_err(|e| ExploreError::ConfigError {
        message: format!("failed to build HTTP client: {}", e),
    })
}
