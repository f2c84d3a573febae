use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the hosted Appwrite project
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Appwrite API endpoint, including the version path (e.g. "https://cloud.appwrite.io/v1")
    pub endpoint: String,
    /// Appwrite project identifier
    pub project_id: String,
    /// Database holding the recipes collection
    pub database_id: String,
    /// Collection of recipe documents
    pub recipes_collection_id: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of recipes fetched for the listing view
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
    /// Number of recipes fetched for the home view
    #[serde(default = "default_featured_limit")]
    pub featured_limit: u32,
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_list_limit() -> u32 {
    20
}

fn default_featured_limit() -> u32 {
    4
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with SAVORY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: SAVORY__PROJECT_ID
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the lookup order.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("SAVORY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
