use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings for the client and the search coordinator
#[derive(Debug, Deserialize, Clone)]
pub struct BrowserConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Quiet period after the last keystroke before a search is committed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum trimmed query length that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    /// Category shown when nothing else is selected
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            default_category: default_category(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    crate::client::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    2
}

fn default_category() -> String {
    "Beef".to_string()
}

fn default_user_agent() -> String {
    concat!("mealdb-browser/", env!("CARGO_PKG_VERSION")).to_string()
}

impl BrowserConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALDB__ prefix
    /// 2. mealdb.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALDB__DEBOUNCE_MS
    pub fn load() -> Result<Self, ConfigError> {
        load_config(Config::builder().add_source(File::with_name("mealdb").required(false)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn load_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<BrowserConfig, ConfigError> {
    let settings = builder
        .add_source(
            Environment::with_prefix("MEALDB")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        let config = BrowserConfig::default();
        assert_eq!(config.base_url, "https://www.themealdb.com/api/json/v1/1");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.default_category, "Beef");
        assert!(config.user_agent.starts_with("mealdb-browser/"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let builder = Config::builder().add_source(File::from_str(
            r#"
            debounce_ms = 250
            default_category = "Seafood"
            "#,
            FileFormat::Toml,
        ));

        let config = load_config(builder).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.default_category, "Seafood");
        assert_eq!(config.timeout, 10);
        assert_eq!(config.min_query_len, 2);
    }

    #[test]
    fn test_load_without_file() {
        // No mealdb.toml next to the tests; defaults fill every field
        let result = BrowserConfig::load();
        assert!(result.is_ok());
    }
}
