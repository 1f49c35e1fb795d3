//! Configuration module

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Base URL of the inspection-data API
    pub inspection_api_url: String,

    /// Upstream request timeout in seconds
    pub inspection_api_timeout_seconds: u64,

    /// Maximum number of records pulled per read pipeline
    pub fetch_limit: u32,

    /// Upper bound on objects in one comparison request
    pub compare_max_objects: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            inspection_api_url: "http://localhost:8000/api".to_string(),
            inspection_api_timeout_seconds: 10,
            fetch_limit: 1000,
            compare_max_objects: 4,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            inspection_api_url: env::var("INSPECTION_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.inspection_api_url),

            inspection_api_timeout_seconds: env::var("INSPECTION_API_TIMEOUT_SECONDS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.inspection_api_timeout_seconds),

            fetch_limit: env::var("FETCH_LIMIT")
                .ok()
                .and_then(|l| l.parse().ok())
                .filter(|l| *l > 0)
                .unwrap_or(defaults.fetch_limit),

            compare_max_objects: env::var("COMPARE_MAX_OBJECTS")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.compare_max_objects),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
