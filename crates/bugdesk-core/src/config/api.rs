//! Remote API configuration.

use serde::{Deserialize, Serialize};

/// Base URL used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration for the remote bug-tracker API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. "https://bugs.example.com".
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl ApiConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
