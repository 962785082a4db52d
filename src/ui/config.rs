//! Client configuration

/// Base URL baked in at build time, used when the runtime environment has none
const BUILD_API_BASE_URL: Option<&str> = option_env!("API_BASE_URL");

/// Client-side settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix for every API endpoint; empty means same origin
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Read `API_BASE_URL` from the process environment, then from the build
    /// environment, falling back to same-origin requests.
    pub fn from_env() -> Self {
        let url = std::env::var("API_BASE_URL")
            .ok()
            .or_else(|| BUILD_API_BASE_URL.map(str::to_string))
            .unwrap_or_default();
        Self::new(url)
    }

    /// Join the base URL and an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base_url, endpoint)
    }
}
