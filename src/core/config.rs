//! Mock server configuration from environment variables.
//!
//! Load configuration using `Config::from_env()` after calling `dotenvy::dotenv()`.

use crate::core::auth::jwt::TOKEN_EXPIRATION_MINUTES;

/// Signing secret used when `JWT_SECRET` is not set
pub const DEV_JWT_SECRET: &str = "your-secret-key";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Secret key for signing session tokens
    pub jwt_secret: Option<String>,

    /// Session token lifetime in minutes
    pub jwt_expiration_minutes: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any variable source; unparsable values fall
    /// back to the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            jwt_secret: lookup("JWT_SECRET").filter(|s| !s.is_empty()),
            jwt_expiration_minutes: lookup("JWT_EXPIRATION_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(TOKEN_EXPIRATION_MINUTES),
        }
    }

    /// Check if a signing secret is configured
    pub fn has_jwt_secret(&self) -> bool {
        self.jwt_secret.is_some()
    }

    /// Signing secret, falling back to the development default
    pub fn jwt_secret_or_default(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEV_JWT_SECRET)
    }

    /// Address string for the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: None,
            jwt_expiration_minutes: TOKEN_EXPIRATION_MINUTES,
        }
    }
}
