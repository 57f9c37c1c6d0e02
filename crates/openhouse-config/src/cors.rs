//! Origins allowed to call the API from a browser.
//!
//! # Environment Variables
//!
//! - `ALLOWED_ORIGINS`: comma separated origins of the registration and
//!   scanner frontends, or `*` to accept any origin
//!   (default: `http://localhost:3000,http://localhost:5173`)
//!
//! Browsers send `Origin` without a trailing slash, so configured values are
//! stored without one.

use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let raw = env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string());
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }

    /// True when `*` is configured. Credentials are not sent in that mode.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::parse(DEFAULT_ORIGINS)
    }
}
