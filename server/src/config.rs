//! Server configuration parsed from environment variables.

use std::time::Duration;

pub const APP_NAME: &str = "Debenture Loan Sales Assistant";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_MAX_MESSAGE_HISTORY: usize = 50;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub max_message_history: usize,
    pub session_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_owned(),
            max_message_history: DEFAULT_MAX_MESSAGE_HISTORY,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl ServerConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `HOST`: default `0.0.0.0`
    /// - `PORT`: default 8000
    /// - `APP_ENV`: default `development`
    /// - `MAX_MESSAGE_HISTORY`: default 50
    /// - `SESSION_TTL_SECS`: default 3600
    ///
    /// Unparseable numeric values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_or(lookup("PORT"), DEFAULT_PORT);
        let environment = lookup("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());
        let max_message_history = parse_or(lookup("MAX_MESSAGE_HISTORY"), DEFAULT_MAX_MESSAGE_HISTORY);
        let session_ttl = Duration::from_secs(parse_or(lookup("SESSION_TTL_SECS"), DEFAULT_SESSION_TTL_SECS));

        Self { host, port, environment, max_message_history, session_ttl }
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
