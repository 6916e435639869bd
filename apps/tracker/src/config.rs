use std::fmt;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_url = require_env("TRACKER_API_URL")?;
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            anyhow::bail!("TRACKER_API_URL must start with http:// or https://, got '{api_url}'");
        }

        Ok(Config {
            api_url,
            username: require_env("TRACKER_USERNAME")?,
            password: require_env("TRACKER_PASSWORD")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
