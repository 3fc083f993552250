use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub analyze_function_url: String,
    pub analyze_function_key: Option<String>,
    /// No timeout is applied to the remote call unless this is set.
    pub analyze_timeout: Option<Duration>,
    pub session_idle: Duration,
    pub port: u16,
    pub rust_log: String,
}

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let analyze_function_url = lookup("ANALYZE_FUNCTION_URL")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'ANALYZE_FUNCTION_URL' is not set")?;

        let analyze_timeout = lookup("ANALYZE_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>()
                    .context("ANALYZE_TIMEOUT_SECS must be a whole number of seconds")
            })
            .transpose()?
            .map(Duration::from_secs);

        let session_idle_minutes = match lookup("SESSION_IDLE_MINUTES") {
            Some(v) => v
                .parse::<u64>()
                .context("SESSION_IDLE_MINUTES must be a whole number of minutes")?,
            None => DEFAULT_SESSION_IDLE_MINUTES,
        };

        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            analyze_function_url,
            analyze_function_key: lookup("ANALYZE_FUNCTION_KEY").filter(|v| !v.is_empty()),
            analyze_timeout,
            session_idle: Duration::from_secs(session_idle_minutes * 60),
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
