use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::render::ExtractedTextPolicy;

const DEFAULT_ANALYZE_URL: &str = "http://localhost:5000/analyze/";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub analyze_url: String,
    pub analyze_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub extracted_text_policy: ExtractedTextPolicy,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let analyze_url = var("ANALYZE_URL", DEFAULT_ANALYZE_URL);
        if !(analyze_url.starts_with("http://") || analyze_url.starts_with("https://")) {
            bail!("ANALYZE_URL must be an http(s) URL, got '{analyze_url}'");
        }

        let timeout_secs = var("ANALYZE_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .context("ANALYZE_TIMEOUT_SECS must be a whole number of seconds")?;
        if timeout_secs == 0 {
            bail!("ANALYZE_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            analyze_url,
            analyze_timeout: Duration::from_secs(timeout_secs),
            host: var("HOST", "127.0.0.1"),
            port: var("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: var("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            extracted_text_policy: var("EXTRACTED_TEXT_POLICY", "non-empty").parse()?,
            rust_log: var("RUST_LOG", "info"),
        })
    }
}
