use anyhow::{bail, Context, Result};

use crate::scoring::DEFAULT_BUCKET_COUNT;

/// Runtime configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub email: String,
    pub password: String,
    pub bucket_count: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: std::env::var("RANKER_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            email: require_env("RANKER_EMAIL")?,
            password: require_env("RANKER_PASSWORD")?,
            bucket_count: parse_bucket_count(std::env::var("RANKER_BUCKETS").ok().as_deref())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_bucket_count(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_BUCKET_COUNT);
    };
    let count = raw
        .trim()
        .parse::<usize>()
        .context("RANKER_BUCKETS must be a positive integer")?;
    if count == 0 {
        bail!("RANKER_BUCKETS must be a positive integer");
    }
    Ok(count)
}
