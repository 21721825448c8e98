use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use storage::services::recompute::RecomputeConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Base URL of the course catalog service.
    pub golf_data_host: String,
    pub recompute: RecomputeConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            golf_data_host: std::env::var("GOLF_DATA_HOST")
                .context("Cannot load GOLF_DATA_HOST env variable")?,
            recompute: RecomputeConfig {
                workers: env_or("RECOMPUTE_WORKERS", 4)?,
                queue_capacity: env_or("RECOMPUTE_QUEUE_CAPACITY", 256)?,
                max_attempts: env_or("RECOMPUTE_MAX_ATTEMPTS", 3)?,
                retry_backoff: Duration::from_millis(200),
            },
        })
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a number", name)),
        Err(_) => Ok(default),
    }
}
