use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub app_name: String,
    pub deployment: String,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load from .env file if available

        let db_url = match env::var("DB_URL") {
            Ok(url) => url,
            Err(_) => format!(
                "{}://{}:{}@{}:{}/{}",
                env::var("DB_PREFIX").unwrap_or_else(|_| "postgresql".to_string()),
                required("DB_USER")?,
                required("DB_PASSWORD")?,
                required("DB_HOST")?,
                env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string()),
                required("DB_NAME")?,
            ),
        };

        let max_upload_mb: usize = match env::var("MAX_UPLOAD_MB") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("MAX_UPLOAD_MB must be a whole number, got '{value}'"))?,
            Err(_) => 30,
        };

        Ok(Config {
            db_url,
            app_name: required("APP_NAME")?,
            deployment: required("DEPLOYMENT")
                .context("DEPLOYMENT can be local, dev, stage, or prod")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            db_url: "sqlite::memory:".to_string(),
            app_name: "timetable-api-test".to_string(),
            deployment: "test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            max_upload_bytes: 30 * 1024 * 1024,
        }
    }
}
