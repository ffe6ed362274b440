//! Runtime configuration read from the process environment.

use log::warn;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "your-secret-key";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Root of the template tree: one folder per form, each with an optional `meta.json`.
    pub forms_dir: PathBuf,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub json_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Missing keys
    /// fall back to their defaults; present but malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("JWT_SECRET is not set, falling back to the built-in development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        Ok(Config {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: number(&lookup, "SERVER_PORT", 3000)?,
            database_path: lookup("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("checksheet.sqlite")),
            forms_dir: lookup("FORMS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("checksheet_form")),
            jwt_secret,
            session_ttl_hours: number(&lookup, "SESSION_TTL_HOURS", 24)?,
            bcrypt_cost: number(&lookup, "BCRYPT_COST", 10)?,
            json_limit_bytes: number(&lookup, "JSON_LIMIT_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
