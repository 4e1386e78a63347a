//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_LLM_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_LLM_MODEL: &str = "deepseek/deepseek-chat";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Where generated tests are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreKind {
    /// One JSON file per test under `Config::tests_dir`.
    File,
    /// Process memory only; lost on restart.
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub tests_dir: PathBuf,
    pub public_dir: PathBuf,
    pub store: StoreKind,
    pub llm_api_key: String,
    pub llm_api_base: String,
    pub llm_model: String,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Settings ---
        let tests_dir = lookup("TESTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./tests_data"));
        let public_dir = lookup("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./public"));
        let store = match lookup("TEST_STORE").as_deref().unwrap_or("file") {
            "file" => StoreKind::File,
            "memory" => StoreKind::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "TEST_STORE".to_string(),
                    format!("'{}' is not one of 'file' or 'memory'", other),
                ))
            }
        };

        // --- Language Model Settings ---
        let llm_api_key = lookup("LLM_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("LLM_API_KEY".to_string()))?;
        let llm_api_base =
            lookup("LLM_API_BASE").unwrap_or_else(|| DEFAULT_LLM_API_BASE.to_string());
        let llm_model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());

        // --- Retry Policy ---
        let max_attempts = parse_or("GENERATION_MAX_ATTEMPTS", &lookup, 3u32)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "GENERATION_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let retry_delay =
            Duration::from_millis(parse_or("GENERATION_RETRY_DELAY_MS", &lookup, 1000u64)?);

        Ok(Self {
            bind_address,
            log_level,
            tests_dir,
            public_dir,
            store,
            llm_api_key,
            llm_api_base,
            llm_model,
            max_attempts,
            retry_delay,
        })
    }
}

fn parse_or<T, F>(name: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("LLM_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.llm_api_base, DEFAULT_LLM_API_BASE);
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("LLM_API_KEY".to_string()));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk-test"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("TEST_STORE", "memory"),
            ("GENERATION_MAX_ATTEMPTS", "5"),
            ("GENERATION_RETRY_DELAY_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn rejects_bad_values() {
        let err = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk-test"),
            ("GENERATION_MAX_ATTEMPTS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "GENERATION_MAX_ATTEMPTS"));

        let err = Config::from_lookup(lookup_from(&[
            ("LLM_API_KEY", "sk-test"),
            ("TEST_STORE", "postgres"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "TEST_STORE"));
    }
}
