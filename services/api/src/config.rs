//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    pub groq_api_key: String,
    pub google_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub primary_model: String,
    pub fallback_model: String,
    pub temperature: f32,
    pub llm_timeout: Duration,
    /// Deadline for one model in the fallback chain, so a stalled primary leaves time for the next.
    pub llm_attempt_timeout: Duration,
    pub search_max_results: u32,
    /// Sessions not touched for this long are dropped from memory.
    pub session_idle_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        // --- Load API Keys ---
        let groq_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GROQ_API_KEY".to_string()))?;
        let google_api_key = std::env::var("GOOGLE_API_KEY").ok();
        let tavily_api_key = std::env::var("TAVILY_API_KEY").ok();

        // --- Load Adapter-specific Settings ---
        let primary_model = std::env::var("PRIMARY_MODEL")
            .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string());
        let fallback_model =
            std::env::var("FALLBACK_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());

        let temperature = parse_var("LLM_TEMPERATURE", 0.8_f32)?;
        let llm_timeout = Duration::from_secs(parse_var("LLM_TIMEOUT_SECS", 60_u64)?);
        let llm_attempt_timeout =
            Duration::from_secs(parse_var("LLM_ATTEMPT_TIMEOUT_SECS", 25_u64)?);
        if llm_attempt_timeout > llm_timeout {
            return Err(ConfigError::InvalidValue(
                "LLM_ATTEMPT_TIMEOUT_SECS".to_string(),
                "must not exceed LLM_TIMEOUT_SECS".to_string(),
            ));
        }
        let search_max_results = parse_var("SEARCH_MAX_RESULTS", 5_u32)?;
        let session_idle_ttl =
            Duration::from_secs(parse_var("SESSION_IDLE_TTL_SECS", 3600_u64)?);

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            groq_api_key,
            google_api_key,
            tavily_api_key,
            primary_model,
            fallback_model,
            temperature,
            llm_timeout,
            llm_attempt_timeout,
            search_max_results,
            session_idle_ttl,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
