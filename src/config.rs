//! Configuration management for the PDF to Markdown server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::parser::ResultType;

/// Default LlamaCloud API root
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub parser: ParserConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory for per-request scratch copies of uploads.
    /// `None` uses the platform temp dir.
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub api_key: String,
    pub base_url: String,
    pub result_type: ResultType,
    pub language: String,
    /// Delay between job status polls
    pub check_interval: Duration,
    /// Give up on a parsing job after this long
    pub max_timeout: Duration,
    /// Split the result on the page separator, one segment per page
    pub split_by_page: bool,
    pub verbose: bool,
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LLAMA_CLOUD_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            scratch_dir: None,
        }
    }
}

impl ParserConfig {
    /// Parser settings with every knob at its default
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        ParserConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            result_type: ResultType::Markdown,
            language: "en".to_string(),
            check_interval: Duration::from_secs(1),
            max_timeout: Duration::from_secs(2000),
            split_by_page: true,
            verbose: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = var("LLAMA_CLOUD_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let defaults = ParserConfig::with_api_key(api_key);
        let server_defaults = ServerConfig::default();

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(server_defaults.host),
                port: parse_or(&var, "SERVER_PORT", server_defaults.port)?,
                scratch_dir: var("SCRATCH_DIR")
                    .filter(|d| !d.is_empty())
                    .map(PathBuf::from),
            },
            parser: ParserConfig {
                base_url: var("LLAMA_CLOUD_BASE_URL")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.base_url),
                result_type: parse_or(&var, "LLAMA_PARSE_RESULT_TYPE", defaults.result_type)?,
                language: var("LLAMA_PARSE_LANGUAGE").unwrap_or(defaults.language),
                check_interval: parse_or(&var, "LLAMA_PARSE_CHECK_INTERVAL_SECS", 1u64)
                    .map(Duration::from_secs)?,
                max_timeout: parse_or(&var, "LLAMA_PARSE_MAX_TIMEOUT_SECS", 2000u64)
                    .map(Duration::from_secs)?,
                split_by_page: parse_or(&var, "LLAMA_PARSE_SPLIT_BY_PAGE", defaults.split_by_page)?,
                verbose: parse_or(&var, "LLAMA_PARSE_VERBOSE", defaults.verbose)?,
                api_key: defaults.api_key,
            },
        })
    }
}

fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
