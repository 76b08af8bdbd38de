use debate_core::PartialFailurePolicy;
use debate_core::providers::gemini::GEMINI_API_BASE;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub openai_model: String,
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub responder_max_tokens: u32,
    pub agent_timeout: Option<Duration>,
    pub partial_failure_policy: PartialFailurePolicy,
    pub log_level: Level,
    pub prompts_path: PathBuf,
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn parsed<T>(name: &str, default: T) -> Result<T, ConfigError>
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

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address = parsed("BIND_ADDRESS", SocketAddr::from(([0, 0, 0, 0], 5000)))?;

        let openai_api_key = required("OPENAI_API_KEY")?;
        let gemini_api_key = required("GEMINI_API_KEY")?;

        let openai_api_base = std::env::var("OPENAI_API_BASE")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let gemini_api_base =
            std::env::var("GEMINI_API_BASE").unwrap_or_else(|_| GEMINI_API_BASE.to_string());
        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());

        let responder_max_tokens = parsed("RESPONDER_MAX_TOKENS", 150u32)?;
        if responder_max_tokens == 0 {
            return Err(ConfigError::InvalidValue(
                "RESPONDER_MAX_TOKENS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let agent_timeout = match std::env::var("AGENT_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("AGENT_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
                Some(Duration::from_secs(secs)).filter(|d| !d.is_zero())
            }
            Err(_) => None,
        };

        let partial_failure_policy =
            parsed("PARTIAL_FAILURE_POLICY", PartialFailurePolicy::default())?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        Ok(Self {
            bind_address,
            openai_api_key,
            openai_api_base,
            openai_model,
            gemini_api_key,
            gemini_api_base,
            gemini_model,
            responder_max_tokens,
            agent_timeout,
            partial_failure_policy,
            log_level,
            prompts_path,
        })
    }
}

/// Loads every `*.md` file in `prompts_path`, keyed by file stem.
pub fn load_prompts(prompts_path: &Path) -> std::io::Result<HashMap<String, String>> {
    let mut prompts = HashMap::new();
    for entry in std::fs::read_dir(prompts_path)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("md") {
            if let Some(key) = path.file_stem().and_then(|s| s.to_str()) {
                prompts.insert(key.to_string(), std::fs::read_to_string(&path)?);
            }
        }
    }
    Ok(prompts)
}
