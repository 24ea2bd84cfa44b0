use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::interview::questions::DEFAULT_QUESTION_COUNT;

pub const DEFAULT_MODEL_NAME: &str = "microsoft/Phi-3-mini-4k-instruct";
const DEFAULT_LLM_SERVER_URL: &str = "http://127.0.0.1:8081";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base URL of the llama.cpp-compatible inference server.
    pub llm_server_url: String,
    pub model_name: String,
    /// `None` means generations may run indefinitely.
    pub llm_timeout: Option<Duration>,
    pub model_warmup: bool,
    pub question_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            llm_server_url: DEFAULT_LLM_SERVER_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            llm_timeout: None,
            model_warmup: true,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            llm_server_url: optional_env("LLM_SERVER_URL").unwrap_or(defaults.llm_server_url),
            model_name: optional_env("MODEL_NAME").unwrap_or(defaults.model_name),
            llm_timeout: optional_env("LLM_TIMEOUT_SECS")
                .map(|v| {
                    v.parse::<u64>()
                        .map(Duration::from_secs)
                        .context("LLM_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?,
            model_warmup: optional_env("MODEL_WARMUP")
                .map(|v| parse_flag(&v).context("MODEL_WARMUP must be true or false"))
                .transpose()?
                .unwrap_or(defaults.model_warmup),
            question_count: parse_env("QUESTION_COUNT", defaults.question_count)?,
        })
    }
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{value}'")),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognized flag value '{other}'"),
    }
}
