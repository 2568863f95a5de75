use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Upload ceiling for `/api/prompt_initial` (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Output bound for every completion request.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-latest";

#[derive(Debug, Clone, Deserialize)]
pub struct GraderConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub anthropic: AnthropicSettings,
    pub upload: UploadSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicSettings {
    /// Not validated at startup; an empty key surfaces as a 401 on first use.
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// `None` leaves the transport default (no overall request timeout).
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub max_bytes: usize,
}

impl GraderConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        Ok(GraderConfig {
            common: common_config,
            anthropic: AnthropicSettings {
                api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
                base_url: get_env("ANTHROPIC_BASE_URL", DEFAULT_ANTHROPIC_BASE_URL),
                model: get_env("ANTHROPIC_MODEL", DEFAULT_ANTHROPIC_MODEL),
                max_tokens: parse_env("ANTHROPIC_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
                timeout_secs: match env::var("ANTHROPIC_TIMEOUT_SECS") {
                    Ok(raw) => Some(parse_value("ANTHROPIC_TIMEOUT_SECS", &raw)?),
                    Err(_) => None,
                },
            },
            upload: UploadSettings {
                max_bytes: parse_env("GRADER_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            },
        })
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e))
    })
}
