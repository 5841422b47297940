use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::config_env::{EnvLookup, optional_trimmed_env, parse_f32_var, parse_u32_var};

pub const DEFAULT_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_SECRETS_FILE: &str = ".secrets.env";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

pub const CHATBOT_TEMPERATURE: f32 = 0.2;
pub const CHATBOT_MAX_TOKENS: u32 = 1200;
pub const EMAIL_TEMPERATURE: f32 = 0.3;
pub const EMAIL_MAX_TOKENS: u32 = 900;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Per-feature generation defaults applied when a caller leaves a knob unset.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDefaults {
    pub model: String,
    pub chatbot: GenerationSettings,
    pub email: GenerationSettings,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            chatbot: GenerationSettings {
                temperature: CHATBOT_TEMPERATURE,
                max_tokens: CHATBOT_MAX_TOKENS,
            },
            email: GenerationSettings {
                temperature: EMAIL_TEMPERATURE,
                max_tokens: EMAIL_MAX_TOKENS,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub chat_completions_url: String,
    pub api_key_env: String,
    pub secrets_file: PathBuf,
    pub defaults: GenerationDefaults,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            chat_completions_url: DEFAULT_CHAT_COMPLETIONS_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            secrets_file: PathBuf::from(DEFAULT_SECRETS_FILE),
            defaults: GenerationDefaults::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub assistant: AssistantConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid integer in env var {0}")]
    ParseInt(String),
    #[error("invalid number in env var {0}")]
    ParseFloat(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Loads `.env` from the working directory; a missing file is not an error.
pub fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::InvalidConfiguration(format!(
            "failed to load .env: {err}"
        ))),
    }
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&optional_trimmed_env)
    }

    pub(crate) fn from_lookup(lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let chat_completions_url = lookup("GROQ_CHAT_COMPLETIONS_URL")
            .unwrap_or_else(|| DEFAULT_CHAT_COMPLETIONS_URL.to_string());
        validate_completions_url(&chat_completions_url)?;

        let defaults = GenerationDefaults {
            model: lookup("ASSISTANT_DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            chatbot: GenerationSettings {
                temperature: parse_f32_var(
                    lookup,
                    "ASSISTANT_CHATBOT_TEMPERATURE",
                    CHATBOT_TEMPERATURE,
                )?,
                max_tokens: parse_u32_var(
                    lookup,
                    "ASSISTANT_CHATBOT_MAX_TOKENS",
                    CHATBOT_MAX_TOKENS,
                )?,
            },
            email: GenerationSettings {
                temperature: parse_f32_var(
                    lookup,
                    "ASSISTANT_EMAIL_TEMPERATURE",
                    EMAIL_TEMPERATURE,
                )?,
                max_tokens: parse_u32_var(lookup, "ASSISTANT_EMAIL_MAX_TOKENS", EMAIL_MAX_TOKENS)?,
            },
        };
        validate_settings("ASSISTANT_CHATBOT", defaults.chatbot)?;
        validate_settings("ASSISTANT_EMAIL", defaults.email)?;

        Ok(Self {
            chat_completions_url,
            api_key_env: lookup("ASSISTANT_API_KEY_ENV")
                .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
            secrets_file: lookup("ASSISTANT_SECRETS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRETS_FILE)),
            defaults,
        })
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: optional_trimmed_env("API_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            assistant: AssistantConfig::from_env()?,
        })
    }
}

fn validate_completions_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(raw).map_err(|err| {
        ConfigError::InvalidConfiguration(format!("GROQ_CHAT_COMPLETIONS_URL is invalid: {err}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidConfiguration(
            "GROQ_CHAT_COMPLETIONS_URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

fn validate_settings(prefix: &str, settings: GenerationSettings) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&settings.temperature) {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{prefix}_TEMPERATURE must be between 0.0 and 1.0"
        )));
    }
    if settings.max_tokens == 0 {
        return Err(ConfigError::InvalidConfiguration(format!(
            "{prefix}_MAX_TOKENS must be greater than zero"
        )));
    }
    Ok(())
}
