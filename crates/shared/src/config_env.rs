use std::env;

use crate::config::ConfigError;

pub(crate) type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub(crate) fn parse_u32_var(
    lookup: EnvLookup<'_>,
    key: &str,
    default: u32,
) -> Result<u32, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ConfigError::ParseInt(key.to_string())),
        None => Ok(default),
    }
}

pub(crate) fn parse_f32_var(
    lookup: EnvLookup<'_>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .parse::<f32>()
            .map_err(|_| ConfigError::ParseFloat(key.to_string())),
        None => Ok(default),
    }
}

pub(crate) fn optional_trimmed_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| non_empty_trimmed(&value))
}

pub(crate) fn non_empty_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
