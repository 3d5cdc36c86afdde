use std::time::Duration;

use thiserror::Error;

pub const API_URL_ENV: &str = "TUNESCOUT_API_URL";
pub const COUNTRY_ENV: &str = "TUNESCOUT_COUNTRY";
pub const MEDIA_ENV: &str = "TUNESCOUT_MEDIA";
pub const PAGE_SIZE_ENV: &str = "TUNESCOUT_PAGE_SIZE";
pub const TICK_MS_ENV: &str = "TUNESCOUT_TICK_MS";
pub const TIMEOUT_SECS_ENV: &str = "TUNESCOUT_TIMEOUT_SECS";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub country: String,
    pub media: String,
    pub page_size: u32,
    pub tick_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://itunes.apple.com/search".to_string(),
            country: "MX".to_string(),
            media: "music".to_string(),
            page_size: 50,
            tick_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(15),
        }
    }
}

impl Config {
    /// Reads settings from the process environment. Call after `dotenv` so
    /// values from a `.env` file are visible.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to the
    /// defaults for anything missing or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_ENV) {
            config.api_url = url;
        }
        if let Some(country) = get(COUNTRY_ENV) {
            config.country = country.trim().to_uppercase();
        }
        if let Some(media) = get(MEDIA_ENV) {
            config.media = media;
        }
        if let Some(raw) = get(PAGE_SIZE_ENV) {
            config.page_size = parse_positive(PAGE_SIZE_ENV, &raw)? as u32;
        }
        if let Some(raw) = get(TICK_MS_ENV) {
            config.tick_interval = Duration::from_millis(parse_positive(TICK_MS_ENV, &raw)?);
        }
        if let Some(raw) = get(TIMEOUT_SECS_ENV) {
            config.request_timeout = Duration::from_secs(parse_positive(TIMEOUT_SECS_ENV, &raw)?);
        }

        Ok(config)
    }
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let value = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid {
            key,
            value: raw.to_string(),
        })?;

    if value == 0 {
        return Err(ConfigError::Zero(key));
    }

    Ok(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.page_size, 50);
        assert_eq!(config.country, "MX");
        assert_eq!(config.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (COUNTRY_ENV, " us "),
            (PAGE_SIZE_ENV, "25"),
            (TICK_MS_ENV, "500"),
            (API_URL_ENV, "http://localhost:8080/search"),
        ]))
        .unwrap();

        assert_eq!(config.country, "US");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.tick_interval, Duration::from_millis(500));
        assert_eq!(config.api_url, "http://localhost:8080/search");
        assert_eq!(config.media, "music");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[(PAGE_SIZE_ENV, "  ")])).unwrap();
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = Config::from_lookup(lookup(&[(PAGE_SIZE_ENV, "0")])).unwrap_err();
        assert_eq!(err, ConfigError::Zero(PAGE_SIZE_ENV));
    }

    #[test]
    fn garbage_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[(TICK_MS_ENV, "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key, .. } if key == TICK_MS_ENV));
    }
}
