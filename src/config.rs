use std::collections::HashSet;
use std::env;
use std::time::Duration;

use crate::error::DispatchError;

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub expiry_threshold_secs: u64,
    pub sweep_interval_secs: u64,
    pub allowed_categories: HashSet<String>,
    pub matching_strategy: String,
    pub event_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            expiry_threshold_secs: 1800,
            sweep_interval_secs: 30,
            allowed_categories: ["FOOD", "ELECTRONICS", "BOOKS", "DOCUMENTS", "CLOTHING"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            matching_strategy: "first_available".to_string(),
            event_buffer_size: 1024,
        }
    }
}

impl Config {
    /// Loaded once at startup; components receive the values they need
    /// through their constructors.
    pub fn from_env() -> Result<Self, DispatchError> {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            expiry_threshold_secs: parse_or_default(
                "EXPIRY_THRESHOLD_SECS",
                defaults.expiry_threshold_secs,
            )?,
            sweep_interval_secs: parse_or_default(
                "SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            )?,
            allowed_categories: match env::var("ALLOWED_CATEGORIES") {
                Ok(raw) => parse_categories(&raw)?,
                Err(_) => defaults.allowed_categories,
            },
            matching_strategy: env::var("MATCHING_STRATEGY")
                .unwrap_or(defaults.matching_strategy),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", defaults.event_buffer_size)?,
        })
    }

    pub fn expiry_threshold(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.expiry_threshold_secs as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn parse_categories(raw: &str) -> Result<HashSet<String>, DispatchError> {
    let categories: HashSet<String> = raw
        .split(',')
        .map(|category| category.trim().to_uppercase())
        .filter(|category| !category.is_empty())
        .collect();

    if categories.is_empty() {
        return Err(DispatchError::Config(
            "ALLOWED_CATEGORIES must name at least one category".to_string(),
        ));
    }

    Ok(categories)
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, DispatchError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| DispatchError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
