use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::{game::scorer::DEFAULT_FULL_RACK_BONUS, models::Language};

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub dictionary_path: String,
    pub language: Language,
    /// Quiet period after the last edit before a preview validation runs
    pub validation_debounce: Duration,
    pub lookup_timeout: Duration,
    pub full_rack_bonus: u32,
    /// Capacity of the session event stream
    pub event_buffer: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dictionary_path: "./dictionary.txt".to_string(),
            language: Language::En,
            validation_debounce: Duration::from_millis(600),
            lookup_timeout: Duration::from_millis(5000),
            full_rack_bonus: DEFAULT_FULL_RACK_BONUS,
            event_buffer: 64,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let dictionary_path =
            env::var("DICTIONARY_PATH").unwrap_or_else(|_| defaults.dictionary_path.clone());

        let language = env::var("GAME_LANGUAGE")
            .map(|tag| Language::from_tag(&tag))
            .unwrap_or(defaults.language);

        let validation_debounce = Duration::from_millis(
            env::var("VALIDATION_DEBOUNCE_MS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .context("VALIDATION_DEBOUNCE_MS must be a number")?,
        );

        let lookup_timeout = Duration::from_millis(
            env::var("LOOKUP_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("LOOKUP_TIMEOUT_MS must be a number")?,
        );

        let full_rack_bonus = env::var("FULL_RACK_BONUS")
            .unwrap_or_else(|_| DEFAULT_FULL_RACK_BONUS.to_string())
            .parse()
            .context("FULL_RACK_BONUS must be a number")?;

        let event_buffer = env::var("EVENT_BUFFER")
            .unwrap_or_else(|_| "64".to_string())
            .parse()
            .unwrap_or(defaults.event_buffer);

        Ok(EngineConfig {
            dictionary_path,
            language,
            validation_debounce,
            lookup_timeout,
            full_rack_bonus,
            event_buffer,
        })
    }
}
