use std::str::FromStr;

use anyhow::{Context, Result};

use crate::matching::config::MatchingConfig;

/// Application configuration loaded from environment variables.
/// Every variable is optional; a set but malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub matching: MatchingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = MatchingConfig::default();
        let (ngram_min, ngram_max) = defaults.ngram_span;

        let matching = MatchingConfig {
            max_vocabulary_features: optional_env(
                &lookup,
                "MAX_VOCABULARY_FEATURES",
                defaults.max_vocabulary_features,
            )?,
            ngram_span: (
                optional_env(&lookup, "NGRAM_MIN", ngram_min)?,
                optional_env(&lookup, "NGRAM_MAX", ngram_max)?,
            ),
            min_document_frequency: optional_env(
                &lookup,
                "MIN_DOCUMENT_FREQUENCY",
                defaults.min_document_frequency,
            )?,
            similarity_threshold: optional_env(
                &lookup,
                "SIMILARITY_THRESHOLD",
                defaults.similarity_threshold,
            )?,
            skill_weight: optional_env(&lookup, "SKILL_WEIGHT", defaults.skill_weight)?,
            text_weight: optional_env(&lookup, "TEXT_WEIGHT", defaults.text_weight)?,
            experience_weight: optional_env(
                &lookup,
                "EXPERIENCE_WEIGHT",
                defaults.experience_weight,
            )?,
            education_weight: optional_env(&lookup, "EDUCATION_WEIGHT", defaults.education_weight)?,
            top_n_default: optional_env(&lookup, "TOP_N_DEFAULT", defaults.top_n_default)?,
        };
        matching
            .validate()
            .context("Matching configuration from environment is invalid")?;

        Ok(Config {
            port: optional_env(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            matching,
        })
    }
}

fn optional_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
