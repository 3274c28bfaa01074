use std::env;

use tracing::warn;

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_TMDB_LANGUAGE: &str = "en-US";
pub const DEFAULT_INTENT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_RECAP_MODEL: &str = "openai/gpt-4o";
pub const DEFAULT_PORT: u16 = 3000;

/// Runtime configuration, read from the environment.
///
/// API keys are optional here: a missing key surfaces as
/// [`RecapError::NotConfigured`](crate::RecapError::NotConfigured) on the first
/// request that needs it, so the service can still start and report health.
#[derive(Debug, Clone)]
pub struct RecapConfig {
    pub tmdb_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub intent_model: String,
    pub recap_model: String,
    pub port: u16,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            openrouter_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            tmdb_language: DEFAULT_TMDB_LANGUAGE.to_string(),
            intent_model: DEFAULT_INTENT_MODEL.to_string(),
            recap_model: DEFAULT_RECAP_MODEL.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl RecapConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!(port = %raw, "Invalid PORT, using {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => defaults.port,
        };

        Self {
            tmdb_api_key: non_empty("TMDB_API_KEY"),
            openrouter_api_key: non_empty("OPENROUTER_API_KEY"),
            tmdb_base_url: non_empty("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            tmdb_language: non_empty("TMDB_LANGUAGE").unwrap_or(defaults.tmdb_language),
            intent_model: non_empty("INTENT_MODEL").unwrap_or(defaults.intent_model),
            recap_model: non_empty("RECAP_MODEL").unwrap_or(defaults.recap_model),
            port,
        }
    }

    /// Names of the credentials that are not set.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.tmdb_api_key.is_none() {
            missing.push("TMDB_API_KEY");
        }
        if self.openrouter_api_key.is_none() {
            missing.push("OPENROUTER_API_KEY");
        }
        missing
    }
}
