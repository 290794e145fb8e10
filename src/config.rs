use std::env;

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Catalog API credentials and locale, resolved once at startup and handed to
/// the client at construction. Nothing reads the environment after this point.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: String,
    pub language: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            language: language.into(),
        }
    }

    /// Read credentials from the process environment. A missing key is not an
    /// error: every fetch will simply degrade to its empty-result path.
    pub fn from_env() -> Self {
        let api_key = env::var("TMDB_API_KEY").unwrap_or_default();
        let language = env::var("TMDB_LANGUAGE")
            .ok()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Self { api_key, language }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
