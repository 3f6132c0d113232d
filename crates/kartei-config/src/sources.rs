use serde::{Deserialize, Serialize};

fn default_english_url() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
}

fn default_german_url() -> String {
    "https://api.duden-api.dev/v1/entries".to_string()
}

/// Per-language lexical source endpoints. Each adapter owns its transport
/// and schema; only the base URLs are shared configuration.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SourcesConfig {
    #[serde(default = "default_english_url")]
    pub english_url: String,
    #[serde(default = "default_german_url")]
    pub german_url: String,
}

impl SourcesConfig {
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("KARTEI_ENGLISH_SOURCE_URL") {
            config.english_url = url;
        }
        if let Ok(url) = std::env::var("KARTEI_GERMAN_SOURCE_URL") {
            config.german_url = url;
        }
        config
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            english_url: default_english_url(),
            german_url: default_german_url(),
        }
    }
}
