use std::env;

use serde::{Deserialize, Serialize};

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnkiConfig {
    /// Enable Anki integration
    pub enabled: bool,
    /// AnkiConnect URL
    pub url: String,
    /// Default deck name
    pub deck: String,
    /// Note model name
    pub model: String,
}

impl AnkiConfig {
    pub fn new() -> Self {
        let url =
            env::var("KARTEI_ANKI_URL").unwrap_or_else(|_| "http://localhost:8765".to_string());
        let deck = env::var("KARTEI_ANKI_DECK").unwrap_or_else(|_| "Vocabulary".to_string());
        let model = env::var("KARTEI_ANKI_MODEL").unwrap_or_else(|_| "Kartei".to_string());

        Self {
            enabled: true,
            url,
            deck,
            model,
        }
    }
}
