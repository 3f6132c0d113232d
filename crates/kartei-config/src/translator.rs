use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    false
}

fn default_provider() -> String {
    "lingva".to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_api_url() -> String {
    "https://lingva.ml/api/v1".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Language the definitions are translated into
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let mut config = Self::default();
        if let Ok(target) = std::env::var("KARTEI_TRANSLATION_LANGUAGE") {
            config.enabled = true;
            config.target_lang = target;
        }
        if let Ok(url) = std::env::var("KARTEI_TRANSLATOR_URL") {
            config.api_url = url;
        }
        config
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            target_lang: default_target_lang(),
            api_url: default_api_url(),
        }
    }
}
