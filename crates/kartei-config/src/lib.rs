use std::env;

use serde::{Deserialize, Serialize};

use self::anki::AnkiConfig;
use self::sources::SourcesConfig;
use self::tagger::TaggerConfig;
use self::translator::TranslatorConfig;

pub mod anki;
pub mod sources;
pub mod tagger;
pub mod translator;

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub tagger: TaggerConfig,
    pub translator: TranslatorConfig,
    pub anki: AnkiConfig,

    /// Timeout applied to every adapter call
    pub timeout_seconds: u64,
    /// Retries after a transient source failure
    pub source_retries: u32,
    /// Delay between retries, in milliseconds
    pub retry_delay_ms: u64,
}

impl Config {
    pub fn new() -> Self {
        let timeout_seconds = env::var("KARTEI_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let source_retries = env::var("KARTEI_SOURCE_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2);

        let retry_delay_ms = env::var("KARTEI_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(500);

        Config {
            sources: SourcesConfig::new(),
            tagger: TaggerConfig::new(),
            translator: TranslatorConfig::new(),
            anki: AnkiConfig::new(),

            timeout_seconds,
            source_retries,
            retry_delay_ms,
        }
    }
}
