use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use kartei_core::error::LookupError;
use kartei_core::language::Language;
use kartei_core::raw::{RawLexicalData, RawSense};
use kartei_core::traits::{LexicalSource, SourceMetadata};

/// Free Dictionary API adapter (`GET {base}/{lemma}`).
///
/// The API answers with a list of entries; like the upstream site we use
/// the first one. Senses are the meanings' definitions, flattened in
/// response order.
pub struct EnglishSource {
    client: reqwest::Client,
    base_url: String,
}

impl EnglishSource {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LexicalSource for EnglishSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "dictionaryapi.dev".to_string(),
            language: Language::English,
        }
    }

    async fn lookup(&self, lemma: &str) -> Result<RawLexicalData, LookupError> {
        let url = format!("{}/{}", self.base_url, lemma);
        tracing::debug!(%url, "fetching dictionary entry");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::Network(e.to_string())
            }
        })?;

        match response.status().as_u16() {
            404 => return Err(LookupError::NotFound),
            429 => return Err(LookupError::RateLimited),
            status if status >= 500 => {
                return Err(LookupError::Network(format!("HTTP {status}")));
            }
            _ => {}
        }

        let entries: Vec<Entry> = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        let Some(entry) = entries.into_iter().next() else {
            return Err(LookupError::NotFound);
        };

        Ok(map_entry(entry))
    }
}

fn map_entry(entry: Entry) -> RawLexicalData {
    let ipa = entry
        .phonetic
        .clone()
        .filter(|p| !p.trim().is_empty())
        .or_else(|| {
            entry
                .phonetics
                .iter()
                .filter_map(|p| p.text.clone())
                .find(|t| !t.trim().is_empty())
        });

    let mut senses = Vec::new();
    let mut synonyms = Vec::new();
    let mut antonyms = Vec::new();
    for meaning in entry.meanings {
        // meaning-level synonym/antonym lists are entry-wide hints
        synonyms.extend(meaning.synonyms);
        antonyms.extend(meaning.antonyms);

        for definition in meaning.definitions {
            senses.push(RawSense {
                definition: definition.definition,
                example: definition.example,
                pos: meaning.part_of_speech.clone(),
                ipa: None,
                synonyms: definition.synonyms,
                antonyms: definition.antonyms,
            });
        }
    }

    RawLexicalData {
        senses,
        ipa,
        synonyms,
        antonyms,
        article: None,
        plural: None,
        source_url: entry.source_urls.into_iter().next(),
    }
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<Phonetic>,
    #[serde(default)]
    meanings: Vec<Meaning>,
    #[serde(rename = "sourceUrls", default)]
    source_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Phonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    definitions: Vec<Definition>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    #[serde(default)]
    definition: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn source(server: &MockServer) -> EnglishSource {
        EnglishSource::new(server.base_url(), Duration::from_secs(2))
    }

    fn sample_body() -> serde_json::Value {
        serde_json::json!([{
            "word": "run",
            "phonetic": "/rʌn/",
            "phonetics": [{ "text": "/ɹʌn/", "audio": "" }],
            "meanings": [
                {
                    "partOfSpeech": "verb",
                    "definitions": [
                        { "definition": "to move swiftly", "example": "he runs fast", "synonyms": ["sprint"], "antonyms": [] },
                        { "definition": "to operate", "synonyms": [], "antonyms": ["halt"] }
                    ],
                    "synonyms": ["dash"],
                    "antonyms": []
                },
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        { "definition": "an act of running", "synonyms": [], "antonyms": [] }
                    ],
                    "synonyms": [],
                    "antonyms": []
                }
            ],
            "sourceUrls": ["https://en.wiktionary.org/wiki/run"]
        }])
    }

    #[tokio::test]
    async fn maps_meanings_to_senses_in_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/run");
            then.status(200).json_body(sample_body());
        });

        let raw = source(&server).lookup("run").await.unwrap();

        assert_eq!(raw.senses.len(), 3);
        assert_eq!(raw.senses[0].definition, "to move swiftly");
        assert_eq!(raw.senses[0].example.as_deref(), Some("he runs fast"));
        assert_eq!(raw.senses[0].pos.as_deref(), Some("verb"));
        assert_eq!(raw.senses[2].pos.as_deref(), Some("noun"));
        assert_eq!(raw.ipa.as_deref(), Some("/rʌn/"));
        assert_eq!(raw.synonyms, vec!["dash".to_string()]);
        assert_eq!(raw.senses[0].synonyms, vec!["sprint".to_string()]);
        assert_eq!(raw.senses[1].antonyms, vec!["halt".to_string()]);
        assert_eq!(
            raw.source_url.as_deref(),
            Some("https://en.wiktionary.org/wiki/run")
        );
    }

    #[tokio::test]
    async fn phonetics_text_is_the_ipa_fallback() {
        let server = MockServer::start();
        let mut body = sample_body();
        body[0]["phonetic"] = serde_json::json!("");
        server.mock(|when, then| {
            when.method(GET).path("/run");
            then.status(200).json_body(body);
        });

        let raw = source(&server).lookup("run").await.unwrap();
        assert_eq!(raw.ipa.as_deref(), Some("/ɹʌn/"));
    }

    #[tokio::test]
    async fn missing_word_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/xyzzynotaword");
            then.status(404).json_body(serde_json::json!({
                "title": "No Definitions Found"
            }));
        });

        let err = source(&server).lookup("xyzzynotaword").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound));
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(502);
        });

        let err = source(&server).lookup("run").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn rate_limit_is_transient() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(429);
        });

        let err = source(&server).lookup("run").await.unwrap_err();
        assert!(matches!(err, LookupError::RateLimited));
    }

    #[tokio::test]
    async fn garbage_body_is_malformed_not_transient() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200).body("<html>not json</html>");
        });

        let err = source(&server).lookup("run").await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
        assert!(!err.is_transient());
    }
}
