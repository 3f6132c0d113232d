use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use kartei_core::error::LookupError;
use kartei_core::language::Language;
use kartei_core::raw::{RawLexicalData, RawSense};
use kartei_core::traits::{LexicalSource, SourceMetadata};

/// Duden JSON adapter (`GET {base}/{lemma}`), schema following the Duden
/// entry model: meaning overview, grammatical article, phonetic,
/// synonyms and a free-text grammar overview the plural is parsed from.
///
/// Duden carries no usage examples, so German senses have empty examples.
pub struct GermanSource {
    client: reqwest::Client,
    base_url: String,
}

impl GermanSource {
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
impl LexicalSource for GermanSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            name: "duden".to_string(),
            language: Language::German,
        }
    }

    async fn lookup(&self, lemma: &str) -> Result<RawLexicalData, LookupError> {
        let url = format!("{}/{}", self.base_url, lemma);
        tracing::debug!(%url, "fetching Duden entry");

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

        let entry: DudenEntry = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        Ok(map_entry(lemma, entry))
    }
}

fn map_entry(lemma: &str, entry: DudenEntry) -> RawLexicalData {
    let meanings = flatten_meanings(entry.meaning_overview.as_ref());

    let senses = meanings
        .into_iter()
        .map(|definition| RawSense {
            definition,
            example: None,
            pos: entry.part_of_speech.clone(),
            ipa: None,
            synonyms: Vec::new(),
            antonyms: Vec::new(),
        })
        .collect();

    let plural = entry
        .grammar_overview
        .as_deref()
        .and_then(extract_plural);

    RawLexicalData {
        senses,
        ipa: entry.phonetic.clone().filter(|p| !p.trim().is_empty()),
        synonyms: entry.synonyms,
        antonyms: Vec::new(),
        article: entry.article.filter(|a| !a.trim().is_empty()),
        plural,
        source_url: entry
            .url
            .or_else(|| Some(format!("https://www.duden.de/rechtschreibung/{lemma}"))),
    }
}

/// The meaning overview arrives as strings, nested string lists, or (on
/// parser hiccups upstream) a list of single-character fragments. Flatten
/// and clean everything; a fragment list is joined back into one meaning.
fn flatten_meanings(overview: Option<&serde_json::Value>) -> Vec<String> {
    let mut flat = Vec::new();
    collect_strings(overview, &mut flat);

    if flat.is_empty() {
        return flat;
    }

    if flat.iter().all(|m| m.chars().count() <= 2) {
        let joined = clean_text(&flat.concat());
        return if joined.is_empty() { Vec::new() } else { vec![joined] };
    }

    flat.iter()
        .map(|m| clean_text(m))
        .filter(|m| !m.is_empty())
        .collect()
}

fn collect_strings(value: Option<&serde_json::Value>, out: &mut Vec<String>) {
    match value {
        Some(serde_json::Value::String(s)) => out.push(s.clone()),
        Some(serde_json::Value::Array(items)) => {
            for item in items {
                collect_strings(Some(item), out);
            }
        }
        _ => {}
    }
}

/// Strip non-breaking/zero-width spaces and collapse all whitespace runs
fn clean_text(text: &str) -> String {
    let replaced = text.replace('\u{a0}', " ").replace('\u{200b}', "");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull the plural form out of a grammar overview like
/// "die Frau; Genitiv: der Frau, Plural: die Frauen" or the short
/// "das Haus; Genitiv: des Hauses, Häuser" format.
fn extract_plural(overview: &str) -> Option<String> {
    let candidate = if let Some((_, after)) = overview.rsplit_once("Plural:") {
        after.split_whitespace().last()
    } else if let Some((_, after)) = overview.rsplit_once(',') {
        after.split_whitespace().last()
    } else {
        None
    };

    candidate
        .map(|word| word.trim_matches([',', '.', ';', ':']).to_string())
        .filter(|word| !word.is_empty())
}

#[derive(Debug, Deserialize)]
struct DudenEntry {
    #[serde(default)]
    article: Option<String>,
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    meaning_overview: Option<serde_json::Value>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    grammar_overview: Option<String>,
    #[serde(default)]
    url: Option<String>,
}
