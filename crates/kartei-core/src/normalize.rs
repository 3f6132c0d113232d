use std::collections::{BTreeSet, HashSet};

use crate::language::Language;
use crate::raw::RawLexicalData;
use crate::record::{
    DefinitionExample, FlashcardRecord, Grammar, MAX_DEFINITION_PAIRS, Translation,
};
use crate::traits::WordTag;

/// How the tagging step resolved for this word
#[derive(Debug, Clone)]
pub enum TagResolution {
    Tagged(WordTag),
    /// Tagger ran, no usable tag
    NotRecognized,
    /// Tagger could not be invoked; the record is marked degraded
    Unavailable,
}

impl TagResolution {
    fn word_tag(&self) -> Option<&WordTag> {
        match self {
            TagResolution::Tagged(tag) => Some(tag),
            _ => None,
        }
    }
}

/// Merge tagger output and raw source data into the canonical record.
///
/// Deterministic for identical inputs: sense order is taken as returned
/// by the source, sets are deduplicated case-insensitively keeping the
/// first-seen spelling, and the pair cap cuts in source order.
pub fn merge(
    word: &str,
    language: Language,
    tag: &TagResolution,
    raw: &RawLexicalData,
) -> FlashcardRecord {
    let word_tag = tag.word_tag();
    let degraded = matches!(tag, TagResolution::Unavailable);

    let lemma = word_tag
        .map(|t| t.lemma.trim())
        .filter(|l| !l.is_empty())
        .unwrap_or(word)
        .to_string();

    // Tagger POS wins over any hint embedded in the source data
    let pos = word_tag
        .map(|t| t.pos.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .or_else(|| {
            raw.senses
                .iter()
                .filter_map(|s| s.pos.as_deref())
                .map(str::trim)
                .find(|p| !p.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_default();

    let mut pairs = Vec::new();
    let mut truncated_senses = 0;
    for sense in &raw.senses {
        let definition = sense.definition.trim();
        if definition.is_empty() {
            continue;
        }
        if pairs.len() == MAX_DEFINITION_PAIRS {
            truncated_senses += 1;
            continue;
        }
        pairs.push(DefinitionExample {
            definition: definition.to_string(),
            example: sense
                .example
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
        });
    }
    if truncated_senses > 0 {
        tracing::debug!(word, truncated_senses, "dropped senses past the pair cap");
    }

    // First non-empty IPA wins, entry level before sense level
    let ipa = raw
        .ipa
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            raw.senses
                .iter()
                .filter_map(|s| s.ipa.as_deref())
                .map(str::trim)
                .find(|s| !s.is_empty())
        })
        .map(str::to_string);

    let synonyms = dedup_fold(
        raw.synonyms
            .iter()
            .chain(raw.senses.iter().flat_map(|s| s.synonyms.iter()))
            .map(String::as_str),
    );
    let antonyms = dedup_fold(
        raw.antonyms
            .iter()
            .chain(raw.senses.iter().flat_map(|s| s.antonyms.iter()))
            .map(String::as_str),
    );

    let mut grammar = Grammar {
        article: raw
            .article
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
        plural: raw
            .plural
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
        ..Default::default()
    };
    if let Some(tag) = word_tag
        && !tag.raw_tag.is_empty()
    {
        grammar
            .features
            .insert("tag".to_string(), tag.raw_tag.clone());
    }

    FlashcardRecord {
        word: word.to_string(),
        lemma,
        language,
        pos,
        ipa,
        pairs,
        translations: Vec::new(),
        synonyms,
        antonyms,
        grammar,
        source_url: raw
            .source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string),
        degraded,
        truncated_senses,
    }
}

/// Deduplicate translations preserving order; case-insensitive ASCII fold,
/// first-seen spelling kept.
pub fn dedup_translations(items: Vec<Translation>) -> Vec<Translation> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let text = item.text.trim();
        if text.is_empty() {
            continue;
        }
        if seen.insert((item.language.clone(), text.to_ascii_lowercase())) {
            out.push(Translation {
                language: item.language,
                text: text.to_string(),
            });
        }
    }
    out
}

fn dedup_fold<'a>(items: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let mut out = BTreeSet::new();
    for item in items {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_ascii_lowercase()) {
            out.insert(item.to_string());
        }
    }
    out
}
