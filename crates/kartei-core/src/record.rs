use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Hard cap on definition/example pairs per record. Senses past this are
/// dropped in source order and counted in `truncated_senses`.
pub const MAX_DEFINITION_PAIRS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionExample {
    pub definition: String,
    /// Empty when the source carried no example for the sense
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Target language code the text was translated into
    pub language: String,
    pub text: String,
}

/// Language-specific grammatical attributes. Only some fields apply per
/// language (article/plural are German); `features` holds anything else
/// without breaking other languages' records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub article: Option<String>,
    pub plural: Option<String>,
    #[serde(default)]
    pub features: BTreeMap<String, String>,
}

/// The canonical flashcard representation. Constructed fresh per pipeline
/// run, handed by value downstream, never mutated after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRecord {
    /// Cleaned input word as the user gave it
    pub word: String,
    /// Dictionary form; equals `word` when the tagger degraded
    pub lemma: String,
    pub language: Language,
    pub pos: String,
    pub ipa: Option<String>,
    /// Source order, at most [`MAX_DEFINITION_PAIRS`] entries
    pub pairs: Vec<DefinitionExample>,
    /// Lemma translation first (when configured), then one entry per
    /// distinct definition; deduplicated case-insensitively
    pub translations: Vec<Translation>,
    pub synonyms: BTreeSet<String>,
    pub antonyms: BTreeSet<String>,
    pub grammar: Grammar,
    pub source_url: Option<String>,
    /// True when the tagger was unavailable and `lemma` fell back to `word`
    pub degraded: bool,
    /// Senses with a usable definition dropped past the pair cap
    pub truncated_senses: usize,
}
