use crate::error::{LookupError, TaggerError};
use crate::language::Language;
use crate::raw::RawLexicalData;

#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub name: String,
    pub language: Language,
}

/// One lexical source per language. Implementations own their transport
/// and schema entirely; the pipeline only sees [`RawLexicalData`].
#[async_trait::async_trait]
pub trait LexicalSource: Send + Sync {
    fn metadata(&self) -> SourceMetadata;

    /// Look up a lemma. Senses must be returned in the order the source
    /// produced them; truncation downstream depends on it.
    async fn lookup(&self, lemma: &str) -> Result<RawLexicalData, LookupError>;
}

#[derive(Debug, Clone)]
pub struct WordTag {
    pub lemma: String,
    /// Readable part of speech ("Noun", "Verb", ...)
    pub pos: String,
    /// The tagset tag as emitted by the tagger (e.g. STTS "NN")
    pub raw_tag: String,
}

#[derive(Debug, Clone)]
pub enum TagOutcome {
    Tagged(WordTag),
    /// The tagger ran but produced nothing usable for this input
    NotRecognized,
}

/// Lemmatizer/POS tagger boundary. An `Err` means the tagging process
/// could not run; callers must treat that as a degraded mode, not a
/// failure of the word.
#[async_trait::async_trait]
pub trait GrammarTagger: Send + Sync {
    async fn tag(&self, word: &str, language: Language) -> Result<TagOutcome, TaggerError>;
}
