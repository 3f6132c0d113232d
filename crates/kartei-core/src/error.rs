use std::fmt;

use crate::language::Language;

/// Failure modes of a lexical source lookup. `NotFound` is a definitive
/// negative result and is never retried; the transient variants are
/// retried with bounded attempts before being surfaced.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("the source has no entry for this word")]
    NotFound,

    #[error("source call timed out")]
    Timeout,

    #[error("source rate-limited the request")]
    RateLimited,

    #[error("network failure: {0}")]
    Network(String),

    #[error("malformed source response: {0}")]
    Malformed(String),
}

impl LookupError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LookupError::Timeout | LookupError::RateLimited | LookupError::Network(_)
        )
    }
}

/// The tagging process could not be invoked at all. Callers degrade to
/// using the raw word as lemma; this never aborts a batch.
#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
    #[error("tagger unavailable: {0}")]
    Unavailable(String),

    #[error("tagger call timed out")]
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    PartOfSpeech,
    Definition,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingField::PartOfSpeech => f.write_str("part of speech"),
            MissingField::Definition => f.write_str("at least one definition"),
        }
    }
}

/// Mandatory-field check failure; carries every missing field so callers
/// can report exactly what the record lacks.
#[derive(Debug)]
pub struct ValidationError {
    pub reasons: Vec<MissingField>,
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record is missing: ")?;
        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

/// Per-word pipeline outcome. One failed word is one `CardError`, never a
/// batch abort.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("only a single word is allowed, not a phrase")]
    NotAWord,

    #[error("no lexical source configured for '{0}'")]
    UnsupportedLanguage(Language),

    #[error("'{word}' was not found in the dictionary")]
    NotFound { word: String },

    #[error("source lookup failed: {0}")]
    Source(LookupError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
