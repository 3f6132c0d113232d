use unicode_normalization::UnicodeNormalization;

use crate::error::CardError;
use crate::language::Language;

pub trait Preprocessor {
    fn process(&self, text: &str) -> String {
        let mut text = text.trim().to_string();

        if text.is_empty() {
            return text;
        }

        // Unicode normalization (NFKC)
        text = text.nfkc().collect();

        // Strip zero-width characters and newlines pasted from chats
        text = text
            .replace('\u{200b}', "")
            .replace(['\n', '\r'], " ")
            .trim()
            .to_string();

        text.to_lowercase()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Drop a leading article particle ("the cat" -> "cat", "das Haus" -> "haus")
pub fn strip_leading_particle(word: &str, language: Language) -> &str {
    for particle in language.leading_particles() {
        if let Some(rest) = word.strip_prefix(particle)
            && let Some(rest) = rest.strip_prefix(' ')
        {
            let rest = rest.trim_start();
            if !rest.is_empty() {
                return rest;
            }
        }
    }
    word
}

/// Normalize one word of input; phrases are rejected.
pub fn clean_word(text: &str, language: Language) -> Result<String, CardError> {
    let processed = DefaultPreprocessor.process(text);
    let word = strip_leading_particle(&processed, language);

    if word.is_empty() || word.contains(' ') {
        return Err(CardError::NotAWord);
    }

    Ok(word.to_string())
}
