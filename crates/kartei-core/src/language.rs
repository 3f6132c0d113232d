use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages with a configured lexical source. Adding a language means
/// adding a variant here plus a `LexicalSource` implementation for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    German,
}

impl Language {
    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::English),
            "de" => Some(Language::German),
            _ => None,
        }
    }

    /// Leading particles users habitually type with a headword
    /// ("the cat", "to run", "das Haus"). Stripped before tagging.
    pub fn leading_particles(&self) -> &'static [&'static str] {
        match self {
            Language::English => &["the", "a", "an", "to"],
            Language::German => &["der", "die", "das"],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
