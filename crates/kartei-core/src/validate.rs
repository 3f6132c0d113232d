use crate::error::{MissingField, ValidationError};
use crate::record::FlashcardRecord;

/// Mandatory-field policy: a usable record has a part of speech and at
/// least one pair with a non-empty definition. Everything else (IPA,
/// translations, synonyms, grammar) is optional.
pub fn validate(record: &FlashcardRecord) -> Result<(), ValidationError> {
    let mut reasons = Vec::new();

    if record.pos.trim().is_empty() {
        reasons.push(MissingField::PartOfSpeech);
    }

    if !record
        .pairs
        .iter()
        .any(|pair| !pair.definition.trim().is_empty())
    {
        reasons.push(MissingField::Definition);
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { reasons })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;
    use crate::record::DefinitionExample;

    fn record(pos: &str, definitions: &[&str]) -> FlashcardRecord {
        FlashcardRecord {
            word: "run".to_string(),
            lemma: "run".to_string(),
            language: Language::English,
            pos: pos.to_string(),
            ipa: None,
            pairs: definitions
                .iter()
                .map(|d| DefinitionExample {
                    definition: d.to_string(),
                    example: String::new(),
                })
                .collect(),
            translations: Vec::new(),
            synonyms: Default::default(),
            antonyms: Default::default(),
            grammar: Default::default(),
            source_url: None,
            degraded: false,
            truncated_senses: 0,
        }
    }

    #[test]
    fn valid_with_pos_and_definition() {
        assert!(validate(&record("Verb", &["to move fast"])).is_ok());
    }

    #[test]
    fn reports_every_missing_field() {
        let err = validate(&record("", &[])).unwrap_err();
        assert_eq!(
            err.reasons,
            vec![MissingField::PartOfSpeech, MissingField::Definition]
        );
    }

    #[test]
    fn whitespace_definition_does_not_count() {
        let err = validate(&record("Verb", &["   "])).unwrap_err();
        assert_eq!(err.reasons, vec![MissingField::Definition]);
    }

    #[test]
    fn optional_fields_do_not_matter() {
        let mut rec = record("", &["a definition"]);
        rec.ipa = Some("/x/".to_string());
        let err = validate(&rec).unwrap_err();
        assert_eq!(err.reasons, vec![MissingField::PartOfSpeech]);
    }
}
