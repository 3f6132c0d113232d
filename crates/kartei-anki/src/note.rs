use std::collections::BTreeMap;

use kartei_core::record::{FlashcardRecord, MAX_DEFINITION_PAIRS};

/// Build the note model's field map from a validated record.
///
/// The model carries `lemma`, `IPA`, `POS`, `url`, `translated_lemma`,
/// joined `synonyms`/`antonyms`, the German `article`/`plural`, and
/// `def1`/`ex1` .. `def15`/`ex15`. Unused fields stay empty strings so
/// the same model works for every language.
pub fn note_fields(record: &FlashcardRecord) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    fields.insert("lemma".to_string(), record.lemma.clone());
    fields.insert("POS".to_string(), record.pos.clone());
    fields.insert("IPA".to_string(), record.ipa.clone().unwrap_or_default());
    fields.insert(
        "url".to_string(),
        record.source_url.clone().unwrap_or_default(),
    );
    fields.insert(
        "translated_lemma".to_string(),
        record
            .translations
            .first()
            .map(|t| t.text.clone())
            .unwrap_or_default(),
    );
    fields.insert(
        "synonyms".to_string(),
        record
            .synonyms
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
    );
    fields.insert(
        "antonyms".to_string(),
        record
            .antonyms
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
    );
    fields.insert(
        "article".to_string(),
        record.grammar.article.clone().unwrap_or_default(),
    );
    fields.insert(
        "plural".to_string(),
        record.grammar.plural.clone().unwrap_or_default(),
    );

    for i in 0..MAX_DEFINITION_PAIRS {
        let (definition, example) = record
            .pairs
            .get(i)
            .map(|pair| (pair.definition.clone(), pair.example.clone()))
            .unwrap_or_default();
        fields.insert(format!("def{}", i + 1), definition);
        fields.insert(format!("ex{}", i + 1), example);
    }

    fields
}
