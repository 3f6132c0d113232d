use kartei_core::error::CardError;
use kartei_core::language::Language;
use kartei_core::pipeline::CardPipeline;
use kartei_core::record::FlashcardRecord;

use crate::format::BatchRow;

/// Outcome of one batch row. Failures are values, not exceptions; a bad
/// row never aborts its siblings.
#[derive(Debug)]
pub struct BatchOutcome {
    pub row: BatchRow,
    pub result: Result<FlashcardRecord, CardError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drive the pipeline over every row, sequentially. Outcome order equals
/// row order; rows without an override use `default_language`.
pub async fn run_batch(
    pipeline: &CardPipeline,
    default_language: Language,
    rows: Vec<BatchRow>,
) -> Vec<BatchOutcome> {
    let mut outcomes = Vec::with_capacity(rows.len());

    for row in rows {
        let language = row.language.unwrap_or(default_language);

        let result = pipeline.build_card(&row.word, language).await;
        match &result {
            Ok(record) => {
                tracing::info!(line = row.line, word = %row.word, lemma = %record.lemma, "row processed");
            }
            Err(err) => {
                tracing::warn!(line = row.line, word = %row.word, error = %err, "row failed");
            }
        }

        outcomes.push(BatchOutcome { row, result });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use kartei_core::error::{LookupError, TaggerError};
    use kartei_core::raw::{RawLexicalData, RawSense};
    use kartei_core::traits::{
        GrammarTagger, LexicalSource, SourceMetadata, TagOutcome, WordTag,
    };

    use super::*;

    struct IdentityTagger;

    #[async_trait]
    impl GrammarTagger for IdentityTagger {
        async fn tag(&self, word: &str, _language: Language) -> Result<TagOutcome, TaggerError> {
            Ok(TagOutcome::Tagged(WordTag {
                lemma: word.to_string(),
                pos: "Verb".to_string(),
                raw_tag: "VVINF".to_string(),
            }))
        }
    }

    struct KnownWords(&'static [&'static str]);

    #[async_trait]
    impl LexicalSource for KnownWords {
        fn metadata(&self) -> SourceMetadata {
            SourceMetadata {
                name: "stub".to_string(),
                language: Language::German,
            }
        }

        async fn lookup(&self, lemma: &str) -> Result<RawLexicalData, LookupError> {
            if !self.0.contains(&lemma) {
                return Err(LookupError::NotFound);
            }
            Ok(RawLexicalData {
                senses: vec![RawSense::new(format!("meaning of {lemma}"))],
                ..Default::default()
            })
        }
    }

    fn rows(words: &[&str]) -> Vec<BatchRow> {
        words
            .iter()
            .enumerate()
            .map(|(i, word)| BatchRow {
                line: i + 1,
                word: word.to_string(),
                language: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn one_bad_row_does_not_abort_siblings() {
        let pipeline = CardPipeline::new(Arc::new(IdentityTagger))
            .with_source(Language::German, Arc::new(KnownWords(&["laufen", "gehen"])))
            .with_timeout(Duration::from_secs(1));

        let outcomes = run_batch(
            &pipeline,
            Language::German,
            rows(&["laufen", "xyzzynotaword", "gehen"]),
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(matches!(
            outcomes[1].result,
            Err(CardError::NotFound { .. })
        ));
        assert!(outcomes[2].is_success());
        assert_eq!(outcomes[2].result.as_ref().unwrap().lemma, "gehen");
    }

    #[tokio::test]
    async fn outcome_order_matches_row_order() {
        let pipeline = CardPipeline::new(Arc::new(IdentityTagger))
            .with_source(Language::German, Arc::new(KnownWords(&["eins", "zwei", "drei"])))
            .with_timeout(Duration::from_secs(1));

        let outcomes = run_batch(&pipeline, Language::German, rows(&["drei", "eins", "zwei"])).await;

        let words: Vec<&str> = outcomes.iter().map(|o| o.row.word.as_str()).collect();
        assert_eq!(words, vec!["drei", "eins", "zwei"]);
        assert!(outcomes.iter().all(BatchOutcome::is_success));
    }
}
