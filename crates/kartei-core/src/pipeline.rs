use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use kartei_translator::Translator;

use crate::error::{CardError, LookupError};
use crate::language::Language;
use crate::normalize::{self, TagResolution};
use crate::preprocess;
use crate::record::{FlashcardRecord, Translation};
use crate::retry::{RetryPolicy, with_retry};
use crate::traits::{GrammarTagger, LexicalSource, TagOutcome};
use crate::validate;

/// The per-word aggregation pipeline: preprocess, tag (degradable),
/// look up (retried), merge, translate, validate.
///
/// Built once and shared; every call constructs a fresh record.
pub struct CardPipeline {
    tagger: Arc<dyn GrammarTagger>,
    sources: HashMap<Language, Arc<dyn LexicalSource>>,
    translator: Option<(Arc<dyn Translator>, String)>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl CardPipeline {
    pub fn new(tagger: Arc<dyn GrammarTagger>) -> Self {
        Self {
            tagger,
            sources: HashMap::new(),
            translator: None,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_source(mut self, language: Language, source: Arc<dyn LexicalSource>) -> Self {
        self.sources.insert(language, source);
        self
    }

    /// Attach a translator; `target` is the language code definitions are
    /// translated into.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>, target: String) -> Self {
        self.translator = Some((translator, target));
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn build_card(
        &self,
        input: &str,
        language: Language,
    ) -> Result<FlashcardRecord, CardError> {
        let word = preprocess::clean_word(input, language)?;
        let source = self
            .sources
            .get(&language)
            .ok_or(CardError::UnsupportedLanguage(language))?;

        let tag = self.tag_word(&word, language).await;
        let lemma = match &tag {
            TagResolution::Tagged(t) if !t.lemma.trim().is_empty() => t.lemma.trim().to_string(),
            _ => word.clone(),
        };

        let meta = source.metadata();
        tracing::info!(%word, %lemma, %language, source = %meta.name, "looking up lexical source");
        let lemma_ref = lemma.as_str();
        let src = source.as_ref();
        let timeout = self.timeout;
        let raw = with_retry(self.retry, &meta.name, || {
            let lemma = lemma_ref;
            async move {
                match tokio::time::timeout(timeout, src.lookup(lemma)).await {
                    Ok(result) => result,
                    Err(_) => Err(LookupError::Timeout),
                }
            }
        })
        .await;

        let raw = match raw {
            Ok(raw) => raw,
            Err(LookupError::NotFound) => return Err(CardError::NotFound { word: lemma }),
            Err(err) => return Err(CardError::Source(err)),
        };

        let mut record = normalize::merge(&word, language, &tag, &raw);

        if let Some((translator, target)) = &self.translator {
            record.translations = self
                .translate_fields(&record, translator.as_ref(), target, language)
                .await;
        }

        validate::validate(&record)?;
        Ok(record)
    }

    async fn tag_word(&self, word: &str, language: Language) -> TagResolution {
        match tokio::time::timeout(self.timeout, self.tagger.tag(word, language)).await {
            Ok(Ok(TagOutcome::Tagged(tag))) => {
                tracing::debug!(word, lemma = %tag.lemma, pos = %tag.pos, "tagged");
                TagResolution::Tagged(tag)
            }
            Ok(Ok(TagOutcome::NotRecognized)) => {
                tracing::debug!(word, "tagger produced no usable tag");
                TagResolution::NotRecognized
            }
            Ok(Err(err)) => {
                tracing::warn!(word, error = %err, "tagger unavailable, continuing degraded");
                TagResolution::Unavailable
            }
            Err(_) => {
                tracing::warn!(word, "tagger timed out, continuing degraded");
                TagResolution::Unavailable
            }
        }
    }

    /// Translate the lemma and each distinct definition text once.
    /// Failures shorten the list, they never fail the record.
    async fn translate_fields(
        &self,
        record: &FlashcardRecord,
        translator: &dyn Translator,
        target: &str,
        language: Language,
    ) -> Vec<Translation> {
        let mut seen = HashSet::new();
        let mut texts: Vec<&str> = Vec::new();

        seen.insert(record.lemma.to_ascii_lowercase());
        texts.push(record.lemma.as_str());
        for pair in &record.pairs {
            if seen.insert(pair.definition.to_ascii_lowercase()) {
                texts.push(pair.definition.as_str());
            }
        }

        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let call = translator.translate(text, language.code().to_string(), target.to_string());
            match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(translation)) => out.push(Translation {
                    language: target.to_string(),
                    text: translation.text,
                }),
                Ok(Err(err)) => {
                    tracing::debug!(error = %err, "translation unavailable, field omitted");
                }
                Err(_) => {
                    tracing::debug!("translation timed out, field omitted");
                }
            }
        }

        normalize::dedup_translations(out)
    }
}
