use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use kartei_core::error::TaggerError;
use kartei_core::language::Language;
use kartei_core::traits::{GrammarTagger, TagOutcome, WordTag};

use crate::posmap::readable_pos;

/// TreeTagger child-process adapter. One process per call, fed the word
/// on stdin; `kill_on_drop` guarantees the child is reaped on every exit
/// path, including an abandoned wait after timeout.
pub struct TreeTagger {
    binary: PathBuf,
    parameter_dir: PathBuf,
    timeout: Duration,
}

impl TreeTagger {
    pub fn new(
        binary: impl Into<PathBuf>,
        parameter_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            binary: binary.into(),
            parameter_dir: parameter_dir.into(),
            timeout,
        }
    }

    fn parameter_file(&self, language: Language) -> PathBuf {
        let name = match language {
            Language::English => "english.par",
            Language::German => "german.par",
        };
        self.parameter_dir.join(name)
    }

    async fn run(&self, word: &str, language: Language) -> Result<String, TaggerError> {
        let mut child = Command::new(&self.binary)
            .arg("-token")
            .arg("-lemma")
            .arg("-quiet")
            .arg(self.parameter_file(language))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => TaggerError::Unavailable(format!(
                    "'{}' not found, is TreeTagger installed?",
                    self.binary.display()
                )),
                _ => TaggerError::Unavailable(e.to_string()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(format!("{word}\n").as_bytes())
                .await
                .map_err(|e| TaggerError::Unavailable(e.to_string()))?;
            // closing stdin lets the tagger flush and exit
        }

        // dropping the wait future on timeout drops the child handle,
        // which kills the process (kill_on_drop)
        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| TaggerError::Timeout)?
            .map_err(|e| TaggerError::Unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(TaggerError::Unavailable(format!(
                "tagger exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl GrammarTagger for TreeTagger {
    async fn tag(&self, word: &str, language: Language) -> Result<TagOutcome, TaggerError> {
        let stdout = self.run(word, language).await?;
        tracing::debug!(word, %language, output = stdout.trim(), "tagger output");
        Ok(parse_output(word, &stdout, language))
    }
}

/// Parse `token<TAB>tag<TAB>lemma` (or `tag<TAB>lemma` without -token).
/// An unknown lemma keeps the tag but falls back to the input word.
fn parse_output(word: &str, stdout: &str, language: Language) -> TagOutcome {
    let Some(line) = stdout.lines().map(str::trim).find(|l| !l.is_empty()) else {
        return TagOutcome::NotRecognized;
    };

    let fields: Vec<&str> = line.split('\t').collect();
    let (raw_tag, lemma) = match fields.as_slice() {
        [_token, tag, lemma] => (*tag, *lemma),
        [tag, lemma] => (*tag, *lemma),
        _ => return TagOutcome::NotRecognized,
    };

    if raw_tag.is_empty() {
        return TagOutcome::NotRecognized;
    }

    let lemma = match lemma {
        "" | "<unknown>" => word,
        known => known,
    };

    TagOutcome::Tagged(WordTag {
        lemma: lemma.to_string(),
        pos: readable_pos(raw_tag, language).to_string(),
        raw_tag: raw_tag.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_field_output() {
        let out = parse_output("running", "running\tVBG\trun\n", Language::English);
        match out {
            TagOutcome::Tagged(tag) => {
                assert_eq!(tag.lemma, "run");
                assert_eq!(tag.pos, "Verb");
                assert_eq!(tag.raw_tag, "VBG");
            }
            TagOutcome::NotRecognized => panic!("expected a tag"),
        }
    }

    #[test]
    fn parses_two_field_output() {
        let out = parse_output("Häuser", "NN\tHaus\n", Language::German);
        match out {
            TagOutcome::Tagged(tag) => {
                assert_eq!(tag.lemma, "Haus");
                assert_eq!(tag.pos, "Noun");
            }
            TagOutcome::NotRecognized => panic!("expected a tag"),
        }
    }

    #[test]
    fn unknown_lemma_falls_back_to_word() {
        let out = parse_output("zorble", "zorble\tNN\t<unknown>\n", Language::English);
        match out {
            TagOutcome::Tagged(tag) => {
                assert_eq!(tag.lemma, "zorble");
                assert_eq!(tag.pos, "Noun");
            }
            TagOutcome::NotRecognized => panic!("expected a tag"),
        }
    }

    #[test]
    fn empty_output_is_not_recognized() {
        assert!(matches!(
            parse_output("x", "\n  \n", Language::English),
            TagOutcome::NotRecognized
        ));
        assert!(matches!(
            parse_output("x", "no tabs here", Language::English),
            TagOutcome::NotRecognized
        ));
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let tagger = TreeTagger::new(
            "/nonexistent/tree-tagger",
            "/nonexistent/lib",
            Duration::from_secs(1),
        );
        let err = tagger.tag("run", Language::English).await.unwrap_err();
        assert!(matches!(err, TaggerError::Unavailable(_)));
    }
}
