use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use kartei_anki::AnkiConnectClient;
use kartei_batch::{BatchFormat, BatchOutcome};
use kartei_config::Config;
use kartei_core::language::Language;
use kartei_core::pipeline::CardPipeline;
use kartei_core::record::FlashcardRecord;
use kartei_core::retry::RetryPolicy;
use kartei_lang_english::EnglishSource;
use kartei_lang_german::GermanSource;
use kartei_tagger::TreeTagger;
use kartei_translator::{LingvaTranslator, Translator};

#[derive(Parser)]
#[command(name = "kartei", about = "Turn vocabulary words into Anki flashcards")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up one or more words and store them as flashcards
    Word {
        #[arg(required = true)]
        words: Vec<String>,
        /// Language of the words (en, de)
        #[arg(long, default_value = "en")]
        lang: String,
        /// Print the cards without storing them in Anki
        #[arg(long)]
        dry_run: bool,
    },
    /// Import a word list (xlsx, csv, tsv or plain text)
    Import {
        file: PathBuf,
        /// Default language for rows without an override column
        #[arg(long, default_value = "en")]
        lang: String,
        #[arg(long)]
        dry_run: bool,
    },
    /// List the decks Anki knows about
    Decks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kartei=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::new();

    match cli.command {
        Command::Word {
            words,
            lang,
            dry_run,
        } => {
            let language = parse_language(&lang)?;
            let pipeline = build_pipeline(&config);
            let storage = storage(&config, dry_run).await?;

            let mut stored = 0usize;
            let mut failed = 0usize;
            for word in &words {
                match pipeline.build_card(word, language).await {
                    Ok(record) => {
                        print_record(&record);
                        match store(&storage, &config, &record).await {
                            Ok(()) => stored += 1,
                            Err(err) => {
                                failed += 1;
                                eprintln!("{word}: {err}");
                            }
                        }
                    }
                    Err(err) => {
                        failed += 1;
                        eprintln!("{word}: {err}");
                    }
                }
            }
            println!("{stored} ok, {failed} failed");
        }
        Command::Import {
            file,
            lang,
            dry_run,
        } => {
            let language = parse_language(&lang)?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            let Some(format) = BatchFormat::from_extension(filename) else {
                bail!("unsupported file format: {filename} (use .xlsx, .csv, .tsv or .txt)");
            };

            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let rows = kartei_batch::parse(&bytes, format)?;
            println!("importing {} words...", rows.len());

            let pipeline = build_pipeline(&config);
            let storage = storage(&config, dry_run).await?;

            let outcomes = kartei_batch::run_batch(&pipeline, language, rows).await;
            report_batch(&storage, &config, outcomes).await;
        }
        Command::Decks => {
            let client = anki_client(&config);
            client.check_connection().await?;
            for deck in client.deck_names().await? {
                println!("{deck}");
            }
        }
    }

    Ok(())
}

fn parse_language(code: &str) -> anyhow::Result<Language> {
    Language::from_code(code)
        .with_context(|| format!("unsupported language '{code}' (expected en or de)"))
}

fn build_pipeline(config: &Config) -> CardPipeline {
    let timeout = Duration::from_secs(config.timeout_seconds);

    let tagger = TreeTagger::new(
        config.tagger.binary.clone(),
        config.tagger.parameter_dir.clone(),
        Duration::from_millis(config.tagger.timeout_ms),
    );

    let mut pipeline = CardPipeline::new(Arc::new(tagger))
        .with_source(
            Language::English,
            Arc::new(EnglishSource::new(config.sources.english_url.clone(), timeout)),
        )
        .with_source(
            Language::German,
            Arc::new(GermanSource::new(config.sources.german_url.clone(), timeout)),
        )
        .with_retry(RetryPolicy {
            retries: config.source_retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        })
        .with_timeout(timeout);

    if config.translator.enabled {
        let translator = LingvaTranslator::new(config.translator.api_url.clone(), timeout);
        tracing::info!(provider = %translator.metadata().name, target = %config.translator.target_lang, "translator enabled");
        pipeline = pipeline.with_translator(Arc::new(translator), config.translator.target_lang.clone());
    }

    pipeline
}

fn anki_client(config: &Config) -> AnkiConnectClient {
    AnkiConnectClient::new(
        config.anki.url.clone(),
        Duration::from_secs(config.timeout_seconds),
    )
}

/// Connect to Anki up front so a dead endpoint fails before any lookups
async fn storage(config: &Config, dry_run: bool) -> anyhow::Result<Option<AnkiConnectClient>> {
    if dry_run || !config.anki.enabled {
        return Ok(None);
    }

    let client = anki_client(config);
    client.check_connection().await?;
    Ok(Some(client))
}

async fn store(
    storage: &Option<AnkiConnectClient>,
    config: &Config,
    record: &FlashcardRecord,
) -> anyhow::Result<()> {
    if let Some(client) = storage {
        kartei_anki::add_card(client, &config.anki.deck, &config.anki.model, record).await?;
    }
    Ok(())
}

async fn report_batch(
    storage: &Option<AnkiConnectClient>,
    config: &Config,
    outcomes: Vec<BatchOutcome>,
) {
    let mut imported = 0usize;
    let mut errors = 0usize;

    for outcome in outcomes {
        match outcome.result {
            Ok(record) => match store(storage, config, &record).await {
                Ok(()) => imported += 1,
                Err(err) => {
                    errors += 1;
                    eprintln!("line {}: {}: {err}", outcome.row.line, outcome.row.word);
                }
            },
            Err(err) => {
                errors += 1;
                eprintln!("line {}: {}: {err}", outcome.row.line, outcome.row.word);
            }
        }
    }

    println!("import finished: {imported} imported, {errors} errors");
}

fn print_record(record: &FlashcardRecord) {
    let article = record
        .grammar
        .article
        .as_deref()
        .map(|a| format!("{a} "))
        .unwrap_or_default();
    println!("{}{} ({})", article, record.lemma, record.pos);

    if let Some(ipa) = &record.ipa {
        println!("  {ipa}");
    }
    if let Some(plural) = &record.grammar.plural {
        println!("  plural: {plural}");
    }
    for (i, pair) in record.pairs.iter().enumerate() {
        println!("  {}. {}", i + 1, pair.definition);
        if !pair.example.is_empty() {
            println!("     \"{}\"", pair.example);
        }
    }
    if record.truncated_senses > 0 {
        println!("  ({} more senses omitted)", record.truncated_senses);
    }
    if let Some(translation) = record.translations.first() {
        println!("  [{}] {}", translation.language, translation.text);
    }
    if record.degraded {
        println!("  (tagger unavailable, lemma may be inflected)");
    }
}
