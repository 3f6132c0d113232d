mod client;
mod note;

pub use client::{AnkiConnectClient, AnkiError};
pub use note::note_fields;

use kartei_core::record::FlashcardRecord;

/// Store a validated record as a new note. The deck is queried for the
/// lemma first; an existing note is a per-word error, not a batch abort.
pub async fn add_card(
    client: &AnkiConnectClient,
    deck: &str,
    model: &str,
    record: &FlashcardRecord,
) -> Result<u64, AnkiError> {
    let query = format!("deck:{deck} lemma:{}", record.lemma);
    if !client.find_notes(&query).await?.is_empty() {
        return Err(AnkiError::Duplicate {
            lemma: record.lemma.clone(),
        });
    }

    let note_id = client
        .add_note(deck, model, &note_fields(record))
        .await?;
    tracing::info!(lemma = %record.lemma, note_id, "added note");
    Ok(note_id)
}
