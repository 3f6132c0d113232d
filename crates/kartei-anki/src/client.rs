use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AnkiError {
    #[error("connection with Anki failed, make sure Anki and AnkiConnect are running: {0}")]
    Connection(String),

    #[error("AnkiConnect error: {0}")]
    Protocol(String),

    #[error("'{lemma}' already exists in the deck")]
    Duplicate { lemma: String },
}

#[derive(Clone)]
pub struct AnkiConnectClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnkiConnectClient {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self { base_url, client }
    }

    /// Check that AnkiConnect is reachable; returns its API version
    pub async fn check_connection(&self) -> Result<u32, AnkiError> {
        let response: AnkiResponse<u32> = self.invoke("version", json!({})).await?;
        response.into_result()
    }

    /// Deck names known to the running Anki instance
    pub async fn deck_names(&self) -> Result<Vec<String>, AnkiError> {
        let response: AnkiResponse<Vec<String>> = self.invoke("deckNames", json!({})).await?;
        response.into_result()
    }

    /// Note ids matching an Anki search query
    pub async fn find_notes(&self, query: &str) -> Result<Vec<u64>, AnkiError> {
        let response: AnkiResponse<Vec<u64>> = self
            .invoke("findNotes", json!({ "query": query }))
            .await?;
        response.into_result()
    }

    /// Create one note; `fields` must match the note model
    pub async fn add_note(
        &self,
        deck: &str,
        model: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<u64, AnkiError> {
        let params = json!({
            "note": {
                "deckName": deck,
                "modelName": model,
                "fields": fields,
                "tags": ["kartei"]
            }
        });

        let response: AnkiResponse<u64> = self.invoke("addNote", params).await?;
        response.into_result()
    }

    async fn invoke<T>(
        &self,
        action: &str,
        params: serde_json::Value,
    ) -> Result<AnkiResponse<T>, AnkiError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request = AnkiRequest {
            action: action.to_string(),
            version: 6,
            params,
        };

        tracing::debug!(action, "invoking AnkiConnect");
        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnkiError::Connection(e.to_string()))?;

        response
            .json::<AnkiResponse<T>>()
            .await
            .map_err(|e| AnkiError::Connection(format!("invalid AnkiConnect response: {e}")))
    }
}

#[derive(Serialize)]
struct AnkiRequest {
    action: String,
    version: u32,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct AnkiResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

impl<T> AnkiResponse<T> {
    fn into_result(self) -> Result<T, AnkiError> {
        if let Some(error) = self.error {
            return Err(AnkiError::Protocol(error));
        }

        self.result
            .ok_or_else(|| AnkiError::Protocol("AnkiConnect returned null result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn client(server: &MockServer) -> AnkiConnectClient {
        AnkiConnectClient::new(server.base_url(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn version_handshake() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .json_body_partial(r#"{ "action": "version", "version": 6 }"#);
            then.status(200)
                .json_body(serde_json::json!({ "result": 6, "error": null }));
        });

        assert_eq!(client(&server).check_connection().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn protocol_error_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(serde_json::json!({
                "result": null,
                "error": "deck was not found"
            }));
        });

        let err = client(&server).deck_names().await.unwrap_err();
        assert!(matches!(err, AnkiError::Protocol(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() {
        // nothing listens on this port
        let client = AnkiConnectClient::new(
            "http://127.0.0.1:1".to_string(),
            Duration::from_millis(200),
        );
        let err = client.check_connection().await.unwrap_err();
        assert!(matches!(err, AnkiError::Connection(_)));
    }
}
