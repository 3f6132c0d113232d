use std::time::Duration;

use async_trait::async_trait;

use crate::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};

/// Lingva instance client (a keyless Google Translate front end).
/// Endpoint shape: `GET {base}/{source}/{target}/{text}`.
#[derive(Clone)]
pub struct LingvaTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl LingvaTranslator {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Translator for LingvaTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        let encoded: String = text
            .bytes()
            .flat_map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    vec![b as char]
                }
                _ => format!("%{b:02X}").chars().collect(),
            })
            .collect();
        let url = format!("{}/{}/{}/{}", self.base_url, from, to, encoded);

        tracing::debug!(%url, "requesting translation");
        let response = self.client.get(&url).send().await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ApiError(format!("Failed to parse response: {e}")))?;

        let translated = json["translation"]
            .as_str()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TranslateError::EmptyTranslation)?;

        Ok(Translation {
            text: translated.to_string(),
            from,
            to,
            provider: "lingva".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "lingva".to_string(),
            requires_api_key: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn translator(server: &MockServer) -> LingvaTranslator {
        LingvaTranslator::new(server.base_url(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn translates_and_percent_encodes() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/en/it/to%20move%20fast");
            then.status(200)
                .json_body(serde_json::json!({ "translation": "muoversi veloce" }));
        });

        let result = translator(&server)
            .translate("to move fast", "en".to_string(), "it".to_string())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.text, "muoversi veloce");
        assert_eq!(result.to, "it");
    }

    #[tokio::test]
    async fn rate_limit_maps_to_typed_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(429);
        });

        let err = translator(&server)
            .translate("run", "en".to_string(), "it".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::RateLimitExceeded));
    }

    #[tokio::test]
    async fn empty_translation_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(200)
                .json_body(serde_json::json!({ "translation": "" }));
        });

        let err = translator(&server)
            .translate("run", "en".to_string(), "it".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::EmptyTranslation));
    }
}
