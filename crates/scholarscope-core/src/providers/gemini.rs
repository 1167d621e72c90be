//! Gemini `generateContent` client used for narrative summaries.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::TextGenerator;
use crate::error::ProviderError;
use crate::model::null_as_default;
use crate::security::SecretValue;

const PROVIDER: &str = "gemini";

/// Client for the Generative Language `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretValue,
}

impl GeminiClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: SecretValue,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let endpoint = self.endpoint();
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "requesting generation");

        let response = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await
            .map_err(|err| ProviderError::http(PROVIDER, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::decode(PROVIDER, err.to_string()))?;

        body.into_text()
            .ok_or(ProviderError::EmptyResponse { provider: PROVIDER })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_candidate_text() {
        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(body.into_text().as_deref(), Some("first"));
    }

    #[test]
    fn blocked_response_has_no_text() {
        let body: GenerateResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(body.into_text().is_none());
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let body: GenerateResponse = serde_json::from_value(json!({"candidates": null})).unwrap();
        assert!(body.into_text().is_none());

        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": null}}]
        }))
        .unwrap();
        assert!(body.into_text().is_none());
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = GeminiClient::new(
            reqwest::Client::new(),
            "https://example.test/v1beta/",
            "gemini-pro",
            SecretValue::new("k"),
        );
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }
}
