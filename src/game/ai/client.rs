//! Hosted completion API client
//!
//! [`CompletionClient`] is the seam between the AI systems and the network:
//! the systems only need "prompt in, text out". [`GeminiClient`] talks to a
//! `generateContent`-style endpoint with a blocking `reqwest` client; it runs
//! on Bevy's async compute pool, never on the main thread.

use super::error::{AiError, AiResult};
use crate::core::AiSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prompt in, completion text out
pub trait CompletionClient: Send + Sync {
    fn complete(&self, prompt: &str) -> AiResult<String>;
}

/// Client for `POST {endpoint}/{model}:generateContent?key=…`
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    url: String,
    temperature: f32,
}

impl GeminiClient {
    /// Build a client from settings.
    ///
    /// Fails when the API key environment variable is unset.
    pub fn from_settings(settings: &AiSettings) -> AiResult<Self> {
        let api_key = settings.api_key().ok_or_else(|| AiError::MissingApiKey {
            env_var: settings.api_key_env.clone(),
        })?;
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            url: request_url(settings, &api_key),
            temperature: settings.temperature,
        })
    }
}

impl CompletionClient for GeminiClient {
    fn complete(&self, prompt: &str) -> AiResult<String> {
        let body = GenerateRequest::new(prompt, self.temperature);
        let response: GenerateResponse = self
            .http
            .post(&self.url)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        response.text()
    }
}

/// Full request URL including the key query parameter
pub fn request_url(settings: &AiSettings, api_key: &str) -> String {
    format!(
        "{}/{}:generateContent?key={}",
        settings.endpoint.trim_end_matches('/'),
        settings.model,
        api_key
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    pub fn new(prompt: &str, temperature: f32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: 64,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> AiResult<String> {
        let content = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .ok_or_else(|| AiError::MalformedResponse("no candidates".to_string()))?;
        let text: String = content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        if text.trim().is_empty() {
            return Err(AiError::MalformedResponse("empty text".to_string()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::new("play", 0.5)).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "play");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 64);
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Nf" }, { "text": "3" } ], "role": "model" },
                  "finishReason": "STOP" }
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().unwrap(), "Nf3");
    }

    #[test]
    fn test_response_without_candidates_is_malformed() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#).unwrap();
        assert!(matches!(
            response.text(),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_request_url_joins_endpoint_and_model() {
        let settings = AiSettings {
            endpoint: "https://example.test/v1beta/models/".to_string(),
            model: "m1".to_string(),
            ..AiSettings::default()
        };
        assert_eq!(
            request_url(&settings, "k"),
            "https://example.test/v1beta/models/m1:generateContent?key=k"
        );
    }

    #[test]
    fn test_missing_key_fails_construction() {
        let settings = AiSettings {
            api_key_env: "CHESS3D_TEST_UNSET_KEY".to_string(),
            ..AiSettings::default()
        };
        assert!(matches!(
            GeminiClient::from_settings(&settings),
            Err(AiError::MissingApiKey { .. })
        ));
    }
}
