//! Google Gemini provider (Generative Language REST API).
//!
//! Sends one `generateContent` call per request: the agent persona goes in
//! `systemInstruction`, prior turns and the new prompt go in `contents`.

use async_trait::async_trait;
use medimind_core::error::ProviderError;
use medimind_core::message::{Message, Role};
use medimind_core::provider::{GenerationRequest, GenerationResponse, Provider, Usage};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: crate::http::client(),
        }
    }

    /// Endpoint for a model id, accepting both `gemini-x` and `models/gemini-x`.
    fn endpoint(&self, model: &str) -> String {
        let model = model.trim_start_matches('/');
        if model.starts_with("models/") || model.starts_with("tunedModels/") {
            format!("{}/{model}:generateContent", self.base_url)
        } else {
            format!("{}/models/{model}:generateContent", self.base_url)
        }
    }

    fn to_contents(messages: &[Message]) -> Vec<Content> {
        messages
            .iter()
            .map(|m| Content {
                role: match m.role {
                    Role::User => "user".into(),
                    Role::Model => "model".into(),
                },
                parts: vec![Part {
                    text: m.text.clone(),
                }],
            })
            .collect()
    }

    fn build_body(request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: (!request.system_instruction.is_empty()).then(|| SystemInstruction {
                parts: vec![Part {
                    text: request.system_instruction.clone(),
                }],
            }),
            contents: Self::to_contents(&request.turns()),
            generation_config: GenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                max_output_tokens: request.max_tokens,
            },
        }
    }

    fn parse_response(
        api_response: GenerateContentResponse,
        requested_model: &str,
    ) -> Result<GenerationResponse, ProviderError> {
        let candidate = api_response.candidates.into_iter().next().ok_or_else(|| {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".into());
            ProviderError::EmptyResponse(reason)
        })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ProviderError::EmptyResponse(
                candidate
                    .finish_reason
                    .unwrap_or_else(|| "empty candidate".into()),
            ));
        }

        let usage = api_response.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(GenerationResponse {
            text,
            usage,
            model: api_response
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResponse, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("gemini API key is empty".into()));
        }

        let url = self.endpoint(&request.model);
        let body = Self::build_body(&request);

        debug!(provider = "gemini", model = %request.model, turns = body.contents.len(), "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = crate::http::check_status("gemini", response).await?;

        let api_response: GenerateContentResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::parse_response(api_response, &request.model)
    }

    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: "models/gemini-flash-latest".into(),
            system_instruction: "You are a careful health assistant.".into(),
            history: vec![Message::user("Hi"), Message::model("Hello! How can I help?")],
            prompt: "I have a headache".into(),
            temperature: 0.7,
            top_p: 0.95,
            max_tokens: Some(2048),
        }
    }

    #[test]
    fn endpoint_accepts_prefixed_and_bare_models() {
        let provider = GeminiProvider::new("key");
        assert_eq!(
            provider.endpoint("models/gemini-flash-latest"),
            format!("{DEFAULT_BASE_URL}/models/gemini-flash-latest:generateContent")
        );
        assert_eq!(
            provider.endpoint("gemini-pro"),
            format!("{DEFAULT_BASE_URL}/models/gemini-pro:generateContent")
        );
    }

    #[test]
    fn body_carries_instruction_turns_and_sampling() {
        let body = serde_json::to_value(GeminiProvider::build_body(&request())).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are a careful health assistant."
        );
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "I have a headache");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert!(body["generationConfig"]["topP"].as_f64().is_some());
    }

    #[test]
    fn empty_instruction_is_omitted() {
        let mut req = request();
        req.system_instruction.clear();
        let body = serde_json::to_value(GeminiProvider::build_body(&req)).unwrap();
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn parse_candidate_text_and_usage() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Rest "}, {"text": "and hydrate."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16},
            "modelVersion": "gemini-flash-001"
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let response = GeminiProvider::parse_response(parsed, "models/gemini-flash-latest").unwrap();

        assert_eq!(response.text, "Rest and hydrate.");
        assert_eq!(response.model, "gemini-flash-001");
        assert_eq!(response.usage.unwrap().total_tokens, 16);
    }

    #[test]
    fn blocked_prompt_is_empty_response() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = GeminiProvider::parse_response(parsed, "m").unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse(reason) if reason == "SAFETY"));
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let provider = GeminiProvider::new("");
        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
