//! OpenAI chat adapter
//!
//! Implements `ChatModel` against `POST /chat/completions`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::OpenAiChatConfig;
use crate::error::ChatError;
use crate::ports::{ChatModel, ChatRequest, ChatResponse, TokenUsage};

/// OpenAI chat adapter
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: Client,
    config: OpenAiChatConfig,
}

impl OpenAiChat {
    /// Create a new OpenAI chat adapter
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Configuration` if the configuration is invalid.
    pub fn new(config: OpenAiChatConfig) -> Result<Self, ChatError> {
        config.validate().map_err(ChatError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn resolve_model<'a>(&'a self, request: &'a ChatRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.model)
    }
}

/// Chat completions request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completions response body
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    model: String,
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: WireResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenAI API error envelope
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiChat {
    #[instrument(skip(self, request), fields(model = %self.resolve_model(&request)))]
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let model = self.resolve_model(&request).to_string();

        let body = CompletionRequest {
            model: &model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!("Sending chat completion request to OpenAI");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Chat completion request failed");

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
                return match api_error.error.code.as_deref() {
                    Some("rate_limit_exceeded") => Err(ChatError::RateLimited),
                    Some("model_not_found") => Err(ChatError::ModelNotAvailable(model)),
                    _ => Err(ChatError::ServerError(api_error.error.message)),
                };
            }
            return Err(ChatError::ServerError(format!("Status {status}: {body}")));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::InvalidResponse("Response contains no choices".to_string()))?;

        let usage = completion.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        debug!(tokens = ?usage, "Chat completion finished");

        Ok(ChatResponse {
            content: choice.message.content,
            model: completion.model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }

    fn provider_id(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> OpenAiChat {
        let mut config = OpenAiChatConfig::new("test-api-key");
        config.base_url = server.uri();
        OpenAiChat::new(config).unwrap()
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "gpt-4o-mini",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 12,
                "completion_tokens": 7,
                "total_tokens": 19
            }
        })
    }

    #[tokio::test]
    async fn chat_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi there!")))
            .expect(1)
            .mount(&server)
            .await;

        let response = adapter(&server)
            .chat(ChatRequest::simple("Hello"))
            .await
            .unwrap();

        assert_eq!(response.content, "Hi there!");
        assert_eq!(response.model, "gpt-4o-mini");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, 19);
    }

    #[tokio::test]
    async fn request_model_overrides_default() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = adapter(&server);
        assert_eq!(client.default_model(), "gpt-4o-mini");

        let request = ChatRequest::simple("Hi").with_model("gpt-4o");
        assert_eq!(client.resolve_model(&request), "gpt-4o");

        assert!(client.chat(request).await.is_ok());
    }

    #[tokio::test]
    async fn rate_limit_maps_to_variant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit exceeded",
                    "code": "rate_limit_exceeded"
                }
            })))
            .mount(&server)
            .await;

        let result = adapter(&server).chat(ChatRequest::simple("Hi")).await;

        assert!(matches!(result, Err(ChatError::RateLimited)));
    }

    #[tokio::test]
    async fn unknown_model_maps_to_variant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {
                    "message": "The model does not exist",
                    "code": "model_not_found"
                }
            })))
            .mount(&server)
            .await;

        let result = adapter(&server)
            .chat(ChatRequest::simple("Hi").with_model("nope"))
            .await;

        assert!(matches!(result, Err(ChatError::ModelNotAvailable(m)) if m == "nope"));
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "choices": []
            })))
            .mount(&server)
            .await;

        let result = adapter(&server).chat(ChatRequest::simple("Hi")).await;

        assert!(matches!(result, Err(ChatError::InvalidResponse(_))));
    }

    #[test]
    fn new_fails_with_empty_key() {
        let config = OpenAiChatConfig::new("");
        assert!(matches!(
            OpenAiChat::new(config),
            Err(ChatError::Configuration(_))
        ));
    }
}
