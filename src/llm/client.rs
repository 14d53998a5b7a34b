//! HTTP client for provider chat APIs.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::LlmError;

use super::provider::{ApiFlavor, Provider};

/// Default timeout for a single provider request.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable to override the default timeout.
const TIMEOUT_ENV_VAR: &str = "RELAISE_TIMEOUT";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Get the configured request timeout.
///
/// Reads from RELAISE_TIMEOUT if set, otherwise uses 60 seconds. Logs a
/// warning if the variable holds something that is not a whole number.
pub fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

/// One generation request: system instruction, commit text and directives.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub directives: Vec<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// User message sent to the model: the prompt followed by the directives.
    pub fn user_message(&self) -> String {
        if self.directives.is_empty() {
            return self.prompt.clone();
        }

        let mut message = self.prompt.trim_end().to_string();
        message.push_str("\n\nDirectives:\n");
        for directive in &self.directives {
            message.push_str("- ");
            message.push_str(directive);
            message.push('\n');
        }
        message
    }
}

/// Trait for sending a completion request to a provider.
///
/// This abstraction allows mocking the provider in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesExecutor: Send + Sync {
    /// Send the request and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Executor that talks to a provider over HTTPS.
pub struct HttpExecutor {
    client: Client,
    provider: Provider,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpExecutor {
    pub fn new(
        provider: Provider,
        base_url: Option<&str>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self {
            client,
            provider,
            base_url: base_url
                .unwrap_or(provider.default_base_url())
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// Build an executor from the user's configuration.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.provider,
            config.base_url.as_deref(),
            &config.api_key,
            get_timeout(),
        )
    }

    fn request_error(&self, source: reqwest::Error) -> LlmError {
        if source.is_timeout() {
            LlmError::Timeout {
                provider: self.provider.to_string(),
                secs: self.timeout.as_secs(),
            }
        } else {
            LlmError::Request {
                provider: self.provider.to_string(),
                source,
            }
        }
    }

    fn invalid_response(&self, detail: impl Into<String>) -> LlmError {
        LlmError::InvalidResponse {
            provider: self.provider.to_string(),
            detail: detail.into(),
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, LlmError> {
        let response = builder.send().await.map_err(|e| self.request_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(LlmError::Api {
                provider: self.provider.to_string(),
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        Ok(body)
    }

    async fn complete_chat(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_message(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let raw = self.send(builder).await?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&raw).map_err(|e| self.invalid_response(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }

    async fn complete_anthropic(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: &request.model,
            system: &request.system,
            messages: vec![ChatMessage {
                role: "user",
                content: request.user_message(),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let builder = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let raw = self.send(builder).await?;
        let parsed: AnthropicResponse =
            serde_json::from_str(&raw).map_err(|e| self.invalid_response(e.to_string()))?;

        Ok(parsed
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[async_trait]
impl NotesExecutor for HttpExecutor {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!(
            provider = %self.provider,
            model = %request.model,
            prompt_len = request.prompt.len(),
            "Sending completion request"
        );

        let text = match self.provider.flavor() {
            ApiFlavor::ChatCompletions => self.complete_chat(request).await?,
            ApiFlavor::AnthropicMessages => self.complete_anthropic(request).await?,
        };

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse(self.provider.to_string()));
        }

        Ok(text)
    }
}

/// Pull a human-readable message out of a provider error body.
///
/// Handles `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"message": ...}`; anything else is returned as-is.
fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .or_else(|| value.get("message"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}
