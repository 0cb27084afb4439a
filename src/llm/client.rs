use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ApiError, ChatRequest, ChatResponse, Message};

const API_BASE: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama3-8b-8192";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Deterministic-leaning sampling for repeatable extractions.
const TEMPERATURE: f32 = 0.5;
/// Extracted fields are short; cap the completion accordingly.
const MAX_TOKENS: u32 = 150;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("GROQ_API_KEY not set. Get one at https://console.groq.com/keys")]
    ApiKeyNotSet,

    #[error("Chat API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Model returned an empty answer")]
    EmptyCompletion,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Abstraction over the chat-completion provider.
/// Implemented by `LlmClient` for production; mock implementations used in tests.
pub trait CompletionProvider {
    async fn extract(&self, instruction: &str, context: &str) -> Result<String, LlmError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl LlmClient {
    pub fn from_env(http: Client) -> Result<Self, LlmError> {
        let api_key = env::var("GROQ_API_KEY").map_err(|_| LlmError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(LlmError::ApiKeyNotSet);
        }
        let model = env::var("GROQ_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            model,
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

impl CompletionProvider for LlmClient {
    /// Asks the model to apply `instruction` to `context` and returns the
    /// trimmed answer. A whitespace-only or missing completion is
    /// `LlmError::EmptyCompletion`, so a successful return is never blank.
    async fn extract(&self, instruction: &str, context: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(format!("{instruction}\n\nWeb Results:\n{context}")),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        debug_assert!(
            self.base_url.starts_with("https://") || cfg!(test),
            "API key must only be sent over HTTPS"
        );

        let response = self
            .http
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key.0))
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<ChatResponse>(&text)
                && let Some(err) = &body.error
            {
                let classified = classify_api_error(status.as_u16(), err);
                warn!(error = %classified, "chat API error");
                return Err(classified);
            }
            let snippet = if text.len() > 200 { &text[..200] } else { &text };
            warn!(status = %status, "chat API error (no structured body)");
            return Err(LlmError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {snippet}"),
            });
        }

        let body: ChatResponse = response.json().await?;
        if let Some(err) = &body.error {
            let classified = classify_api_error(status.as_u16(), err);
            warn!(error = %classified, "chat API error in 200 response");
            return Err(classified);
        }

        let answer = body
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyCompletion)?;

        debug!(model = %self.model, chars = answer.len(), "extraction complete");
        Ok(answer)
    }
}

fn classify_api_error(code: u16, err: &ApiError) -> LlmError {
    LlmError::Api {
        code,
        message: err
            .message
            .clone()
            .unwrap_or_else(|| "Unknown error".to_string()),
    }
}
