//! LLM client — the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: no other module may call the upstream API directly.
//! Handlers depend on the `CompletionBackend` trait, not on this client.
//!
//! Model: gpt-4o (hardcoded — do not make configurable to prevent drift)

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all report generation.
pub const MODEL: &str = "gpt-4o";
/// Fixed sampling temperature for every call. Reports should read the same
/// way for the same input, so this stays low and is never configurable.
const TEMPERATURE: f64 = 0.3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status})")]
    Api { status: u16, body: Value },

    #[error("unexpected completion response shape")]
    MalformedResponse { body: Value },
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// The seam between report assembly and the upstream model.
/// Production uses `OpenAiClient`; tests script replies through a fake.
///
/// One prompt in, one trimmed text blob out. Failures are terminal for the
/// request: no retry, no backoff, no partial result.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn submit_prompt(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Chat-completion client for the OpenAI API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn submit_prompt(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let text = extract_content(&body)?;

        debug!("completion call succeeded: {} chars", text.len());
        Ok(text)
    }
}

/// Pulls `choices[0].message.content` out of a raw completion response,
/// trimmed of leading/trailing whitespace. Any missing field means the
/// response shape changed under us and is surfaced with the full body.
fn extract_content(body: &Value) -> Result<String, LlmError> {
    body.get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|text| text.trim().to_string())
        .ok_or_else(|| LlmError::MalformedResponse { body: body.clone() })
}
