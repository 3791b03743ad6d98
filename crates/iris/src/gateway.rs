//! Client for the external text-completion service.
//!
//! One request per summarization cycle: no retries, no caching of repeated
//! identical requests. The request timeout is ours; the cancellation token
//! lets a caller abandon a call whose result no longer matters.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

use crate::formatter::SummaryRequest;

/// Returned in place of an error when the service answers without any
/// usable completion text.
pub const EMPTY_COMPLETION_FALLBACK: &str = "Failed to generate summary.";

/// Connection and sampling configuration for the completion service.
///
/// Injected explicitly wherever a gateway is built; nothing reads the
/// environment except [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
  pub api_base: String,
  pub api_key: String,
  pub model: String,
  pub temperature: f32,
  pub max_tokens: u32,
  /// Timeout for the whole request, in seconds. The service has its own
  /// limits; this one is ours.
  pub timeout_secs: u64,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      api_base: "https://api.openai.com/v1".to_string(),
      api_key: String::new(),
      model: "gpt-4o".to_string(),
      temperature: 0.7,
      max_tokens: 1500,
      timeout_secs: 120,
    }
  }
}

impl GatewayConfig {
  /// Read connection settings from the environment (binary boundary only).
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Ok(base) = std::env::var("IRIS_OPENAI_BASE_URL") {
      config.api_base = base;
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
      config.api_key = key;
    }
    if let Ok(model) = std::env::var("IRIS_MODEL") {
      config.model = model;
    }
    config
  }
}

#[derive(Error, Debug)]
pub enum GatewayError {
  #[error("completion request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("completion service returned {status}: {body}")]
  Service { status: u16, body: String },

  #[error("completion request cancelled")]
  Cancelled,
}

/// Create a connected cancellation pair.
pub fn cancellation() -> (CancelHandle, CancelToken) {
  let (trigger, cancelled) = watch::channel(false);
  (CancelHandle { trigger }, CancelToken { cancelled })
}

/// Caller-side handle used to abandon an in-flight completion call.
#[derive(Debug)]
pub struct CancelHandle {
  trigger: watch::Sender<bool>,
}

impl CancelHandle {
  pub fn cancel(&self) {
    let _ = self.trigger.send(true);
  }
}

/// Token the gateway races the service call against.
#[derive(Debug, Clone)]
pub struct CancelToken {
  cancelled: watch::Receiver<bool>,
}

impl CancelToken {
  /// A token that never fires; the call runs to completion or timeout.
  pub fn never() -> Self {
    let (_trigger, cancelled) = watch::channel(false);
    Self { cancelled }
  }

  /// Resolves only once cancellation has been requested.
  async fn fired(mut self) {
    loop {
      if *self.cancelled.borrow() {
        return;
      }
      if self.cancelled.changed().await.is_err() {
        // The handle is gone; cancellation can no longer be requested.
        std::future::pending::<()>().await;
      }
    }
  }
}

/// Seam between the request formatter and the completion service. The
/// server holds a trait object here so tests can stand in a scripted
/// gateway.
#[async_trait]
pub trait SummaryGateway: Send + Sync {
  async fn complete(&self, request: &SummaryRequest) -> Result<String, GatewayError>;
}

/// reqwest-backed gateway speaking the chat-completions wire format.
pub struct OpenAiGateway {
  client: Client,
  config: GatewayConfig,
}

impl OpenAiGateway {
  pub fn new(config: GatewayConfig) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .expect("Failed to create HTTP client");

    Self { client, config }
  }

  /// Send the request, racing it against the cancellation token.
  pub async fn complete_cancellable(
    &self,
    request: &SummaryRequest,
    cancel: CancelToken,
  ) -> Result<String, GatewayError> {
    tokio::select! {
      result = self.send(request) => result,
      _ = cancel.fired() => Err(GatewayError::Cancelled),
    }
  }

  async fn send(&self, request: &SummaryRequest) -> Result<String, GatewayError> {
    let url = format!("{}/chat/completions", self.config.api_base);
    let payload = ChatRequest {
      model: &self.config.model,
      messages: vec![
        ChatMessage { role: "system", content: &request.system },
        ChatMessage { role: "user", content: &request.user },
      ],
      temperature: self.config.temperature,
      max_tokens: self.config.max_tokens,
    };

    let response =
      self.client.post(&url).bearer_auth(&self.config.api_key).json(&payload).send().await?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let body = response.text().await.unwrap_or_default();
      return Err(GatewayError::Service { status, body });
    }

    let completion: ChatResponse = response.json().await?;
    let text = completion
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message)
      .and_then(|message| message.content)
      .filter(|content| !content.is_empty());

    Ok(text.unwrap_or_else(|| EMPTY_COMPLETION_FALLBACK.to_string()))
  }
}

#[async_trait]
impl SummaryGateway for OpenAiGateway {
  async fn complete(&self, request: &SummaryRequest) -> Result<String, GatewayError> {
    self.complete_cancellable(request, CancelToken::never()).await
  }
}

// Chat-completions wire format
// ============================

#[derive(Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  temperature: f32,
  max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
  message: Option<AssistantMessage>,
}

#[derive(Deserialize)]
struct AssistantMessage {
  content: Option<String>,
}
