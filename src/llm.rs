//! LLM integration for plan generation
//!
//! This module handles communication with an OpenAI-compatible chat
//! completions endpoint (OpenRouter by default) and turns the free-text
//! reply into structured data.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::LlmConfig;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

/// Attribution headers expected by OpenRouter
const APP_REFERER: &str = "https://github.com/fitmentor";
const APP_TITLE: &str = "FitMentor AI";

/// Reasoning models emit `<think>...</think>` before the answer
const REASONING_END_MARKER: &str = "</think>";
const CODE_FENCE: &str = "```";
const LANGUAGE_TAG: &str = "json";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("Request timed out after {0}s")]
  Timeout(u64),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Chat Completions API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  max_tokens: u32,
  temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'static str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
  content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
  error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// OpenRouter Client
/// ---------------------------------------------------------------------------

pub struct OpenRouterClient {
  client: Client,
  api_key: String,
  endpoint: String,
  model: String,
  max_tokens: u32,
  temperature: f32,
  timeout_secs: u64,
}

impl OpenRouterClient {
  /// Build a client from explicit settings. Fails only when no key is set.
  pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
    let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;

    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| LlmError::Request(e.to_string()))?;

    Ok(Self {
      client,
      api_key,
      endpoint: config.endpoint.clone(),
      model: config.model.clone(),
      max_tokens: config.max_tokens,
      temperature: config.temperature,
      timeout_secs: config.timeout_secs,
    })
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  /// Send a single user-role prompt and return the raw generated text
  pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
    let request = ChatRequest {
      model: &self.model,
      messages: vec![ChatMessage {
        role: "user",
        content: prompt,
      }],
      max_tokens: self.max_tokens,
      temperature: self.temperature,
    };

    info!(model = %self.model, prompt_chars = prompt.len(), "calling text-generation API");
    let started = Instant::now();

    let response = self
      .client
      .post(&self.endpoint)
      .bearer_auth(&self.api_key)
      .header("content-type", "application/json")
      .header("HTTP-Referer", APP_REFERER)
      .header("X-Title", APP_TITLE)
      .json(&request)
      .send()
      .await
      .map_err(|e| self.request_error(e))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| self.request_error(e))?;

    if !status.is_success() {
      // Try to parse error response
      if let Ok(error_resp) = serde_json::from_str::<ApiErrorResponse>(&body) {
        return Err(LlmError::Api(format!("HTTP {}: {}", status, error_resp.error.message)));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, truncate(&body, 200))));
    }

    let chat_response: ChatResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = chat_response
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))?;

    debug!(
      elapsed_ms = started.elapsed().as_millis() as u64,
      response_chars = text.len(),
      "text-generation API responded"
    );

    Ok(text)
  }

  /// Complete a prompt and parse the cleaned reply as JSON
  pub async fn complete_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, LlmError> {
    let response_text = self.complete(prompt).await?;
    let json_str = clean_response(&response_text);

    serde_json::from_str(json_str)
      .map_err(|e| LlmError::Parse(format!("{}: {}", e, truncate(json_str, 200))))
  }

  fn request_error(&self, e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
      LlmError::Timeout(self.timeout_secs)
    } else {
      LlmError::Request(e.to_string())
    }
  }
}

/// Strip wrapper text from a model reply, leaving the JSON payload.
///
/// Rules, applied in order:
/// 1. everything up to the last `</think>` is dropped
/// 2. a leading code fence line (with any language tag) and a closing
///    fence line are dropped
/// 3. a stray trailing fence is dropped
/// 4. a leading bare `json` token is dropped
pub fn clean_response(raw: &str) -> &str {
  let mut text = raw.trim();

  if let Some(end) = text.rfind(REASONING_END_MARKER) {
    text = text[end + REASONING_END_MARKER.len()..].trim();
  }

  if let Some(rest) = text.strip_prefix(CODE_FENCE) {
    text = rest.split_once('\n').map_or("", |(_, body)| body);
    if let Some((body, last_line)) = text.rsplit_once('\n') {
      if last_line.trim() == CODE_FENCE {
        text = body;
      }
    }
    text = text.trim();
  }

  if let Some(rest) = text.strip_suffix(CODE_FENCE) {
    text = rest.trim();
  }

  if let Some(rest) = text.strip_prefix(LANGUAGE_TAG) {
    text = rest.trim();
  }

  text
}

fn truncate(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
