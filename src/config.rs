//! Runtime configuration
//!
//! Everything comes from the environment (optionally via `.env`) once at
//! startup and is then passed around explicitly. Nothing downstream reads
//! env vars on its own.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// ---------------------------------------------------------------------------
/// Environment Keys and Defaults
/// ---------------------------------------------------------------------------

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
const API_URL_VAR: &str = "OPENROUTER_API_URL";
const MODEL_VAR: &str = "OPENROUTER_MODEL";
const TIMEOUT_VAR: &str = "LLM_TIMEOUT_SECS";
const MAX_TOKENS_VAR: &str = "LLM_MAX_TOKENS";
const TEMPERATURE_VAR: &str = "LLM_TEMPERATURE";
const HOST_VAR: &str = "HOST";
const PORT_VAR: &str = "PORT";

const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Invalid value for {name}: {reason}")]
  Invalid { name: &'static str, reason: String },
}

/// ---------------------------------------------------------------------------
/// LLM Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LlmConfig {
  /// `None` when unset or blank; checked per request, not at startup
  pub api_key: Option<String>,
  pub endpoint: String,
  pub model: String,
  pub timeout_secs: u64,
  pub max_tokens: u32,
  pub temperature: f32,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      api_key: None,
      endpoint: DEFAULT_API_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      max_tokens: DEFAULT_MAX_TOKENS,
      temperature: DEFAULT_TEMPERATURE,
    }
  }
}

impl LlmConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let endpoint = env::var(API_URL_VAR).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
      name: API_URL_VAR,
      reason: e.to_string(),
    })?;

    Ok(Self {
      api_key: env::var(API_KEY_VAR)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()),
      endpoint,
      model: env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
      timeout_secs: parse_var(TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS)?,
      max_tokens: parse_var(MAX_TOKENS_VAR, DEFAULT_MAX_TOKENS)?,
      temperature: parse_var(TEMPERATURE_VAR, DEFAULT_TEMPERATURE)?,
    })
  }

  pub fn has_api_key(&self) -> bool {
    self.api_key.is_some()
  }

  pub fn api_key_status(&self) -> &'static str {
    if self.has_api_key() {
      "configured"
    } else {
      "missing"
    }
  }
}

/// ---------------------------------------------------------------------------
/// Server Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      host: env::var(HOST_VAR).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
      port: parse_var(PORT_VAR, DEFAULT_PORT)?,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

/// ---------------------------------------------------------------------------
/// Application Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
  pub llm: LlmConfig,
  pub server: ServerConfig,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      llm: LlmConfig::from_env()?,
      server: ServerConfig::from_env()?,
    })
  }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
  T: FromStr,
  T::Err: Display,
{
  match env::var(name) {
    Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
      name,
      reason: format!("{:?}: {}", raw, e),
    }),
    Err(_) => Ok(default),
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const ALL_VARS: [&str; 8] = [
    API_KEY_VAR,
    API_URL_VAR,
    MODEL_VAR,
    TIMEOUT_VAR,
    MAX_TOKENS_VAR,
    TEMPERATURE_VAR,
    HOST_VAR,
    PORT_VAR,
  ];

  /// Every known var, unset unless overridden
  fn env_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, Option<&'static str>)> {
    ALL_VARS
      .iter()
      .map(|var| {
        let value = overrides.iter().find(|(k, _)| k == var).map(|(_, v)| *v);
        (*var, value)
      })
      .collect()
  }

  #[test]
  #[serial]
  fn test_defaults_when_env_empty() {
    temp_env::with_vars(env_with(&[]), || {
      let config = AppConfig::from_env().unwrap();

      assert!(config.llm.api_key.is_none());
      assert_eq!(config.llm.api_key_status(), "missing");
      assert_eq!(config.llm.endpoint, DEFAULT_API_URL);
      assert_eq!(config.llm.model, "openai/gpt-4o-mini");
      assert_eq!(config.llm.timeout_secs, 60);
      assert_eq!(config.llm.max_tokens, 2000);
      assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
    });
  }

  #[test]
  #[serial]
  fn test_overrides_from_env() {
    let vars = env_with(&[
      (API_KEY_VAR, "sk-test"),
      (MODEL_VAR, "deepseek/deepseek-r1:free"),
      (TIMEOUT_VAR, "15"),
      (PORT_VAR, "8080"),
    ]);

    temp_env::with_vars(vars, || {
      let config = AppConfig::from_env().unwrap();

      assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
      assert_eq!(config.llm.api_key_status(), "configured");
      assert_eq!(config.llm.model, "deepseek/deepseek-r1:free");
      assert_eq!(config.llm.timeout_secs, 15);
      assert_eq!(config.server.port, 8080);
    });
  }

  #[test]
  #[serial]
  fn test_blank_api_key_treated_as_missing() {
    let vars = env_with(&[(API_KEY_VAR, "   ")]);

    temp_env::with_vars(vars, || {
      let config = LlmConfig::from_env().unwrap();
      assert!(!config.has_api_key());
    });
  }

  #[test]
  #[serial]
  fn test_unparsable_number_is_config_error() {
    let vars = env_with(&[(PORT_VAR, "not-a-port")]);

    temp_env::with_vars(vars, || {
      let err = AppConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("PORT"), "got: {}", err);
    });
  }

  #[test]
  #[serial]
  fn test_invalid_endpoint_url_rejected() {
    let vars = env_with(&[(API_URL_VAR, "not a url")]);

    temp_env::with_vars(vars, || {
      let err = LlmConfig::from_env().unwrap_err();
      assert!(err.to_string().contains(API_URL_VAR));
    });
  }
}
