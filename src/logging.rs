//! Tracing subscriber setup

use std::env;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Json,
  Pretty,
}

impl LogFormat {
  fn parse(raw: Option<&str>) -> Self {
    match raw.map(str::trim) {
      Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    }
  }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  pub level: String,
  pub format: LogFormat,
}

impl LoggingConfig {
  /// `RUST_LOG` (default `info`) and `LOG_FORMAT` (`json` or pretty)
  pub fn from_env() -> Self {
    Self {
      level: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LEVEL.to_string()),
      format: LogFormat::parse(env::var("LOG_FORMAT").ok().as_deref()),
    }
  }

  fn filter(&self) -> EnvFilter {
    EnvFilter::try_new(&self.level)
      .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
      .add_directive(
        "hyper=warn"
          .parse()
          .unwrap_or_else(|_| tracing::Level::WARN.into()),
      )
      .add_directive(
        "reqwest=warn"
          .parse()
          .unwrap_or_else(|_| tracing::Level::WARN.into()),
      )
  }

  /// Install the global subscriber. Fails if one is already set.
  pub fn init(&self) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(self.filter());

    match self.format {
      LogFormat::Json => registry
        .with(fmt::layer().json().with_current_span(true))
        .try_init(),
      LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    }
  }
}
