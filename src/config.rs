use clap::Parser;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Trading Card Manager - terminal client for a card collection backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "tradingcard-manager", version)]
pub struct Cli {
  /// Origin of the backend; `/api/...` paths are appended to it.
  #[arg(long = "api-url", env = "TRADINGCARD_API_URL", default_value = DEFAULT_API_URL)]
  pub api_url: String,

  /// Request timeout in seconds.
  #[arg(long, env = "TRADINGCARD_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
  pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
  pub base_url: String,
  pub timeout: Duration,
}

impl ClientConfig {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, String> {
    let normalized = base_url.trim().trim_end_matches('/').to_string();
    if normalized.is_empty() {
      return Err("API url is required.".to_string());
    }
    if !normalized.starts_with("http://") && !normalized.starts_with("https://") {
      return Err(format!(
        "Unsupported API url '{}'. Expected an http:// or https:// origin.",
        normalized
      ));
    }
    Ok(Self {
      base_url: normalized,
      timeout,
    })
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_API_URL.to_string(),
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
    }
  }
}

impl TryFrom<&Cli> for ClientConfig {
  type Error = String;

  fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
    ClientConfig::new(&cli.api_url, Duration::from_secs(cli.timeout))
  }
}
