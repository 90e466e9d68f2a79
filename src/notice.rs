use chrono::{DateTime, Duration, Utc};

pub const NOTICE_MS: i64 = 3000;
pub const ERROR_NOTICE_MS: i64 = 4000;

/// A transient message shown to the user for a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
  pub message: String,
  pub raised_at: DateTime<Utc>,
  pub duration: Duration,
}

impl Notice {
  pub fn new(message: impl Into<String>, duration_ms: i64) -> Self {
    Self {
      message: message.into(),
      raised_at: Utc::now(),
      duration: Duration::milliseconds(duration_ms),
    }
  }

  pub fn info(message: impl Into<String>) -> Self {
    Self::new(message, NOTICE_MS)
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self::new(message, ERROR_NOTICE_MS)
  }

  pub fn expires_at(&self) -> DateTime<Utc> {
    self.raised_at + self.duration
  }

  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at()
  }
}
