use serde_json::Value;
use thiserror::Error;

/// Body of a non-2xx response, kept as the server sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
  Json(Value),
  Text(String),
  Empty,
}

impl ErrorBody {
  pub fn parse(text: &str, is_json: bool) -> Self {
    if text.trim().is_empty() {
      return ErrorBody::Empty;
    }
    if is_json {
      if let Ok(value) = serde_json::from_str::<Value>(text) {
        return ErrorBody::Json(value);
      }
    }
    ErrorBody::Text(text.to_string())
  }

  /// Non-empty value of a top-level key of a JSON object body.
  pub fn field(&self, key: &str) -> Option<String> {
    let ErrorBody::Json(Value::Object(map)) = self else {
      return None;
    };
    match map.get(key)? {
      Value::Null => None,
      Value::String(text) if text.trim().is_empty() => None,
      Value::String(text) => Some(text.clone()),
      other => Some(other.to_string()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("Http failure response for {url}: {status}")]
  Status {
    url: String,
    status: u16,
    body: ErrorBody,
  },

  #[error("unexpected response from {url}: {message}")]
  Decode { url: String, message: String },

  #[error("could not read {path}: {message}")]
  File { path: String, message: String },
}

impl ApiError {
  pub fn body(&self) -> Option<&ErrorBody> {
    match self {
      ApiError::Status { body, .. } => Some(body),
      _ => None,
    }
  }

  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  fn body_field(&self, key: &str) -> Option<String> {
    self.body().and_then(|body| body.field(key))
  }

  /// Transient notice text: the server's `error` field, else `fallback`.
  pub fn notice_message(&self, fallback: &str) -> String {
    self
      .body_field("error")
      .unwrap_or_else(|| fallback.to_string())
  }

  /// Inline form message: `error`, then `details`, then the error's own
  /// message, each prefixed with `fallback`.
  pub fn backend_message(&self, fallback: &str) -> String {
    if let Some(error) = self.body_field("error") {
      return format!("{}: {}", fallback, error);
    }
    if let Some(details) = self.body_field("details") {
      return format!("{}: {}", fallback, details);
    }
    let message = self.to_string();
    if !message.trim().is_empty() {
      return format!("{}: {}", fallback, message);
    }
    fallback.to_string()
  }

  /// Message for a failed database configuration: a plain-text body as is,
  /// else a JSON `message`, else a generic text.
  pub fn connection_message(&self) -> String {
    match self.body() {
      Some(ErrorBody::Text(text)) => text.clone(),
      Some(body) => body
        .field("message")
        .unwrap_or_else(|| "Connection failed".to_string()),
      None => "Connection failed".to_string(),
    }
  }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn status_error(body: ErrorBody) -> ApiError {
    ApiError::Status {
      url: "http://localhost:8080/api/cards".to_string(),
      status: 400,
      body,
    }
  }

  #[test]
  fn backend_message_prefers_error_then_details() {
    let with_error = status_error(ErrorBody::Json(json!({"error": "Card already exists"})));
    assert_eq!(with_error.backend_message("Add failed"), "Add failed: Card already exists");

    let with_details = status_error(ErrorBody::Json(json!({"details": "Bad Request"})));
    assert_eq!(with_details.backend_message("Update failed"), "Update failed: Bad Request");
  }

  #[test]
  fn backend_message_falls_back_to_error_text() {
    let transport = ApiError::Transport {
      url: "http://localhost:8080/api/cards".to_string(),
      message: "connection refused".to_string(),
    };
    assert_eq!(
      transport.backend_message("Add failed"),
      "Add failed: request to http://localhost:8080/api/cards failed: connection refused"
    );
  }

  #[test]
  fn notice_message_uses_error_field_only() {
    let error = status_error(ErrorBody::Json(json!({"error": "Card not found"})));
    assert_eq!(error.notice_message("Delete failed"), "Card not found");

    let details_only = status_error(ErrorBody::Json(json!({"details": "boom"})));
    assert_eq!(details_only.notice_message("Delete failed"), "Delete failed");
  }

  #[test]
  fn connection_message_reads_text_then_message() {
    let text = status_error(ErrorBody::Text("Connection failed: Access denied".to_string()));
    assert_eq!(text.connection_message(), "Connection failed: Access denied");

    let json_message = status_error(ErrorBody::Json(json!({"message": "Unknown database"})));
    assert_eq!(json_message.connection_message(), "Unknown database");

    assert_eq!(status_error(ErrorBody::Empty).connection_message(), "Connection failed");
  }

  #[test]
  fn parse_keeps_invalid_json_as_text() {
    assert_eq!(ErrorBody::parse("  ", true), ErrorBody::Empty);
    assert_eq!(
      ErrorBody::parse("not json", true),
      ErrorBody::Text("not json".to_string())
    );
  }
}
