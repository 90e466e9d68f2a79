use log::{debug, info, warn};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::model::{Card, CollectionStats, CollectionValue, DatabaseCredentials, FileUpload};

const CARDS_PATH: &str = "/api/cards";
const CONFIGURE_DATABASE_PATH: &str = "/api/configure-database";

/// The card endpoints of the backend. Every method issues exactly one request
/// and hands back the decoded body; nothing is retried or cached.
pub trait CardApi {
  fn list_cards(&self) -> ApiResult<Vec<Card>>;
  fn get_card(&self, id: i64) -> ApiResult<Card>;
  fn add_card(&self, card: &Card) -> ApiResult<Card>;
  /// Keyed by `card.card_number`, not `card.id`.
  fn update_card(&self, card: &Card) -> ApiResult<Card>;
  fn delete_card(&self, id: i64) -> ApiResult<()>;
  fn import_cards(&self, upload: &FileUpload) -> ApiResult<Vec<Card>>;
  fn stats(&self) -> ApiResult<CollectionStats>;
  fn collection_value(&self) -> ApiResult<CollectionValue>;
}

pub trait DatabaseConnector {
  /// Returns the server's plain-text confirmation.
  fn configure_database(&self, credentials: &DatabaseCredentials) -> ApiResult<String>;
}

#[derive(Clone)]
pub struct CardService {
  client: Client,
  config: ClientConfig,
}

impl CardService {
  pub fn new(config: ClientConfig) -> Result<Self, String> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| e.to_string())?;
    Ok(Self { client, config })
  }

  fn cards_url(&self, suffix: &str) -> String {
    self.config.url(&format!("{}{}", CARDS_PATH, suffix))
  }

  fn send(&self, url: &str, request: RequestBuilder, json_errors: bool) -> ApiResult<Response> {
    debug!("{} -> sending", url);
    let response = request.send().map_err(|e| ApiError::Transport {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    if !response.status().is_success() {
      let status = response.status().as_u16();
      let is_json = json_errors
        || response
          .headers()
          .get(CONTENT_TYPE)
          .and_then(|value| value.to_str().ok())
          .map(|value| value.contains("json"))
          .unwrap_or(false);
      let text = response.text().unwrap_or_default();
      warn!("{} -> status {}", url, status);
      return Err(ApiError::Status {
        url: url.to_string(),
        status,
        body: ErrorBody::parse(&text, is_json),
      });
    }

    Ok(response)
  }

  fn fetch_json<T: DeserializeOwned>(&self, url: &str, request: RequestBuilder) -> ApiResult<T> {
    let response = self.send(url, request.header(ACCEPT, "application/json"), true)?;
    let body = response.text().map_err(|e| ApiError::Transport {
      url: url.to_string(),
      message: e.to_string(),
    })?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
      url: url.to_string(),
      message: e.to_string(),
    })
  }
}

impl CardApi for CardService {
  fn list_cards(&self) -> ApiResult<Vec<Card>> {
    let url = self.cards_url("");
    self.fetch_json(&url, self.client.get(&url))
  }

  fn get_card(&self, id: i64) -> ApiResult<Card> {
    let url = self.cards_url(&format!("/get/{}", id));
    self.fetch_json(&url, self.client.get(&url))
  }

  fn add_card(&self, card: &Card) -> ApiResult<Card> {
    let url = self.cards_url("");
    let body = Card {
      id: None,
      ..card.clone()
    };
    let created: Card = self.fetch_json(&url, self.client.post(&url).json(&body))?;
    info!("Added card #{}", created.card_number);
    Ok(created)
  }

  fn update_card(&self, card: &Card) -> ApiResult<Card> {
    let url = self.cards_url(&format!("/put/{}", card.card_number));
    let updated: Card = self.fetch_json(&url, self.client.put(&url).json(card))?;
    info!("Updated card #{}", updated.card_number);
    Ok(updated)
  }

  fn delete_card(&self, id: i64) -> ApiResult<()> {
    let url = self.cards_url(&format!("/delete/{}", id));
    self.send(&url, self.client.delete(&url), true)?;
    info!("Deleted card #{}", id);
    Ok(())
  }

  fn import_cards(&self, upload: &FileUpload) -> ApiResult<Vec<Card>> {
    let url = self.cards_url("/import");
    let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
    let form = Form::new().part("file", part);
    let imported: Vec<Card> = self.fetch_json(&url, self.client.post(&url).multipart(form))?;
    info!("Imported {} cards from {}", imported.len(), upload.file_name);
    Ok(imported)
  }

  fn stats(&self) -> ApiResult<CollectionStats> {
    let url = self.cards_url("/stats");
    self.fetch_json(&url, self.client.get(&url))
  }

  fn collection_value(&self) -> ApiResult<CollectionValue> {
    let url = self.cards_url("/values");
    self.fetch_json(&url, self.client.get(&url))
  }
}

impl DatabaseConnector for CardService {
  fn configure_database(&self, credentials: &DatabaseCredentials) -> ApiResult<String> {
    let url = self.config.url(CONFIGURE_DATABASE_PATH);
    let response = self.send(&url, self.client.post(&url).json(credentials), false)?;
    let text = response.text().map_err(|e| ApiError::Transport {
      url: url.clone(),
      message: e.to_string(),
    })?;
    info!(
      "Configured database {} on {}:{}",
      credentials.database_name, credentials.host, credentials.port
    );
    Ok(text)
  }
}
