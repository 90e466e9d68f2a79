use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: &str = "3306";
pub const DEFAULT_DB_NAME: &str = "trading_card_manager_db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
  Common,
  Rare,
  Hero,
  Legendary,
}

impl Rarity {
  pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Hero, Rarity::Legendary];

  pub fn as_str(&self) -> &'static str {
    match self {
      Rarity::Common => "COMMON",
      Rarity::Rare => "RARE",
      Rarity::Hero => "HERO",
      Rarity::Legendary => "LEGENDARY",
    }
  }
}

impl fmt::Display for Rarity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Rarity {
  type Err = String;

  /// Case-insensitive: the backend entity serializes labels as `Common`,
  /// while card bodies sent by this client use `COMMON`.
  fn from_str(value: &str) -> Result<Self, Self::Err> {
    let normalized = value.trim().to_uppercase();
    Rarity::ALL
      .into_iter()
      .find(|rarity| rarity.as_str() == normalized)
      .ok_or_else(|| {
        format!(
          "Unknown rarity '{}'. Expected one of COMMON, RARE, HERO, LEGENDARY.",
          value.trim()
        )
      })
  }
}

impl Serialize for Rarity {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Rarity {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<i64>,
  pub card_number: i64,
  pub card_name: String,
  pub card_game: String,
  /// The backend column is nullable.
  #[serde(default)]
  pub rarity: Option<Rarity>,
  pub date_purchased: String,
  pub date_set_published: String,
  /// Null for cards stored without a price; those are left out of the totals.
  #[serde(default, deserialize_with = "price_from_number_or_text")]
  pub purchase_price: Option<f64>,
  #[serde(default)]
  pub foiled: bool,
}

fn price_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawPrice {
    Number(f64),
    Text(String),
  }

  match Option::<RawPrice>::deserialize(deserializer)? {
    None => Ok(None),
    Some(RawPrice::Number(value)) => Ok(Some(value)),
    Some(RawPrice::Text(text)) if text.trim().is_empty() => Ok(None),
    Some(RawPrice::Text(text)) => text
      .trim()
      .replace('$', "")
      .parse::<f64>()
      .map(Some)
      .map_err(|e| serde::de::Error::custom(format!("invalid purchasePrice '{}': {}", text, e))),
  }
}

/// Aggregates from `/api/cards/stats`. The backend owns the shape, so keys this
/// client does not know about are kept in `extra`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
  pub total_spent: Option<f64>,
  pub total_cards: Option<i64>,
  pub total_foiled: Option<i64>,
  pub percent_foiled: Option<f64>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionValue {
  pub owner_value: f64,
  pub market_value: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCredentials {
  pub host: String,
  pub port: String,
  pub database_name: String,
  pub username: String,
  pub password: String,
}

impl Default for DatabaseCredentials {
  fn default() -> Self {
    Self {
      host: DEFAULT_DB_HOST.to_string(),
      port: DEFAULT_DB_PORT.to_string(),
      database_name: DEFAULT_DB_NAME.to_string(),
      username: String::new(),
      password: String::new(),
    }
  }
}

/// A file picked for import. The content is opaque to the client.
#[derive(Clone, Debug, PartialEq)]
pub struct FileUpload {
  pub file_name: String,
  pub bytes: Vec<u8>,
}
