use log::warn;

use crate::model::{Card, Rarity};
use crate::notice::Notice;
use crate::service::CardApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
  CardNumber,
  CardName,
  CardGame,
  Rarity,
  DatePurchased,
  DateSetPublished,
  PurchasePrice,
  Foiled,
}

impl CardField {
  pub const ALL: [CardField; 8] = [
    CardField::CardNumber,
    CardField::CardName,
    CardField::CardGame,
    CardField::Rarity,
    CardField::DatePurchased,
    CardField::DateSetPublished,
    CardField::PurchasePrice,
    CardField::Foiled,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      CardField::CardNumber => "Card number",
      CardField::CardName => "Card name",
      CardField::CardGame => "Card game",
      CardField::Rarity => "Rarity",
      CardField::DatePurchased => "Date purchased",
      CardField::DateSetPublished => "Date set published",
      CardField::PurchasePrice => "Purchase price",
      CardField::Foiled => "Foiled",
    }
  }

  pub fn is_required(&self) -> bool {
    !matches!(self, CardField::Foiled)
  }
}

/// Raw form values, kept as typed text until the form is submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardForm {
  pub card_number: String,
  pub card_name: String,
  pub card_game: String,
  pub rarity: String,
  pub date_purchased: String,
  pub date_set_published: String,
  pub purchase_price: String,
  pub foiled: bool,
  touched: bool,
}

impl CardForm {
  pub fn from_card(card: &Card) -> Self {
    Self {
      card_number: card.card_number.to_string(),
      card_name: card.card_name.clone(),
      card_game: card.card_game.clone(),
      rarity: card.rarity.map(|rarity| rarity.to_string()).unwrap_or_default(),
      date_purchased: card.date_purchased.clone(),
      date_set_published: card.date_set_published.clone(),
      purchase_price: card
        .purchase_price
        .map(|price| price.to_string())
        .unwrap_or_default(),
      foiled: card.foiled,
      touched: false,
    }
  }

  pub fn value(&self, field: CardField) -> String {
    match field {
      CardField::CardNumber => self.card_number.clone(),
      CardField::CardName => self.card_name.clone(),
      CardField::CardGame => self.card_game.clone(),
      CardField::Rarity => self.rarity.clone(),
      CardField::DatePurchased => self.date_purchased.clone(),
      CardField::DateSetPublished => self.date_set_published.clone(),
      CardField::PurchasePrice => self.purchase_price.clone(),
      CardField::Foiled => self.foiled.to_string(),
    }
  }

  pub fn set(&mut self, field: CardField, value: &str) {
    let text = value.to_string();
    match field {
      CardField::CardNumber => self.card_number = text,
      CardField::CardName => self.card_name = text,
      CardField::CardGame => self.card_game = text,
      CardField::Rarity => self.rarity = text,
      CardField::DatePurchased => self.date_purchased = text,
      CardField::DateSetPublished => self.date_set_published = text,
      CardField::PurchasePrice => self.purchase_price = text,
      CardField::Foiled => {
        self.foiled = matches!(
          value.trim().to_lowercase().as_str(),
          "true" | "1" | "yes" | "y"
        )
      }
    }
  }

  pub fn mark_all_touched(&mut self) {
    self.touched = true;
  }

  pub fn is_touched(&self) -> bool {
    self.touched
  }

  pub fn field_error(&self, field: CardField) -> Option<String> {
    if !field.is_required() {
      return None;
    }
    let value = self.value(field);
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Some(format!("{} is required.", field.label()));
    }
    match field {
      CardField::CardNumber if trimmed.parse::<i64>().is_err() => {
        Some(format!("{} must be a whole number.", field.label()))
      }
      CardField::PurchasePrice if trimmed.replace('$', "").parse::<f64>().is_err() => {
        Some(format!("{} must be a number.", field.label()))
      }
      CardField::Rarity => trimmed.parse::<Rarity>().err(),
      _ => None,
    }
  }

  pub fn invalid_fields(&self) -> Vec<CardField> {
    CardField::ALL
      .into_iter()
      .filter(|field| self.field_error(*field).is_some())
      .collect()
  }

  pub fn is_valid(&self) -> bool {
    self.invalid_fields().is_empty()
  }

  pub fn to_card(&self, id: Option<i64>) -> Option<Card> {
    if !self.is_valid() {
      return None;
    }
    Some(Card {
      id,
      card_number: self.card_number.trim().parse().ok()?,
      card_name: self.card_name.trim().to_string(),
      card_game: self.card_game.trim().to_string(),
      rarity: Some(self.rarity.parse().ok()?),
      date_purchased: self.date_purchased.trim().to_string(),
      date_set_published: self.date_set_published.trim().to_string(),
      purchase_price: Some(self.purchase_price.trim().replace('$', "").parse().ok()?),
      foiled: self.foiled,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
  Add,
  Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
  Invalid(Vec<CardField>),
  Saved(Card),
  Failed(String),
}

/// Add/edit form for one card. The mode is decided by the seed passed to
/// [`CardDialog::new`] and never changes.
pub struct CardDialog<'a, A: CardApi> {
  api: &'a A,
  mode: DialogMode,
  seed_id: Option<i64>,
  pub form: CardForm,
  error: Option<String>,
  notices: Vec<Notice>,
  result: Option<Option<Card>>,
}

impl<'a, A: CardApi> CardDialog<'a, A> {
  pub fn new(api: &'a A, seed: Option<&Card>) -> Self {
    let (mode, form, seed_id) = match seed {
      Some(card) => (DialogMode::Edit, CardForm::from_card(card), card.id),
      None => (DialogMode::Add, CardForm::default(), None),
    };
    Self {
      api,
      mode,
      seed_id,
      form,
      error: None,
      notices: Vec::new(),
      result: None,
    }
  }

  pub fn mode(&self) -> DialogMode {
    self.mode
  }

  pub fn title(&self) -> &'static str {
    match self.mode {
      DialogMode::Add => "Add Card",
      DialogMode::Edit => "Modify Card",
    }
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn take_notices(&mut self) -> Vec<Notice> {
    std::mem::take(&mut self.notices)
  }

  pub fn is_closed(&self) -> bool {
    self.result.is_some()
  }

  pub fn submit(&mut self) -> SubmitOutcome {
    self.form.mark_all_touched();
    let Some(card) = self.form.to_card(self.seed_id) else {
      return SubmitOutcome::Invalid(self.form.invalid_fields());
    };

    let (result, success, fallback) = match self.mode {
      DialogMode::Add => (self.api.add_card(&card), "Card added successfully!", "Add failed"),
      DialogMode::Edit => (
        self.api.update_card(&card),
        "Card updated successfully!",
        "Update failed",
      ),
    };

    match result {
      Ok(saved) => {
        self.error = None;
        self.notices.push(Notice::info(success));
        self.result = Some(Some(saved.clone()));
        SubmitOutcome::Saved(saved)
      }
      Err(error) => {
        let message = error.backend_message(fallback);
        warn!("Card #{} not saved: {}", card.card_number, error);
        self.notices.push(Notice::error(message.clone()));
        self.error = Some(message.clone());
        SubmitOutcome::Failed(message)
      }
    }
  }

  pub fn cancel(&mut self) {
    self.result = Some(None);
  }

  /// The card the dialog closed with; `None` when cancelled or still open.
  pub fn into_result(self) -> Option<Card> {
    self.result.flatten()
  }
}
