use crate::model::CollectionValue;

/// Rounds to the nearest hundred with halves going up, so `-150` becomes
/// `-100` rather than `-200`.
pub fn round_to_hundred(value: f64) -> f64 {
  if !value.is_finite() {
    return value;
  }
  (value / 100.0 + 0.5).floor() * 100.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionValueDialog {
  pub owner_value: f64,
  pub market_value: f64,
  closed: bool,
}

impl CollectionValueDialog {
  pub fn new(value: CollectionValue) -> Self {
    Self {
      owner_value: round_to_hundred(value.owner_value),
      market_value: round_to_hundred(value.market_value),
      closed: false,
    }
  }

  pub fn owner_value_text(&self) -> String {
    format!("{:.0}", self.owner_value)
  }

  pub fn market_value_text(&self) -> String {
    format!("{:.0}", self.market_value)
  }

  pub fn close(&mut self) {
    self.closed = true;
  }

  pub fn is_closed(&self) -> bool {
    self.closed
  }
}
