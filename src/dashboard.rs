use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::dialogs::{CardDialog, CollectionValueDialog, DialogHost};
use crate::error::{ApiError, ApiResult};
use crate::model::{Card, CollectionStats, CollectionValue, FileUpload};
use crate::notice::Notice;
use crate::service::CardApi;
use crate::state::{AppState, DbStatus, StateSubscription};

pub fn read_upload(path: &Path) -> ApiResult<FileUpload> {
  let bytes = fs::read(path).map_err(|e| ApiError::File {
    path: path.display().to_string(),
    message: e.to_string(),
  })?;
  let file_name = path
    .file_name()
    .map(|name| name.to_string_lossy().to_string())
    .unwrap_or_else(|| "upload".to_string());
  Ok(FileUpload { file_name, bytes })
}

/// Main view: the card table, collection statistics and the actions that
/// open the card dialogs. Every mutation is followed by a full reload.
pub struct CardDashboard<'a, A: CardApi> {
  api: &'a A,
  db_status: StateSubscription,
  loaded: bool,
  cards: Vec<Card>,
  stats: CollectionStats,
  collection_value: CollectionValue,
  selected: Option<Card>,
  notices: Vec<Notice>,
}

impl<'a, A: CardApi> CardDashboard<'a, A> {
  pub fn new(api: &'a A, state: &AppState) -> Self {
    Self {
      api,
      db_status: state.subscribe(),
      loaded: false,
      cards: Vec::new(),
      stats: CollectionStats::default(),
      collection_value: CollectionValue::default(),
      selected: None,
      notices: Vec::new(),
    }
  }

  /// Applies pending database status changes. The first `Ready` triggers the
  /// initial load; nothing after that re-arms it. Returns `true` when the
  /// initial load ran during this call.
  pub fn sync_db_status(&mut self) -> bool {
    let mut triggered = false;
    while let Some(status) = self.db_status.poll() {
      if status == DbStatus::Ready && !self.loaded {
        self.loaded = true;
        self.load_dashboard_data();
        triggered = true;
      }
    }
    triggered
  }

  pub fn cards(&self) -> &[Card] {
    &self.cards
  }

  pub fn stats(&self) -> &CollectionStats {
    &self.stats
  }

  pub fn collection_value(&self) -> CollectionValue {
    self.collection_value
  }

  pub fn selected(&self) -> Option<&Card> {
    self.selected.as_ref()
  }

  pub fn take_notices(&mut self) -> Vec<Notice> {
    std::mem::take(&mut self.notices)
  }

  pub fn load_dashboard_data(&mut self) {
    self.load_cards();
    self.load_stats();
    self.load_collection_value();
  }

  pub fn load_cards(&mut self) {
    match self.api.list_cards() {
      Ok(cards) => {
        debug!("Loaded {} cards", cards.len());
        self.cards = cards;
      }
      Err(err) => self.load_failed("cards", err),
    }
  }

  pub fn load_stats(&mut self) {
    match self.api.stats() {
      Ok(stats) => self.stats = stats,
      Err(err) => self.load_failed("statistics", err),
    }
  }

  pub fn load_collection_value(&mut self) {
    match self.api.collection_value() {
      Ok(value) => self.collection_value = value,
      Err(err) => self.load_failed("collection value", err),
    }
  }

  fn load_failed(&mut self, what: &str, err: ApiError) {
    warn!("Loading {} failed: {}", what, err);
    self
      .notices
      .push(Notice::error(err.notice_message(&format!("Could not load {}", what))));
  }

  /// Selects the listed card with the given number. Returns `false` when no
  /// such card is listed; the previous selection is kept.
  pub fn select_by_number(&mut self, card_number: i64) -> bool {
    let Some(card) = self.cards.iter().find(|card| card.card_number == card_number) else {
      return false;
    };
    self.selected = Some(card.clone());
    true
  }

  pub fn delete_selected<H: DialogHost>(&mut self, host: &mut H) {
    let Some(card_number) = self.selected.as_ref().map(|card| card.card_number) else {
      return;
    };
    if !host.confirm(&format!("Delete card #{}?", card_number)) {
      return;
    }

    match self.api.delete_card(card_number) {
      Ok(()) => {
        self.notices.push(Notice::info("Card deleted successfully!"));
        self.selected = None;
        self.load_dashboard_data();
      }
      Err(err) => {
        warn!("Deleting card #{} failed: {}", card_number, err);
        self.notices.push(Notice::info(err.notice_message("Delete failed")));
      }
    }
  }

  pub fn open_add_dialog<H: DialogHost>(&mut self, host: &mut H) {
    let dialog = CardDialog::new(self.api, None);
    if host.run_card_dialog(dialog).is_some() {
      self.load_dashboard_data();
    }
  }

  pub fn open_modify_dialog<H: DialogHost>(&mut self, host: &mut H) {
    let Some(seed) = self.selected.clone() else {
      return;
    };
    let dialog = CardDialog::new(self.api, Some(&seed));
    if let Some(updated) = host.run_card_dialog(dialog) {
      self.load_dashboard_data();
      self.selected = Some(updated);
    }
  }

  /// Imports the picked file, if any.
  pub fn upload_file(&mut self, path: Option<&Path>) {
    let Some(path) = path else {
      return;
    };
    match read_upload(path) {
      Ok(upload) => self.import_upload(&upload),
      Err(err) => {
        warn!("{}", err);
        self.notices.push(Notice::info(format!("Import failed: {}", err)));
      }
    }
  }

  pub fn import_upload(&mut self, upload: &FileUpload) {
    match self.api.import_cards(upload) {
      Ok(imported) => {
        info!("Imported {} cards from {}", imported.len(), upload.file_name);
        self
          .notices
          .push(Notice::info(format!("Imported {} cards", imported.len())));
        self.load_dashboard_data();
      }
      Err(err) => {
        warn!("Import of {} failed: {}", upload.file_name, err);
        self.notices.push(Notice::info(err.notice_message("Import failed")));
      }
    }
  }

  /// Shows the current collection value, fetched fresh rather than taken from
  /// the dashboard's loaded figures.
  pub fn open_stats_dialog<H: DialogHost>(&mut self, host: &mut H) {
    match self.api.collection_value() {
      Ok(value) => host.show_collection_value(CollectionValueDialog::new(value)),
      Err(err) => self.load_failed("collection value", err),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::app::Route;
  use crate::dialogs::{CardField, DatabaseConfigDialog};
  use crate::model::Rarity;
  use crate::service::fake::{not_found, Call, FakeCardApi};
  use crate::service::DatabaseConnector;

  #[derive(Default)]
  struct ScriptedHost {
    confirm_answer: bool,
    questions: Vec<String>,
    edits: Vec<(CardField, String)>,
    cancel_dialogs: bool,
    seeds: Vec<Option<String>>,
    shown_values: Vec<CollectionValueDialog>,
  }

  impl DialogHost for ScriptedHost {
    fn run_card_dialog<A: CardApi>(&mut self, mut dialog: CardDialog<'_, A>) -> Option<Card> {
      self.seeds.push(
        Some(dialog.form.card_name.clone()).filter(|name| !name.is_empty()),
      );
      if self.cancel_dialogs {
        dialog.cancel();
        return dialog.into_result();
      }
      for (field, value) in &self.edits {
        dialog.form.set(*field, value);
      }
      dialog.submit();
      if !dialog.is_closed() {
        dialog.cancel();
      }
      dialog.into_result()
    }

    fn run_database_config<C: DatabaseConnector>(
      &mut self,
      mut dialog: DatabaseConfigDialog<'_, C>,
    ) -> Option<Route> {
      match dialog.connect() {
        crate::dialogs::ConnectOutcome::Connected(route) => Some(route),
        crate::dialogs::ConnectOutcome::Failed(_) => None,
      }
    }

    fn show_collection_value(&mut self, dialog: CollectionValueDialog) {
      self.shown_values.push(dialog);
    }

    fn confirm(&mut self, question: &str) -> bool {
      self.questions.push(question.to_string());
      self.confirm_answer
    }
  }

  fn card(number: i64, name: &str) -> Card {
    Card {
      id: Some(number + 100),
      card_number: number,
      card_name: name.to_string(),
      card_game: "Mythos".to_string(),
      rarity: Some(Rarity::Rare),
      date_purchased: "2024-01-01".to_string(),
      date_set_published: "2020-01-01".to_string(),
      purchase_price: Some(10.0),
      foiled: false,
    }
  }

  fn reloads() -> Vec<Call> {
    vec![Call::List, Call::Stats, Call::Value]
  }

  fn ready_dashboard<'a>(api: &'a FakeCardApi, state: &AppState) -> CardDashboard<'a, FakeCardApi> {
    state.set_db_ready(true);
    let mut dashboard = CardDashboard::new(api, state);
    dashboard.sync_db_status();
    api.clear_calls();
    dashboard
  }

  #[test]
  fn waits_for_ready_before_loading() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    let state = AppState::new();
    let mut dashboard = CardDashboard::new(&api, &state);

    assert!(!dashboard.sync_db_status());
    assert!(api.calls().is_empty());

    state.set_db_ready(true);
    assert!(dashboard.sync_db_status());
    assert_eq!(api.calls(), reloads());
    assert_eq!(dashboard.cards().len(), 1);
  }

  #[test]
  fn ready_before_subscription_still_loads_exactly_once() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    let state = AppState::new();
    state.set_db_ready(true);

    let mut dashboard = CardDashboard::new(&api, &state);
    assert!(dashboard.sync_db_status());
    assert!(!dashboard.sync_db_status());

    state.set_db_ready(false);
    state.set_db_ready(true);
    dashboard.sync_db_status();

    assert_eq!(api.calls(), reloads());
  }

  #[test]
  fn delete_without_selection_is_a_no_op() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    let mut host = ScriptedHost {
      confirm_answer: true,
      ..ScriptedHost::default()
    };

    dashboard.delete_selected(&mut host);

    assert!(host.questions.is_empty());
    assert!(api.calls().is_empty());
  }

  #[test]
  fn delete_sends_card_number_and_reloads() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake"), card(2, "Tidecaller")]);
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    assert!(dashboard.select_by_number(2));
    let mut host = ScriptedHost {
      confirm_answer: true,
      ..ScriptedHost::default()
    };

    dashboard.delete_selected(&mut host);

    assert_eq!(host.questions, vec!["Delete card #2?".to_string()]);
    assert_eq!(api.cards.borrow()[0].id, Some(101));
    let mut expected = vec![Call::Delete(2)];
    expected.extend(reloads());
    assert_eq!(api.calls(), expected);
    assert!(dashboard.selected().is_none());
    assert_eq!(dashboard.cards(), api.cards.borrow().as_slice());
    assert_eq!(dashboard.take_notices()[0].message, "Card deleted successfully!");
  }

  #[test]
  fn declined_confirmation_sends_nothing() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    dashboard.select_by_number(1);
    let mut host = ScriptedHost::default();

    dashboard.delete_selected(&mut host);

    assert!(api.calls().is_empty());
    assert!(dashboard.selected().is_some());
  }

  #[test]
  fn failed_delete_keeps_selection_and_reports_server_error() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    api.fail("delete", not_found("/api/cards/delete/1"));
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    dashboard.select_by_number(1);
    let mut host = ScriptedHost {
      confirm_answer: true,
      ..ScriptedHost::default()
    };

    dashboard.delete_selected(&mut host);

    assert_eq!(api.calls(), vec![Call::Delete(1)]);
    assert!(dashboard.selected().is_some());
    assert_eq!(dashboard.take_notices()[0].message, "Card not found");
  }

  #[test]
  fn modify_scenario_puts_once_then_reloads() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    dashboard.select_by_number(1);
    let mut host = ScriptedHost {
      edits: vec![(CardField::CardName, "Ember Drake, Reborn".to_string())],
      ..ScriptedHost::default()
    };

    dashboard.open_modify_dialog(&mut host);

    let calls = api.calls();
    assert!(matches!(
      calls.first(),
      Some(Call::Update(c)) if c.card_number == 1 && c.id == Some(101)
    ));
    assert_eq!(calls[1..].to_vec(), reloads());
    assert_eq!(host.seeds, vec![Some("Ember Drake".to_string())]);
    assert_eq!(
      dashboard.selected().map(|c| c.card_name.as_str()),
      Some("Ember Drake, Reborn")
    );
    assert_eq!(dashboard.cards(), api.cards.borrow().as_slice());
  }

  #[test]
  fn modify_without_selection_opens_nothing() {
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    let mut host = ScriptedHost::default();

    dashboard.open_modify_dialog(&mut host);

    assert!(host.seeds.is_empty());
  }

  #[test]
  fn add_dialog_reloads_after_save() {
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    let mut host = ScriptedHost {
      edits: vec![
        (CardField::CardNumber, "9".to_string()),
        (CardField::CardName, "Stormcaller".to_string()),
        (CardField::CardGame, "Mythos".to_string()),
        (CardField::Rarity, "LEGENDARY".to_string()),
        (CardField::DatePurchased, "2024-02-02".to_string()),
        (CardField::DateSetPublished, "2023-02-02".to_string()),
        (CardField::PurchasePrice, "99.5".to_string()),
      ],
      ..ScriptedHost::default()
    };

    dashboard.open_add_dialog(&mut host);

    assert_eq!(host.seeds, vec![None]);
    assert_eq!(api.calls().len(), 4);
    assert_eq!(dashboard.cards().len(), 1);
    assert_eq!(dashboard.stats().total_cards, Some(1));
  }

  #[test]
  fn cancelled_dialog_does_not_reload() {
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    let mut host = ScriptedHost {
      cancel_dialogs: true,
      ..ScriptedHost::default()
    };

    dashboard.open_add_dialog(&mut host);

    assert!(api.calls().is_empty());
  }

  #[test]
  fn import_reports_count_and_reloads() {
    let api = FakeCardApi::default();
    *api.imported.borrow_mut() = vec![card(3, "Gale Sprite"), card(4, "Frost Giant")];
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);

    dashboard.import_upload(&FileUpload {
      file_name: "cards.txt".to_string(),
      bytes: b"3,Gale Sprite".to_vec(),
    });

    let mut expected = vec![Call::Import("cards.txt".to_string())];
    expected.extend(reloads());
    assert_eq!(api.calls(), expected);
    assert_eq!(dashboard.take_notices()[0].message, "Imported 2 cards");
    assert_eq!(dashboard.cards().len(), 2);
  }

  #[test]
  fn upload_without_file_is_a_no_op() {
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);

    dashboard.upload_file(None);

    assert!(api.calls().is_empty());
    assert!(dashboard.take_notices().is_empty());
  }

  #[test]
  fn unreadable_upload_is_reported_without_request() {
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);

    dashboard.upload_file(Some(Path::new("/nonexistent/cards.txt")));

    assert!(api.calls().is_empty());
    assert!(dashboard.take_notices()[0].message.starts_with("Import failed"));
  }

  #[test]
  fn upload_reads_the_picked_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("collection.txt");
    fs::write(&path, "5,Ash Wyrm,Mythos,HERO,2024-01-01,2020-01-01,3.00,false").unwrap();
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);

    dashboard.upload_file(Some(&path));

    assert_eq!(api.calls()[0], Call::Import("collection.txt".to_string()));
  }

  #[test]
  fn stats_dialog_fetches_fresh_value() {
    let api = FakeCardApi::default();
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    *api.value.borrow_mut() = CollectionValue {
      owner_value: 1234.0,
      market_value: 5678.0,
    };
    let mut host = ScriptedHost::default();

    dashboard.open_stats_dialog(&mut host);

    assert_eq!(api.calls(), vec![Call::Value]);
    assert_eq!(host.shown_values[0].owner_value, 1200.0);
    assert_eq!(host.shown_values[0].market_value, 5700.0);
    assert_eq!(dashboard.collection_value(), CollectionValue::default());
  }

  #[test]
  fn failed_load_keeps_previous_cards() {
    let api = FakeCardApi::with_cards(vec![card(1, "Ember Drake")]);
    let state = AppState::new();
    let mut dashboard = ready_dashboard(&api, &state);
    api.fail("list", not_found("/api/cards"));

    dashboard.load_cards();

    assert_eq!(dashboard.cards().len(), 1);
    assert_eq!(dashboard.take_notices()[0].message, "Card not found");
  }
}
