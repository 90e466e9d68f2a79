mod card_dialog;
mod collection_value;
mod database_config;

pub use card_dialog::{CardDialog, CardField, CardForm, DialogMode, SubmitOutcome};
pub use collection_value::{round_to_hundred, CollectionValueDialog};
pub use database_config::{ConnectOutcome, DatabaseConfigDialog};

use crate::app::Route;
use crate::model::Card;
use crate::service::{CardApi, DatabaseConnector};

/// Whatever presents dialogs to the user. The view-models hold the behavior;
/// a host only collects input and decides when a dialog is submitted or
/// cancelled.
pub trait DialogHost {
  /// Drives the dialog until it closes and returns the card it closed with.
  fn run_card_dialog<A: CardApi>(&mut self, dialog: CardDialog<'_, A>) -> Option<Card>;

  /// Drives the dialog until it connects. `None` means the user gave up on
  /// the application altogether.
  fn run_database_config<C: DatabaseConnector>(
    &mut self,
    dialog: DatabaseConfigDialog<'_, C>,
  ) -> Option<Route>;

  fn show_collection_value(&mut self, dialog: CollectionValueDialog);

  fn confirm(&mut self, question: &str) -> bool;
}
