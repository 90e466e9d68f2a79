mod commands;
mod display;

pub use commands::{parse_command, Command, HELP};
pub use display::{render_cards, render_collection_value, render_notice, render_stats};

use dialoguer::theme::ColorfulTheme;
use dialoguer::Password;
use log::warn;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

use crate::app::{App, Route, APP_TITLE};
use crate::dashboard::CardDashboard;
use crate::dialogs::{
  CardDialog, CardField, CollectionValueDialog, ConnectOutcome, DatabaseConfigDialog, DialogHost,
  SubmitOutcome,
};
use crate::model::Card;
use crate::service::{CardApi, DatabaseConnector};
use crate::state::AppState;

/// Line-oriented terminal that presents the dialogs.
pub struct Console {
  editor: DefaultEditor,
}

impl Console {
  pub fn new() -> Result<Self, String> {
    let editor = DefaultEditor::new().map_err(|e| e.to_string())?;
    Ok(Self { editor })
  }

  /// `None` on end of input or interrupt.
  fn prompt(&mut self, label: &str, initial: &str) -> Option<String> {
    match self
      .editor
      .readline_with_initial(&format!("{}: ", label), (initial, ""))
    {
      Ok(line) => Some(line),
      Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => None,
      Err(err) => {
        warn!("Reading input failed: {}", err);
        None
      }
    }
  }

  /// Reads without echoing the typed characters.
  fn prompt_password(&mut self, label: &str) -> Option<String> {
    Password::with_theme(&ColorfulTheme::default())
      .with_prompt(label)
      .allow_empty_password(true)
      .interact()
      .map_err(|err| warn!("Reading password failed: {}", err))
      .ok()
  }

  fn ask_yes_no(&mut self, question: &str, default_yes: bool) -> bool {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    match self.editor.readline(&format!("{} {} ", question, hint)) {
      Ok(answer) => match answer.trim().to_lowercase().as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
      },
      Err(_) => false,
    }
  }

  fn fill_card_form<A: CardApi>(&mut self, dialog: &mut CardDialog<'_, A>) -> bool {
    for field in CardField::ALL {
      if field == CardField::Foiled {
        let answer = self.ask_yes_no("Foiled?", dialog.form.foiled);
        dialog.form.set(field, if answer { "true" } else { "false" });
        continue;
      }
      let label = if field == CardField::Rarity {
        "Rarity (COMMON, RARE, HERO, LEGENDARY)".to_string()
      } else {
        field.label().to_string()
      };
      let current = dialog.form.value(field);
      let Some(value) = self.prompt(&label, &current) else {
        return false;
      };
      dialog.form.set(field, &value);
    }
    true
  }
}

impl DialogHost for Console {
  fn run_card_dialog<A: CardApi>(&mut self, mut dialog: CardDialog<'_, A>) -> Option<Card> {
    println!("== {} ==", dialog.title());
    loop {
      if !self.fill_card_form(&mut dialog) {
        dialog.cancel();
        break;
      }
      match dialog.submit() {
        SubmitOutcome::Saved(_) => {
          display::print_notices(&dialog.take_notices());
          break;
        }
        SubmitOutcome::Invalid(fields) => {
          for field in fields {
            if let Some(message) = dialog.form.field_error(field) {
              println!("  {}", message);
            }
          }
        }
        SubmitOutcome::Failed(_) => {
          let _ = dialog.take_notices();
          if let Some(message) = dialog.error() {
            println!("  {}", message);
          }
        }
      }
      if !self.ask_yes_no("Edit and submit again?", true) {
        dialog.cancel();
        break;
      }
    }
    dialog.into_result()
  }

  fn run_database_config<C: DatabaseConnector>(
    &mut self,
    mut dialog: DatabaseConfigDialog<'_, C>,
  ) -> Option<Route> {
    println!("== Database Connection ==");
    loop {
      let credentials = dialog.credentials.clone();
      let host = self.prompt("Host", &credentials.host)?;
      let port = self.prompt("Port", &credentials.port)?;
      let database_name = self.prompt("Database name", &credentials.database_name)?;
      let username = self.prompt("Username", &credentials.username)?;
      let password = self.prompt_password("Password")?;

      dialog.credentials.host = host.trim().to_string();
      dialog.credentials.port = port.trim().to_string();
      dialog.credentials.database_name = database_name.trim().to_string();
      dialog.credentials.username = username.trim().to_string();
      dialog.credentials.password = password;

      match dialog.connect() {
        ConnectOutcome::Connected(route) => return Some(route),
        ConnectOutcome::Failed(_) => {
          if let Some(message) = dialog.error_message() {
            println!("  {}", message);
          }
        }
      }
    }
  }

  fn show_collection_value(&mut self, mut dialog: CollectionValueDialog) {
    println!("{}", render_collection_value(&dialog));
    let _ = self.editor.readline("Press Enter to close ");
    dialog.close();
  }

  fn confirm(&mut self, question: &str) -> bool {
    self.ask_yes_no(question, false)
  }
}

fn dispatch<A: CardApi>(
  command: Command,
  dashboard: &mut CardDashboard<'_, A>,
  console: &mut Console,
) -> bool {
  match command {
    Command::List => println!("{}", render_cards(dashboard.cards(), dashboard.selected())),
    Command::Select(card_number) => {
      if dashboard.select_by_number(card_number) {
        println!("Selected card #{}.", card_number);
      } else {
        println!("No card #{} in the list.", card_number);
      }
    }
    Command::Add => dashboard.open_add_dialog(console),
    Command::Modify | Command::Delete if dashboard.selected().is_none() => {
      println!("Select a card first.");
    }
    Command::Modify => dashboard.open_modify_dialog(console),
    Command::Delete => dashboard.delete_selected(console),
    Command::Import(path) => dashboard.upload_file(Some(Path::new(&path))),
    Command::Stats => println!(
      "{}",
      render_stats(dashboard.stats(), dashboard.collection_value())
    ),
    Command::Value => dashboard.open_stats_dialog(console),
    Command::Refresh => dashboard.load_dashboard_data(),
    Command::Help => println!("{}", HELP),
    Command::Quit => return false,
  }
  true
}

/// Runs the whole session: database configuration first, then the dashboard
/// command loop until `quit` or end of input.
pub fn run_session<S: CardApi + DatabaseConnector>(
  service: &S,
  state: AppState,
  console: &mut Console,
) -> Result<(), String> {
  println!("{}", APP_TITLE);
  let mut app = App::new(service, state);
  if !app.start(console) {
    println!("No database connection configured. Goodbye.");
    return Ok(());
  }

  let mut dashboard = app.dashboard();
  println!("{}", HELP);
  loop {
    dashboard.sync_db_status();
    display::print_notices(&dashboard.take_notices());

    let line = match console.editor.readline("cards> ") {
      Ok(line) => line,
      Err(ReadlineError::Interrupted) => continue,
      Err(ReadlineError::Eof) => break,
      Err(err) => return Err(err.to_string()),
    };
    if line.trim().is_empty() {
      continue;
    }
    let _ = console.editor.add_history_entry(line.as_str());

    match parse_command(&line) {
      Ok(command) => {
        if !dispatch(command, &mut dashboard, console) {
          break;
        }
      }
      Err(message) => println!("{}", message),
    }
    display::print_notices(&dashboard.take_notices());
  }
  Ok(())
}
