use log::info;

use crate::dashboard::CardDashboard;
use crate::dialogs::{DatabaseConfigDialog, DialogHost};
use crate::service::{CardApi, DatabaseConnector};
use crate::state::AppState;

pub const APP_TITLE: &str = "Trading Card Manager";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
  #[default]
  Dashboard,
}

/// Root of the application: nothing else is reachable until the database
/// connection has been configured.
pub struct App<'a, S: CardApi + DatabaseConnector> {
  service: &'a S,
  state: AppState,
  route: Option<Route>,
}

impl<'a, S: CardApi + DatabaseConnector> App<'a, S> {
  pub fn new(service: &'a S, state: AppState) -> Self {
    Self {
      service,
      state,
      route: None,
    }
  }

  pub fn state(&self) -> &AppState {
    &self.state
  }

  pub fn route(&self) -> Option<Route> {
    self.route
  }

  /// Opens the database configuration dialog. Returns `false` when the user
  /// quit instead of connecting.
  pub fn start<H: DialogHost>(&mut self, host: &mut H) -> bool {
    let dialog = DatabaseConfigDialog::new(self.service, &self.state);
    match host.run_database_config(dialog) {
      Some(route) => {
        info!("{} ready, showing {:?}", APP_TITLE, route);
        self.route = Some(route);
        true
      }
      None => false,
    }
  }

  pub fn dashboard(&self) -> CardDashboard<'a, S> {
    CardDashboard::new(self.service, &self.state)
  }
}
