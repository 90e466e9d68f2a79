use log::{error, info};

use crate::app::Route;
use crate::model::DatabaseCredentials;
use crate::service::DatabaseConnector;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectOutcome {
  Connected(Route),
  Failed(String),
}

/// Startup dialog collecting the backend's database connection. It cannot be
/// dismissed; it only closes after a successful connection.
pub struct DatabaseConfigDialog<'a, C: DatabaseConnector> {
  connector: &'a C,
  state: AppState,
  pub credentials: DatabaseCredentials,
  error_message: Option<String>,
  closed: bool,
}

impl<'a, C: DatabaseConnector> DatabaseConfigDialog<'a, C> {
  pub fn new(connector: &'a C, state: &AppState) -> Self {
    Self {
      connector,
      state: state.clone(),
      credentials: DatabaseCredentials::default(),
      error_message: None,
      closed: false,
    }
  }

  pub fn error_message(&self) -> Option<&str> {
    self.error_message.as_deref()
  }

  pub fn is_closed(&self) -> bool {
    self.closed
  }

  pub fn connect(&mut self) -> ConnectOutcome {
    match self.connector.configure_database(&self.credentials) {
      Ok(reply) => {
        info!("Database configured: {}", reply.trim());
        self.state.set_db_ready(true);
        self.error_message = None;
        self.closed = true;
        ConnectOutcome::Connected(Route::default())
      }
      Err(err) => {
        error!("Connection failed: {}", err);
        let message = err.connection_message();
        self.error_message = Some(message.clone());
        ConnectOutcome::Failed(message)
      }
    }
  }
}
