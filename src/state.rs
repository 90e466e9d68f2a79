use std::sync::Arc;
use tokio::sync::watch;

/// Whether the backend's data store has been configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DbStatus {
  #[default]
  NotConfigured,
  Ready,
}

impl DbStatus {
  pub fn is_ready(&self) -> bool {
    matches!(self, DbStatus::Ready)
  }
}

/// Application-wide state shared by the dialogs and the dashboard.
#[derive(Clone)]
pub struct AppState {
  db_status: Arc<watch::Sender<DbStatus>>,
}

impl AppState {
  pub fn new() -> Self {
    let (sender, _) = watch::channel(DbStatus::NotConfigured);
    Self {
      db_status: Arc::new(sender),
    }
  }

  pub fn set_db_ready(&self, ready: bool) {
    let status = if ready {
      DbStatus::Ready
    } else {
      DbStatus::NotConfigured
    };
    let previous = self.db_status.send_replace(status);
    if previous != status {
      log::info!("Database status changed: {:?} -> {:?}", previous, status);
    }
  }

  pub fn db_status(&self) -> DbStatus {
    *self.db_status.borrow()
  }

  pub fn subscribe(&self) -> StateSubscription {
    StateSubscription {
      receiver: self.db_status.subscribe(),
      replayed: false,
    }
  }
}

impl Default for AppState {
  fn default() -> Self {
    Self::new()
  }
}

/// Reader side of [`AppState`]. The first poll always yields the current
/// status; later polls yield a status only when it changed since the last one.
pub struct StateSubscription {
  receiver: watch::Receiver<DbStatus>,
  replayed: bool,
}

impl StateSubscription {
  pub fn poll(&mut self) -> Option<DbStatus> {
    if !self.replayed {
      self.replayed = true;
      return Some(*self.receiver.borrow_and_update());
    }
    match self.receiver.has_changed() {
      Ok(true) => Some(*self.receiver.borrow_and_update()),
      _ => None,
    }
  }
}
