pub mod app;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod dialogs;
pub mod error;
pub mod model;
pub mod notice;
pub mod service;
pub mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, ClientConfig};
use crate::console::Console;
use crate::service::CardService;
use crate::state::AppState;

fn init_logging() {
  let default_level = if cfg!(debug_assertions) { "info" } else { "warn" };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  // Also installs the bridge that forwards `log` records.
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

pub fn run() -> Result<(), String> {
  let cli = Cli::parse();
  init_logging();

  let config = ClientConfig::try_from(&cli)?;
  log::info!("Using backend at {}", config.base_url);
  let service = CardService::new(config)?;
  let mut console = Console::new()?;

  console::run_session(&service, AppState::new(), &mut console)
}
