use std::process;

fn main() {
  if let Err(error) = tradingcard_lib::run() {
    eprintln!("tradingcard-manager: {}", error);
    process::exit(1);
  }
}
