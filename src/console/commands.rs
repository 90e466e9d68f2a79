/// A dashboard action typed at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
  List,
  Select(i64),
  Add,
  Modify,
  Delete,
  Import(String),
  Stats,
  Value,
  Refresh,
  Help,
  Quit,
}

pub const HELP: &str = "\
Commands:
  list               show all cards
  select <number>    select the card with that card number
  add                add a new card
  modify             edit the selected card
  delete             delete the selected card
  import <path>      import cards from a file
  stats              show collection statistics
  value              show the collection value
  refresh            reload cards and statistics
  help               show this help
  quit               leave the application";

pub fn parse_command(line: &str) -> Result<Command, String> {
  let trimmed = line.trim();
  let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
    Some((keyword, rest)) => (keyword, rest.trim()),
    None => (trimmed, ""),
  };

  match keyword.to_lowercase().as_str() {
    "list" | "ls" => Ok(Command::List),
    "select" | "sel" => {
      if rest.is_empty() {
        return Err("Usage: select <card number>".to_string());
      }
      rest
        .parse::<i64>()
        .map(Command::Select)
        .map_err(|_| format!("Invalid card number '{}': must be a numeric value.", rest))
    }
    "add" => Ok(Command::Add),
    "modify" | "edit" => Ok(Command::Modify),
    "delete" | "rm" => Ok(Command::Delete),
    "import" => {
      let path = rest.trim_matches('"');
      if path.is_empty() {
        return Err("Usage: import <path>".to_string());
      }
      Ok(Command::Import(path.to_string()))
    }
    "stats" => Ok(Command::Stats),
    "value" | "values" => Ok(Command::Value),
    "refresh" | "reload" => Ok(Command::Refresh),
    "help" | "?" => Ok(Command::Help),
    "quit" | "exit" | "q" => Ok(Command::Quit),
    "" => Err(String::new()),
    other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
  }
}
