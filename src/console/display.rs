use chrono::{DateTime, Local, Utc};

use crate::dialogs::CollectionValueDialog;
use crate::model::{Card, CollectionStats, CollectionValue};
use crate::notice::Notice;

const HEADERS: [&str; 8] = [
  "Number",
  "Name",
  "Game",
  "Rarity",
  "Purchased",
  "Set Published",
  "Price",
  "Foiled",
];

fn card_row(card: &Card) -> [String; 8] {
  [
    card.card_number.to_string(),
    card.card_name.clone(),
    card.card_game.clone(),
    card.rarity.map(|rarity| rarity.to_string()).unwrap_or_else(|| "-".to_string()),
    card.date_purchased.clone(),
    card.date_set_published.clone(),
    card
      .purchase_price
      .map(|price| format!("{:.2}", price))
      .unwrap_or_else(|| "-".to_string()),
    if card.foiled { "yes" } else { "no" }.to_string(),
  ]
}

/// Renders the card table. The selected row is marked with `>`.
pub fn render_cards(cards: &[Card], selected: Option<&Card>) -> String {
  if cards.is_empty() {
    return "(no cards)".to_string();
  }

  let rows: Vec<[String; 8]> = cards.iter().map(card_row).collect();
  let mut widths = HEADERS.map(|header| header.chars().count());
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row.iter()) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let format_line = |marker: &str, cells: &[String]| {
    let padded: Vec<String> = cells
      .iter()
      .zip(widths.iter())
      .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
      .collect();
    format!("{} {}", marker, padded.join("  ")).trim_end().to_string()
  };

  let header_cells: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
  let mut lines = vec![format_line(" ", &header_cells[..])];
  let selected_number = selected.map(|card| card.card_number);
  for (card, row) in cards.iter().zip(rows.iter()) {
    let marker = if Some(card.card_number) == selected_number {
      ">"
    } else {
      " "
    };
    lines.push(format_line(marker, &row[..]));
  }
  lines.push(format!("{} card(s)", cards.len()));
  lines.join("\n")
}

pub fn render_stats(stats: &CollectionStats, value: CollectionValue) -> String {
  let mut lines = Vec::new();
  if let Some(total) = stats.total_cards {
    lines.push(format!("Total cards:     {}", total));
  }
  if let Some(spent) = stats.total_spent {
    lines.push(format!("Total spent:     {:.2}", spent));
  }
  if let Some(foiled) = stats.total_foiled {
    lines.push(format!("Foiled cards:    {}", foiled));
  }
  if let Some(percent) = stats.percent_foiled {
    lines.push(format!("Percent foiled:  {:.1}%", percent));
  }
  for (key, extra) in &stats.extra {
    lines.push(format!("{}: {}", key, extra));
  }
  lines.push(format!("Owner value:     {:.2}", value.owner_value));
  lines.push(format!("Market value:    {:.2}", value.market_value));
  lines.join("\n")
}

pub fn render_collection_value(dialog: &CollectionValueDialog) -> String {
  [
    "Collection Value".to_string(),
    format!("  Owner value:  ${}", dialog.owner_value_text()),
    format!("  Market value: ${}", dialog.market_value_text()),
  ]
  .join("\n")
}

pub fn render_notice(notice: &Notice) -> String {
  format!(
    "[{}] {}",
    notice.raised_at.with_timezone(&Local).format("%H:%M:%S"),
    notice.message
  )
}

/// Notices that outlived their display time while a dialog held the terminal
/// are dropped.
pub fn live_notices(notices: &[Notice], now: DateTime<Utc>) -> Vec<&Notice> {
  notices.iter().filter(|notice| !notice.is_expired(now)).collect()
}

pub fn print_notices(notices: &[Notice]) {
  for notice in live_notices(notices, Utc::now()) {
    println!("{}", render_notice(notice));
  }
}
