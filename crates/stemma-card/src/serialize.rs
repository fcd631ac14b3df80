//! Card writer.
//!
//! Loaded cards round-trip verbatim: the parser keeps the raw header,
//! event and footer lines, and the writer just joins them back together.
//! Only brand-new cards are generated from structured data.

use stemma_core::Person;

/// Tags occupy a 12-character column throughout the card format.
pub(crate) fn tagged(tag: &str, text: &str) -> String {
  if text.is_empty() {
    tag.to_string()
  } else {
    format!("{tag:<12}{text}")
  }
}

/// Reassemble the card text for a loaded person, byte-for-byte as read.
pub fn card_text(person: &Person) -> String {
  let mut lines: Vec<&str> = Vec::new();
  lines.extend(person.headlines.iter().map(String::as_str));
  for event in &person.events {
    lines.extend(event.lines.iter().map(String::as_str));
  }
  lines.extend(person.footlines.iter().map(String::as_str));
  let mut text = lines.join("\n");
  text.push('\n');
  text
}

/// Build the skeleton card for a newly created person.
pub fn new_card(
  name: &str,
  id: usize,
  father: Option<&str>,
  mother: Option<&str>,
) -> String {
  let mut lines = vec![
    tagged("Name:", name),
    tagged("Uniq:", &id.to_string()),
  ];
  if let Some(f) = father {
    lines.push(tagged("Father:", f));
  }
  if let Some(m) = mother {
    lines.push(tagged("Mother:", m));
  }
  lines.push(tagged("Version:", "2"));
  lines.push(String::new());
  lines.push(tagged("?", "Birth"));
  lines.push(String::new());
  lines.push("EOF".to_string());
  let mut text = lines.join("\n");
  text.push('\n');
  text
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse::parse_str;

  #[test]
  fn loaded_card_round_trips_verbatim() {
    let input = "\
Name:       Jane Doe
Uniq:       42
Female

1900-01-15  Birth
+Place      Leeds
?           Death
EOF
opaque footer
";
    let card = parse_str(input, "jane.card");
    assert_eq!(card_text(&card.person), input);
  }

  #[test]
  fn new_card_parses_back() {
    let text = new_card("John Smith", 7, Some("Adam Smith [3]"), None);
    let card = parse_str(&text, "john.card");
    assert!(card.diagnostics.is_empty(), "{:?}", card.diagnostics);
    let p = &card.person;
    assert_eq!(p.name.as_deref(), Some("John Smith"));
    assert_eq!(p.id, Some(7));
    assert_eq!(p.father.as_ref().unwrap().id, Some(3));
    assert_eq!(p.events.len(), 1);
    assert_eq!(p.events[0].date, "?");
  }

  #[test]
  fn tag_column_is_twelve() {
    assert_eq!(tagged("Name:", "X"), "Name:       X");
    assert_eq!(tagged("EOF", ""), "EOF");
  }
}
