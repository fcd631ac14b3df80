//! Card-file parser.
//!
//! Pipeline:
//!   raw &str
//!     └─ scan_sections()      → header lines, event blocks, footer lines
//!          ├─ analyse_header() → name, id, sex, parents, private flag
//!          └─ parse_event()    → one Event per block
//!
//! The scan is a single forward pass through a 3-state machine:
//! HEADER → TIMELINE on the first line starting with a digit or `?`;
//! TIMELINE → FOOTER on a literal `EOF` line (from any state, and kept as
//! the first footer line). There is no backtracking and no rejection — a
//! malformed card yields a person plus diagnostics, never an error.

use std::path::{Path, PathBuf};

use stemma_core::{
  Diagnostics, Person, PersonSource, Sex, normalise_name, parse_name_and_id,
};

use crate::{
  error::{Error, Result},
  event::parse_event,
  line::{LineClass, classify},
};

/// The result of parsing one card file.
pub struct ParsedCard {
  pub person:      Person,
  pub diagnostics: Vec<stemma_core::Diagnostic>,
}

// ─── Section scan ────────────────────────────────────────────────────────────

#[derive(PartialEq)]
enum Mode {
  Header,
  Timeline,
  Footer,
}

struct Sections {
  headlines: Vec<String>,
  /// Event blocks with the 1-based line number of their first line.
  blocks:    Vec<(usize, Vec<String>)>,
  footlines: Vec<String>,
}

fn scan_sections(input: &str) -> Sections {
  let mut sections = Sections {
    headlines: Vec::new(),
    blocks:    Vec::new(),
    footlines: Vec::new(),
  };
  let mut mode = Mode::Header;
  let mut block: Option<(usize, Vec<String>)> = None;

  for (idx, raw) in input.lines().enumerate() {
    let line = raw.trim_end();
    let line_no = idx + 1;
    let class = classify(line);

    // EOF jumps straight to the footer regardless of state, closing any
    // event in progress. The marker itself is preserved in the footer.
    if class == LineClass::EofMarker {
      if let Some(b) = block.take() {
        sections.blocks.push(b);
      }
      mode = Mode::Footer;
      sections.footlines.push(line.to_string());
      continue;
    }

    match mode {
      Mode::Header => {
        if class == LineClass::EventStart {
          mode = Mode::Timeline;
          block = Some((line_no, vec![line.to_string()]));
        } else {
          sections.headlines.push(line.to_string());
        }
      }
      Mode::Timeline => {
        if class == LineClass::EventStart {
          if let Some(b) = block.take() {
            sections.blocks.push(b);
          }
          block = Some((line_no, vec![line.to_string()]));
        } else if let Some((_, lines)) = &mut block {
          lines.push(line.to_string());
        }
      }
      Mode::Footer => sections.footlines.push(line.to_string()),
    }
  }
  if let Some(b) = block.take() {
    sections.blocks.push(b);
  }
  sections
}

// ─── Header analysis ─────────────────────────────────────────────────────────

/// Header tags that are meaningful to other tools and pass through without
/// a warning. The lines themselves are preserved verbatim either way.
const PASSTHROUGH_TAGS: [&str; 4] = ["version:", "note:", "occupation:", "alias:"];

fn analyse_header(person: &mut Person, origin: &str, diags: &mut Diagnostics) {
  // First match wins per field; later duplicates are left in the raw
  // header but do not change the extracted values.
  let headlines = person.headlines.clone();
  for raw in &headlines {
    let line = raw.trim_start();
    // Blank lines, comments and `|` continuations of multi-line header
    // notes carry no fields of their own.
    if line.is_empty() || line.starts_with('#') || line.starts_with('|') {
      continue;
    }
    let lower = line.to_lowercase();

    if let Some(rest) = strip_tag(line, &lower, "name:") {
      if person.name.is_none() {
        person.name = Some(normalise_name(rest));
      }
    } else if let Some(rest) = strip_tag(line, &lower, "uniq:") {
      if person.id.is_none() {
        match rest.trim().parse::<usize>() {
          Ok(id) => person.id = Some(id),
          Err(_) => diags.warn(
            origin,
            None,
            format!("cannot parse id \"{}\"", rest.trim()),
          ),
        }
      }
    } else if lower == "male" {
      if person.sex == Sex::Unknown {
        person.sex = Sex::Male;
      }
    } else if lower == "female" {
      if person.sex == Sex::Unknown {
        person.sex = Sex::Female;
      }
    } else if lower == "unk" {
      // Explicitly unknown; nothing to record.
    } else if lower == "private" {
      person.private = true;
    } else if let Some(rest) = strip_tag(line, &lower, "father:") {
      if person.father.is_none() {
        person.father = parse_parent(rest, origin, diags);
      }
    } else if let Some(rest) = strip_tag(line, &lower, "mother:") {
      if person.mother.is_none() {
        person.mother = parse_parent(rest, origin, diags);
      }
    } else if !PASSTHROUGH_TAGS.iter().any(|t| lower.starts_with(t)) {
      diags.warn(origin, None, format!("unrecognised header line \"{line}\""));
    }
  }
}

/// Case-insensitive tag match; returns the text after the tag.
fn strip_tag<'a>(line: &'a str, lower: &str, tag: &str) -> Option<&'a str> {
  lower.starts_with(tag).then(|| &line[tag.len()..])
}

fn parse_parent(
  rest: &str,
  origin: &str,
  diags: &mut Diagnostics,
) -> Option<stemma_core::ParentRef> {
  let (parsed, warn) = parse_name_and_id(rest, origin);
  if let Some(w) = warn {
    diags.push(w);
  }
  if parsed.name.is_empty() && parsed.id.is_none() {
    diags.warn(origin, None, "empty parent reference");
    return None;
  }
  Some(stemma_core::ParentRef {
    name: parsed.name,
    id:   parsed.id,
  })
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Parse a card from a string. `origin` names the source file for
/// diagnostics and for the person's origin metadata.
pub fn parse_str(input: &str, origin: impl Into<PathBuf>) -> ParsedCard {
  let path: PathBuf = origin.into();
  let origin_name = path.display().to_string();
  let mut diags = Diagnostics::new();
  let mut person = Person::new(PersonSource::CardFile(path));

  let sections = scan_sections(input);
  person.headlines = sections.headlines;
  person.footlines = sections.footlines;

  analyse_header(&mut person, &origin_name, &mut diags);

  // The file's event order is trusted; blocks are appended as read.
  for (line_no, lines) in &sections.blocks {
    let event = parse_event(lines, &origin_name, *line_no, &mut diags);
    person.push_event(event);
  }

  ParsedCard {
    person,
    diagnostics: diags.into_vec(),
  }
}

/// Parse a card file from disk.
pub fn parse_file(path: &Path) -> Result<ParsedCard> {
  let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(parse_str(&text, path))
}

#[cfg(test)]
mod tests {
  use super::*;
  use stemma_core::EventKind;

  const CARD: &str = "\
Name:       Jane Ann Doe
Uniq:       42
Female
Father:     John Doe [1]
Mother:     Mary Roe [2]
Version:    2

1900-01-15  Birth
+Place      Leeds
1925-06-01  Marriage    Tom Poe [7]
?           Death
EOF
Anything below the marker is opaque.
1899 this would otherwise look like an event
";

  #[test]
  fn full_card_parses() {
    let card = parse_str(CARD, "jane.card");
    assert!(card.diagnostics.is_empty(), "{:?}", card.diagnostics);
    let p = &card.person;
    assert_eq!(p.name.as_deref(), Some("Jane Ann Doe"));
    assert_eq!(p.id, Some(42));
    assert_eq!(p.sex, Sex::Female);
    assert_eq!(p.father.as_ref().unwrap().id, Some(1));
    assert_eq!(p.mother.as_ref().unwrap().name, "Mary Roe");
    assert_eq!(p.events.len(), 3);
    assert_eq!(p.events[0].kind, EventKind::Birth);
    assert_eq!(p.events[1].rest.as_deref(), Some("Tom Poe [7]"));
    assert_eq!(p.events[2].kind, EventKind::Death);
  }

  #[test]
  fn footer_is_opaque_and_starts_at_eof() {
    let card = parse_str(CARD, "jane.card");
    let foot = &card.person.footlines;
    assert_eq!(foot[0], "EOF");
    assert!(foot.iter().any(|l| l.starts_with("1899")));
    // The would-be event in the footer did not become one.
    assert_eq!(card.person.events.len(), 3);
  }

  #[test]
  fn header_is_preserved_verbatim() {
    let card = parse_str(CARD, "jane.card");
    assert!(card.person.headlines.iter().any(|l| l.starts_with("Version:")));
  }

  // ── Recovery ────────────────────────────────────────────────────────────

  #[test]
  fn unparsable_id_warns_and_leaves_none() {
    let card = parse_str("Name: X\nUniq: twelve\n", "x.card");
    assert_eq!(card.person.id, None);
    assert!(card.diagnostics.iter().any(|d| d.message.contains("cannot parse id")));
  }

  #[test]
  fn unrecognised_header_line_warns() {
    let card = parse_str("Name: X\nBirthsign: Leo\n", "x.card");
    assert_eq!(card.diagnostics.len(), 1);
    assert!(card.diagnostics[0].message.contains("unrecognised"));
  }

  #[test]
  fn first_match_wins_per_field() {
    let card = parse_str("Name: First Name\nName: Second Name\nUniq: 1\n", "x.card");
    assert_eq!(card.person.name.as_deref(), Some("First Name"));
  }

  #[test]
  fn malformed_parent_bracket_recovers() {
    let card = parse_str("Name: X\nFather:  John Doe [9\n", "x.card");
    let father = card.person.father.as_ref().unwrap();
    assert_eq!(father.id, None);
    assert_eq!(father.name, "John Doe [9");
    assert_eq!(card.diagnostics.len(), 1);
  }

  #[test]
  fn private_flag_and_unk_sex() {
    let card = parse_str("Name: X\nUnk\nPrivate\n", "x.card");
    assert!(card.person.private);
    assert_eq!(card.person.sex, Sex::Unknown);
    assert!(card.diagnostics.is_empty());
  }

  #[test]
  fn eof_in_header_sends_rest_to_footer() {
    let card = parse_str("Name: X\nEOF\n1900 Birth\n", "x.card");
    assert!(card.person.events.is_empty());
    assert_eq!(card.person.footlines.len(), 2);
  }

  #[test]
  fn timeline_without_eof_has_no_footer() {
    let card = parse_str("Name: X\n1900 Birth\n", "x.card");
    assert!(card.person.footlines.is_empty());
    assert_eq!(card.person.events.len(), 1);
  }
}
