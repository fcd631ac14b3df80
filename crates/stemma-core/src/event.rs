//! Event — a dated entry on a person's timeline.
//!
//! An event keeps both the structured fields extracted by the parsers and
//! the verbatim card lines it came from. The raw lines are what editors and
//! the card writer care about; the engine only reads the structured side.

use serde::Serialize;

// ─── Event kind ──────────────────────────────────────────────────────────────

/// The closed set of event kinds the engine dispatches on.
///
/// Anything outside the known set is carried as `Other` with its original
/// spelling, so freeform card files survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Birth,
  Death,
  Marriage,
  Partnership,
  Emigration,
  Misc,
  Other(String),
}

impl EventKind {
  /// Case-insensitive mapping from a card-file type word.
  pub fn from_tag(tag: &str) -> Self {
    match tag.to_ascii_lowercase().as_str() {
      "birth" => Self::Birth,
      "death" => Self::Death,
      "marriage" => Self::Marriage,
      "partnership" => Self::Partnership,
      "emigration" => Self::Emigration,
      "misc" => Self::Misc,
      _ => Self::Other(tag.to_string()),
    }
  }

  /// The display spelling, as written in card files.
  pub fn label(&self) -> &str {
    match self {
      Self::Birth => "Birth",
      Self::Death => "Death",
      Self::Marriage => "Marriage",
      Self::Partnership => "Partnership",
      Self::Emigration => "Emigration",
      Self::Misc => "Misc",
      Self::Other(s) => s,
    }
  }

  /// Marriage and Partnership events both record a partner reference.
  pub fn is_partnership(&self) -> bool {
    matches!(self, Self::Marriage | Self::Partnership)
  }
}

// ─── Attributes and sources ──────────────────────────────────────────────────

/// A captioned item of information attached to an event (`+Place …`), or
/// nested under another attribute or source (`-Note …`). Nesting is
/// unlimited in the model but shallow in practice.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Attribute {
  pub caption:  String,
  pub text:     String,
  /// Set by a `-url` sub-tag.
  pub url:      Option<String>,
  pub children: Vec<Attribute>,
}

impl Attribute {
  pub fn new(caption: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      caption: caption.into(),
      text: text.into(),
      url: None,
      children: Vec::new(),
    }
  }

  /// Continuation lines are joined with a single space.
  pub fn continue_text(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }
    if !self.text.is_empty() {
      self.text.push(' ');
    }
    self.text.push_str(text);
  }
}

/// A referenced file (`-file <type> <name>`), registered with the render
/// factory at report time and deduplicated there by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttachment {
  pub kind: String,
  pub name: String,
}

/// A source of evidence for an event (`+Source …` block).
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceRef {
  pub description: String,
  pub files:       Vec<FileAttachment>,
  /// Inline transcript texts; lines are joined with newlines.
  pub transcripts: Vec<String>,
  pub info:        Vec<Attribute>,
}

impl SourceRef {
  pub fn continue_description(&mut self, text: &str) {
    if text.is_empty() {
      return;
    }
    if !self.description.is_empty() {
      self.description.push(' ');
    }
    self.description.push_str(text);
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// One dated entry on a timeline.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
  /// Raw date string; see [`crate::date`] for the grammar.
  pub date:       String,
  pub kind:       EventKind,
  /// Remainder of the first line. For partnership events this is the
  /// partner reference in the combined `Name [id]` form.
  pub rest:       Option<String>,
  pub attributes: Vec<Attribute>,
  pub sources:    Vec<SourceRef>,
  /// The verbatim card lines of the block, for round-tripping.
  #[serde(skip)]
  pub lines:      Vec<String>,
}

impl Event {
  pub fn new(date: impl Into<String>, kind: EventKind) -> Self {
    Self {
      date:       date.into(),
      kind,
      rest:       None,
      attributes: Vec::new(),
      sources:    Vec::new(),
      lines:      Vec::new(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_mapping_is_case_insensitive() {
    assert_eq!(EventKind::from_tag("BIRTH"), EventKind::Birth);
    assert_eq!(EventKind::from_tag("marriage"), EventKind::Marriage);
    let EventKind::Other(s) = EventKind::from_tag("Baptism") else {
      panic!("expected Other")
    };
    assert_eq!(s, "Baptism");
  }

  #[test]
  fn other_keeps_original_spelling() {
    assert_eq!(EventKind::from_tag("Census").label(), "Census");
  }

  #[test]
  fn continuation_joins_with_single_space() {
    let mut a = Attribute::new("Note", "first");
    a.continue_text("second");
    a.continue_text("");
    assert_eq!(a.text, "first second");
  }
}
