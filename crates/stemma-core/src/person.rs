//! Person — one record in the family database.
//!
//! Relationships are never stored as object links. A person carries at most
//! two parent references (name plus optional id); everything else — sibling
//! sets, partner lists, descendant trees — is derived on demand by scanning
//! the database. Cycles between records are therefore inherent and safe:
//! ids are resolved through the database's backing array, not pointers.

use std::path::PathBuf;

use serde::Serialize;

use crate::{
  diag::Diagnostic,
  event::{Event, EventKind},
};

// ─── Sex ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
  Male,
  Female,
  #[default]
  Unknown,
}

// ─── Parent reference ────────────────────────────────────────────────────────

/// A loosely-linked reference to a parent: the name is always present when a
/// parent is recorded at all; the id is only present when the parent is (or
/// is expected to be) in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRef {
  pub name: String,
  pub id:   Option<usize>,
}

// ─── Origin ──────────────────────────────────────────────────────────────────

/// Where a person record came from. Only editors care; the engine never
/// looks at this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonSource {
  CardFile(PathBuf),
  Gedcom { xref: String },
  New,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A mutable person record.
///
/// `events` is ordered: birth first and death last by construction; other
/// events are insertion-sorted on the raw date string (`?` sorts after any
/// numeric date). Birth, death and partnership accessors search the list
/// rather than holding indexes, so insertions cannot leave anything
/// dangling.
#[derive(Debug, Clone)]
pub struct Person {
  pub id:     Option<usize>,
  pub name:   Option<String>,
  pub sex:    Sex,
  pub father: Option<ParentRef>,
  pub mother: Option<ParentRef>,
  pub events: Vec<Event>,

  /// Explicit `Private` flag from the card header.
  pub private: bool,
  /// Memoised result of the recursive privacy walk; `None` until computed,
  /// invalidated wholesale by [`crate::Database::clear_privacy_cache`].
  pub calculated_privacy: Option<bool>,

  pub source: PersonSource,

  /// Verbatim header and footer lines, for rewriting the card file.
  pub headlines: Vec<String>,
  pub footlines: Vec<String>,
}

impl Person {
  pub fn new(source: PersonSource) -> Self {
    Self {
      id: None,
      name: None,
      sex: Sex::Unknown,
      father: None,
      mother: None,
      events: Vec::new(),
      private: false,
      calculated_privacy: None,
      source,
      headlines: Vec::new(),
      footlines: Vec::new(),
    }
  }

  /// Name of the origin file or import source, for diagnostics.
  pub fn origin(&self) -> String {
    match &self.source {
      PersonSource::CardFile(p) => p.display().to_string(),
      PersonSource::Gedcom { xref } => format!("gedcom:{xref}"),
      PersonSource::New => "(new)".to_string(),
    }
  }

  // ── Timeline accessors ──────────────────────────────────────────────────

  pub fn birth_event(&self) -> Option<&Event> {
    self.events.iter().find(|e| e.kind == EventKind::Birth)
  }

  pub fn death_event(&self) -> Option<&Event> {
    self.events.iter().find(|e| e.kind == EventKind::Death)
  }

  /// Partnership events (Marriage or Partnership), in timeline order.
  pub fn partnership_events(&self) -> impl Iterator<Item = &Event> {
    self.events.iter().filter(|e| e.kind.is_partnership())
  }

  /// Raw birth date, `?` when no birth is recorded. Used as the sort key
  /// for sibling and child lists.
  pub fn birth_date(&self) -> &str {
    self.birth_event().map(|e| e.date.as_str()).unwrap_or("?")
  }

  pub fn death_date(&self) -> Option<&str> {
    self.death_event().map(|e| e.date.as_str())
  }

  /// Append in file order; the card parser trusts the file's ordering.
  pub fn push_event(&mut self, event: Event) { self.events.push(event); }

  /// Insert keeping the ordering invariant: never before the birth at
  /// index 0, before the first later event with a greater raw date,
  /// otherwise at the end (so an existing death stays last only if the
  /// caller appends it after all insertions — the GEDCOM importer does).
  pub fn insert_event(&mut self, event: Event) {
    for i in 1..self.events.len() {
      if self.events[i].date.as_str() > event.date.as_str() {
        self.events.insert(i, event);
        return;
      }
    }
    self.events.push(event);
  }

  // ── Display forms ───────────────────────────────────────────────────────

  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("(no name)")
  }

  /// `[id]`, or `[?]` when the id never resolved.
  pub fn id_token(&self) -> String {
    match self.id {
      Some(id) => format!("[{id}]"),
      None => "[?]".to_string(),
    }
  }

  /// The combined `Name [id]` form used inside card files to reference
  /// another person (partner lines, parent lines).
  pub fn card_ref(&self) -> String {
    format!("{} {}", self.display_name(), self.id_token())
  }
}

// ─── Combined name+id grammar ────────────────────────────────────────────────

/// Result of [`parse_name_and_id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameAndId {
  pub name: String,
  pub id:   Option<usize>,
}

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalise_name(name: &str) -> String {
  name.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the combined `"<name> [<id>] <trailing>"` form.
///
/// - No bracket: the whole string is the name, no id.
/// - Well-formed bracket: the id is the integer inside; any trailing text
///   after `]` is re-appended to the name.
/// - Missing `]` or a non-numeric id: recovered by returning the whole
///   original text as the name with no id, plus a warning.
///
/// The returned name is always whitespace-normalised.
pub fn parse_name_and_id(input: &str, origin: &str) -> (NameAndId, Option<Diagnostic>) {
  let Some(open) = input.find('[') else {
    return (
      NameAndId {
        name: normalise_name(input),
        id:   None,
      },
      None,
    );
  };

  let head = &input[..open];
  let tail = &input[open + 1..];

  let Some(close) = tail.find(']') else {
    return (
      NameAndId {
        name: normalise_name(input),
        id:   None,
      },
      Some(Diagnostic::warning(
        origin,
        None,
        format!("no closing bracket after id in \"{}\"", input.trim()),
      )),
    );
  };

  let id_text = tail[..close].trim();
  let after = &tail[close + 1..];

  match id_text.parse::<usize>() {
    Ok(id) => (
      NameAndId {
        name: normalise_name(&format!("{head} {after}")),
        id:   Some(id),
      },
      None,
    ),
    Err(_) => (
      NameAndId {
        name: normalise_name(input),
        id:   None,
      },
      Some(Diagnostic::warning(
        origin,
        None,
        format!("\"{id_text}\" is not a valid id in \"{}\"", input.trim()),
      )),
    ),
  }
}
