//! Plain view structures for the external template renderer.
//!
//! The renderer is a black box that consumes acyclic, serialisable data and
//! produces text or HTML. Nothing here refers back into the database: ids
//! are plain integers, relationships are already resolved, and files and
//! transcripts are reduced to `Fn`/`Tn` back-reference handles issued by a
//! per-render [`RenderFactory`].

use std::collections::HashMap;

use serde::Serialize;

use crate::{
  database::Database,
  date::format_date,
  event::{Attribute, Event, SourceRef},
  person::{ParentRef, Person, Sex},
  relation::Partner,
  settings::Settings,
};

// ─── Person reference ────────────────────────────────────────────────────────

/// The minimal person view: identity plus the canonical one-line display
/// `[id] Name (DoB - DoD)`.
#[derive(Debug, Clone, Serialize)]
pub struct PersonRef {
  pub id:      Option<usize>,
  pub name:    String,
  pub vital:   String,
  /// Computed privacy. Callers that want full relative propagation must run
  /// [`Database::compute_all_privacy`] before building views; otherwise
  /// this falls back to the person's own record only.
  pub private: bool,
}

impl PersonRef {
  /// A reference to somebody known by name only (e.g. a parent who is not
  /// in the database).
  pub fn name_only(name: &str, id: Option<usize>) -> Self {
    Self {
      id,
      name: name.to_string(),
      vital: name.to_string(),
      private: false,
    }
  }

  /// The placeholder for a completely unrecorded person.
  pub fn not_known() -> Self {
    Self {
      id:      None,
      name:    "not known".to_string(),
      vital:   "not known".to_string(),
      private: false,
    }
  }
}

impl Person {
  /// `[id] Name (DoB - DoD)`; unknown id renders as `[?]`, a missing death
  /// date leaves the right-hand side empty.
  pub fn vital_line(&self, settings: &Settings) -> String {
    let dob = format_date(self.birth_event().map(|e| e.date.as_str()), Some("?"), settings.date_format);
    let dod = format_date(self.death_date(), Some(""), settings.date_format);
    format!("{} {} ({} - {})", self.id_token(), self.display_name(), dob, dod)
  }
}

// ─── Event views ─────────────────────────────────────────────────────────────

/// A captioned item of information, possibly nested.
#[derive(Debug, Clone, Serialize)]
pub struct InfoItem {
  pub caption:  String,
  pub text:     String,
  pub url:      Option<String>,
  pub children: Vec<InfoItem>,
}

/// A link from a source to a file or transcript handle.
#[derive(Debug, Clone, Serialize)]
pub struct RefView {
  pub text: String,
  pub link: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceView {
  pub description: String,
  pub refs:        Vec<RefView>,
  pub info:        Vec<InfoItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileView {
  pub handle: String,
  pub kind:   String,
  pub name:   String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptView {
  pub handle: String,
  pub text:   String,
}

/// One row of a person's timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
  pub date:    String,
  pub kind:    String,
  /// The other party, for partnership events.
  pub partner: Option<PersonRef>,
  pub info:    Vec<InfoItem>,
  pub sources: Vec<SourceView>,
}

/// A partnership row for the family section.
#[derive(Debug, Clone, Serialize)]
pub struct PartnershipView {
  pub date:    String,
  pub partner: Option<PersonRef>,
  pub assumed: bool,
}

/// Everything the renderer needs for one person's page.
#[derive(Debug, Clone, Serialize)]
pub struct PersonCard {
  pub subject:      PersonRef,
  pub sex:          Sex,
  pub father:       Option<PersonRef>,
  pub mother:       Option<PersonRef>,
  pub siblings:     Vec<PersonRef>,
  pub partnerships: Vec<PartnershipView>,
  pub children:     Vec<PersonRef>,
  pub timeline:     Vec<TimelineEntry>,
  pub files:        Vec<FileView>,
  pub transcripts:  Vec<TranscriptView>,
}

// ─── Render factory ──────────────────────────────────────────────────────────

/// Issues `Fn`/`Tn` handles for files and transcripts referenced by the
/// sources of one render. Files are deduplicated by name, so the same
/// census image cited from two events gets one handle.
#[derive(Debug, Default)]
pub struct RenderFactory {
  files:       Vec<FileView>,
  transcripts: Vec<TranscriptView>,
  by_name:     HashMap<String, String>,
}

impl RenderFactory {
  pub fn new() -> Self { Self::default() }

  pub fn register_file(&mut self, kind: &str, name: &str) -> String {
    if let Some(handle) = self.by_name.get(name) {
      return handle.clone();
    }
    let handle = format!("F{}", self.files.len() + 1);
    self.files.push(FileView {
      handle: handle.clone(),
      kind:   kind.to_string(),
      name:   name.to_string(),
    });
    self.by_name.insert(name.to_string(), handle.clone());
    handle
  }

  pub fn register_transcript(&mut self, text: &str) -> String {
    let handle = format!("T{}", self.transcripts.len() + 1);
    self.transcripts.push(TranscriptView {
      handle: handle.clone(),
      text:   text.to_string(),
    });
    handle
  }

  pub fn finish(self) -> (Vec<FileView>, Vec<TranscriptView>) {
    (self.files, self.transcripts)
  }
}

/// Serialise a view for handing to an out-of-process renderer.
pub fn to_json<T: Serialize>(view: &T) -> crate::Result<serde_json::Value> {
  Ok(serde_json::to_value(view)?)
}

// ─── Builders ────────────────────────────────────────────────────────────────

fn info_item(attr: &Attribute) -> InfoItem {
  InfoItem {
    caption:  attr.caption.clone(),
    text:     attr.text.clone(),
    url:      attr.url.clone(),
    children: attr.children.iter().map(info_item).collect(),
  }
}

fn source_view(source: &SourceRef, factory: &mut RenderFactory) -> SourceView {
  let mut refs = Vec::new();
  for file in &source.files {
    let handle = factory.register_file(&file.kind, &file.name);
    refs.push(RefView {
      link: format!("#{handle}"),
      text: handle,
    });
  }
  for transcript in &source.transcripts {
    let handle = factory.register_transcript(transcript);
    refs.push(RefView {
      link: format!("#{handle}"),
      text: handle,
    });
  }
  SourceView {
    description: source.description.clone(),
    refs,
    info: source.info.iter().map(info_item).collect(),
  }
}

impl Database {
  pub(crate) fn person_ref_of(&self, p: &Person, settings: &Settings) -> PersonRef {
    PersonRef {
      id:      p.id,
      name:    p.display_name().to_string(),
      vital:   p.vital_line(settings),
      private: p
        .calculated_privacy
        .unwrap_or_else(|| self.base_private(p, settings)),
    }
  }

  pub fn person_ref(&self, id: usize, settings: &Settings) -> Option<PersonRef> {
    self.get(id).map(|p| self.person_ref_of(p, settings))
  }

  /// A view for a parent slot: resolved to a database record when the id
  /// is present and valid, a name-only reference otherwise.
  pub(crate) fn parent_view(&self, parent: &ParentRef, settings: &Settings) -> PersonRef {
    match parent.id.and_then(|id| self.get(id)) {
      Some(p) => self.person_ref_of(p, settings),
      None => PersonRef::name_only(&parent.name, parent.id),
    }
  }

  fn partner_view(&self, partner: &Partner, settings: &Settings) -> Option<PersonRef> {
    match partner.id.and_then(|id| self.get(id)) {
      Some(p) => Some(self.person_ref_of(p, settings)),
      None => partner
        .name
        .as_deref()
        .map(|n| PersonRef::name_only(n, partner.id)),
    }
  }

  fn timeline_entry(
    &self,
    subject_id: usize,
    event: &Event,
    settings: &Settings,
    factory: &mut RenderFactory,
  ) -> TimelineEntry {
    let partner = if event.kind.is_partnership() {
      self
        .partners(subject_id)
        .iter()
        .find(|p| !p.assumed && p.date == event.date)
        .and_then(|p| self.partner_view(p, settings))
    } else {
      None
    };
    TimelineEntry {
      date: format_date(Some(&event.date), Some("?"), settings.date_format),
      kind: event.kind.label().to_string(),
      partner,
      info: event.attributes.iter().map(info_item).collect(),
      sources: event.sources.iter().map(|s| source_view(s, factory)).collect(),
    }
  }

  /// Build the complete render view for one person. `None` when the id is
  /// not in the database.
  pub fn person_card(&self, id: usize, settings: &Settings) -> Option<PersonCard> {
    let subject = self.get(id)?;
    let mut factory = RenderFactory::new();

    let timeline: Vec<TimelineEntry> = subject
      .events
      .iter()
      .map(|e| self.timeline_entry(id, e, settings, &mut factory))
      .collect();

    let partnerships: Vec<PartnershipView> = self
      .partners(id)
      .iter()
      .map(|p| PartnershipView {
        date:    format_date(Some(&p.date), Some("?"), settings.date_format),
        partner: self.partner_view(p, settings),
        assumed: p.assumed,
      })
      .collect();

    let (files, transcripts) = factory.finish();

    Some(PersonCard {
      subject: self.person_ref_of(subject, settings),
      sex: subject.sex,
      father: subject.father.as_ref().map(|r| self.parent_view(r, settings)),
      mother: subject.mother.as_ref().map(|r| self.parent_view(r, settings)),
      siblings: self
        .siblings(id)
        .into_iter()
        .map(|p| self.person_ref_of(p, settings))
        .collect(),
      partnerships,
      children: self
        .children(id, None)
        .into_iter()
        .map(|p| self.person_ref_of(p, settings))
        .collect(),
      timeline,
      files,
      transcripts,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    event::{EventKind, FileAttachment},
    person::PersonSource,
  };

  fn person(id: usize, name: &str) -> Person {
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    p
  }

  // ── Vital line ──────────────────────────────────────────────────────────

  #[test]
  fn vital_line_forms() {
    let settings = Settings::default();
    let mut p = person(12, "Jane Doe");
    p.push_event(Event::new("1900-01-01", EventKind::Birth));
    assert_eq!(p.vital_line(&settings), "[12] Jane Doe (1900-01-01 - )");

    p.push_event(Event::new("1980", EventKind::Death));
    assert_eq!(p.vital_line(&settings), "[12] Jane Doe (1900-01-01 - 1980)");

    let anon = Person::new(PersonSource::New);
    assert_eq!(anon.vital_line(&settings), "[?] (no name) (? - )");
  }

  // ── Render factory ──────────────────────────────────────────────────────

  #[test]
  fn factory_deduplicates_files_by_name() {
    let mut f = RenderFactory::new();
    let a = f.register_file("image", "census-1881.png");
    let b = f.register_file("image", "census-1881.png");
    let c = f.register_file("image", "other.png");
    assert_eq!(a, "F1");
    assert_eq!(b, "F1");
    assert_eq!(c, "F2");
    let (files, _) = f.finish();
    assert_eq!(files.len(), 2);
  }

  #[test]
  fn transcripts_get_sequential_handles() {
    let mut f = RenderFactory::new();
    assert_eq!(f.register_transcript("line one"), "T1");
    assert_eq!(f.register_transcript("line two"), "T2");
  }

  // ── Person card ─────────────────────────────────────────────────────────

  #[test]
  fn person_card_collects_sources_through_factory() {
    let settings = Settings::default();
    let mut db = Database::new();
    let mut p = person(1, "Jane Doe");
    let mut birth = Event::new("1900", EventKind::Birth);
    let mut source = SourceRef::default();
    source.description = "Birth certificate".to_string();
    source.files.push(FileAttachment {
      kind: "image".to_string(),
      name: "cert.png".to_string(),
    });
    birth.sources.push(source);
    p.push_event(birth);
    db.add_person(p).unwrap();

    let card = db.person_card(1, &settings).unwrap();
    assert_eq!(card.timeline.len(), 1);
    assert_eq!(card.timeline[0].sources[0].refs[0].text, "F1");
    assert_eq!(card.files.len(), 1);
    assert_eq!(card.files[0].name, "cert.png");
  }

  #[test]
  fn person_card_none_for_missing_person() {
    let db = Database::new();
    assert!(db.person_card(7, &Settings::default()).is_none());
  }

  #[test]
  fn views_serialise_to_json() {
    let v = to_json(&PersonRef::not_known()).unwrap();
    assert_eq!(v["name"], "not known");
    assert_eq!(v["id"], serde_json::Value::Null);
  }
}
