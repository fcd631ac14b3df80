//! GEDCOM import.
//!
//! Three passes, each completing before the next begins:
//!
//! 1. record collection ([`crate::record`]),
//! 2. field mapping — every INDI becomes a person, rendered as card lines
//!    and parsed through the card codec so GEDCOM input and native input
//!    flow through the same pipeline,
//! 3. family linking — FAM records connect parents and children and add
//!    Marriage events to both partners. The linking pass runs only after
//!    all INDIs are mapped, so forward references always resolve.
//!
//! An INDI xref of the exact form `@I<digits>@` supplies the person id
//! directly; any other form is flagged and such individuals receive ids
//! above the maximum observed id in a final allocation pass.
//!
//! Every individual gets a Birth event — existence implies birth. A
//! missing death is synthesized only under [`ImportOptions::assume_dead`]:
//! that policy suits archival sources which omit living/deceased status
//! and must not be assumed for general input.

use std::collections::HashMap;
use std::path::Path;

use stemma_core::{
  Database, Diagnostic, Diagnostics, PersonSource,
};

use crate::{
  date::convert_date,
  error::{Error, Result},
  record::{GedRecord, GedcomFile, read_records},
};

// ─── Options and report ──────────────────────────────────────────────────────

/// Policy switches for quirky input sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
  /// Synthesize a Death (unknown date, marked as assumed) for every
  /// individual without a DEAT record.
  pub assume_dead:        bool,
  /// Synthesize an undated Marriage for FAM records without a MARR.
  pub assume_partnership: bool,
}

/// What an import did.
#[derive(Debug)]
pub struct ImportReport {
  pub persons_added: usize,
  pub diagnostics:   Vec<Diagnostic>,
}

// ─── Card-line assembly ──────────────────────────────────────────────────────

fn tagged(tag: &str, text: &str) -> String {
  if text.is_empty() {
    tag.to_string()
  } else {
    format!("{tag:<12}{text}")
  }
}

/// One event being assembled as card lines.
#[derive(Debug, Clone)]
struct EventBlock {
  date:  String,
  label: String,
  rest:  Option<String>,
  sub:   Vec<String>,
}

impl EventBlock {
  fn new(label: &str) -> Self {
    Self {
      date:  "?".to_string(),
      label: label.to_string(),
      rest:  None,
      sub:   Vec::new(),
    }
  }

  fn with_rest(label: &str, rest: &str) -> Self {
    let mut b = Self::new(label);
    b.rest = Some(rest.to_string());
    b
  }

  fn render(&self, out: &mut Vec<String>) {
    match &self.rest {
      Some(rest) => out.push(format!("{:<12}{:<12}{rest}", self.date, self.label)),
      None => out.push(format!("{:<12}{}", self.date, self.label)),
    }
    out.extend(self.sub.iter().cloned());
  }
}

/// The event a DATE / PLAC / SOUR line attaches to.
#[derive(Debug, Clone, Copy)]
enum Pending {
  None,
  Birth,
  Death,
  Other(usize),
}

/// A person under construction: header fields plus event blocks, rendered
/// to card text once linking is complete.
#[derive(Debug)]
struct IndiWork {
  xref:        String,
  id:          Option<usize>,
  name:        Option<String>,
  sex_line:    Option<&'static str>,
  father_line: Option<String>,
  mother_line: Option<String>,
  extra_head:  Vec<String>,
  birth:       EventBlock,
  death:       Option<EventBlock>,
  others:      Vec<EventBlock>,
}

impl IndiWork {
  fn new(xref: String) -> Self {
    Self {
      xref,
      id: None,
      name: None,
      sex_line: None,
      father_line: None,
      mother_line: None,
      extra_head: Vec::new(),
      birth: EventBlock::new("Birth"),
      death: None,
      others: Vec::new(),
    }
  }

  fn block_mut(&mut self, pending: Pending) -> Option<&mut EventBlock> {
    match pending {
      Pending::None => None,
      Pending::Birth => Some(&mut self.birth),
      Pending::Death => self.death.as_mut(),
      Pending::Other(i) => self.others.get_mut(i),
    }
  }

  /// The combined `Name [id]` reference used in parent and partner lines.
  fn display_ref(&self) -> String {
    let name = self.name.as_deref().unwrap_or("(no name)");
    match self.id {
      Some(id) => format!("{name} [{id}]"),
      None => format!("{name} [?]"),
    }
  }

  fn render_card(&self) -> String {
    let mut lines = Vec::new();
    if let Some(name) = &self.name {
      lines.push(tagged("Name:", name));
    }
    if let Some(id) = self.id {
      lines.push(tagged("Uniq:", &id.to_string()));
    }
    if let Some(sex) = self.sex_line {
      lines.push(sex.to_string());
    }
    if let Some(f) = &self.father_line {
      lines.push(f.clone());
    }
    if let Some(m) = &self.mother_line {
      lines.push(m.clone());
    }
    lines.extend(self.extra_head.iter().cloned());
    lines.push(tagged("Version:", "2"));
    lines.push(String::new());

    self.birth.render(&mut lines);
    for block in &self.others {
      block.render(&mut lines);
    }
    if let Some(death) = &self.death {
      death.render(&mut lines);
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
  }
}

// ─── Importer ────────────────────────────────────────────────────────────────

struct Importer<'a> {
  origin:       String,
  options:      &'a ImportOptions,
  diags:        Diagnostics,
  works:        Vec<IndiWork>,
  by_xref:      HashMap<String, usize>,
  all_standard: bool,
}

impl<'a> Importer<'a> {
  // ── Identity ────────────────────────────────────────────────────────────

  /// `@I<digits>@` → id; anything else (including non-positive numbers)
  /// is flagged for the allocation pass.
  fn extract_id(&mut self, xref: &str, line_no: usize) -> Option<usize> {
    let id = xref
      .strip_prefix("@I")
      .and_then(|s| s.strip_suffix('@'))
      .and_then(|s| s.parse::<usize>().ok())
      .filter(|&id| id > 0);
    if id.is_none() {
      self.diags.warn(
        self.origin.as_str(),
        Some(line_no),
        format!("\"{xref}\": not in the expected @I<digits>@ form"),
      );
      self.all_standard = false;
    }
    id
  }

  /// Give every unnumbered individual an id above the maximum observed.
  fn allocate_nonstandard(&mut self, db: &Database) {
    let mut next = self
      .works
      .iter()
      .filter_map(|w| w.id)
      .chain(db.max_id())
      .max()
      .unwrap_or(0)
      + 1;
    self.diags.warn(
      self.origin.as_str(),
      None,
      format!("individuals with nonstandard xrefs allocated ids from [{next}]"),
    );
    for work in &mut self.works {
      if work.id.is_none() {
        work.id = Some(next);
        next += 1;
      }
    }
  }

  // ── Name conversion ─────────────────────────────────────────────────────

  /// Strip the `/…/` surname markers and collapse whitespace. A surname
  /// that is not the last element is bracketed back in before it, with a
  /// warning.
  fn convert_name(&mut self, gedname: &str, line_no: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut extra: Vec<String> = Vec::new();
    let mut found_surname = false;
    for token in gedname.split_whitespace() {
      if found_surname {
        extra.push(token.to_string());
      } else if token.len() >= 2 && token.starts_with('/') && token.ends_with('/') {
        found_surname = true;
        parts.push(token[1..token.len() - 1].to_string());
      } else {
        parts.push(token.to_string());
      }
    }
    if !extra.is_empty() {
      self.diags.warn(
        self.origin.as_str(),
        Some(line_no),
        format!("in \"{gedname}\": family name is not last"),
      );
      let bracketed = format!("({})", extra.join(" "));
      let at = parts.len().saturating_sub(1);
      parts.insert(at, bracketed);
    } else if !found_surname {
      self.diags.warn(
        self.origin.as_str(),
        Some(line_no),
        format!("in \"{gedname}\": family name not found; last name taken as usual"),
      );
    }
    parts.join(" ")
  }

  // ── INDI mapping ────────────────────────────────────────────────────────

  fn process_indi(&mut self, rec: &GedRecord, file: &GedcomFile) {
    let xref = rec.xref.clone().unwrap_or_default();
    let mut work = IndiWork::new(xref.clone());
    work.id = self.extract_id(&xref, rec.first_line);

    let mut pending = Pending::None;
    let mut l1 = String::new();
    let mut l2 = String::new();
    let mut l3 = String::new();

    for line in &rec.lines {
      let data = line.data.as_deref();
      let line_no = line.line_no;
      match line.level {
        1 => {
          pending = Pending::None;
          l1 = line.tag.clone();
          match line.tag.as_str() {
            "NAME" => match data {
              Some(d) => work.name = Some(self.convert_name(d, line_no)),
              None => self.warn(line_no, "ignored; no name given"),
            },
            "SEX" => match data {
              Some("M") => work.sex_line = Some("Male"),
              Some("F") => work.sex_line = Some("Female"),
              // U is a legitimate "unknown"; no header line results.
              Some("U") => {}
              Some(_) => self.warn(line_no, "ignored; sex not known"),
              None => self.warn(line_no, "ignored; no sex given"),
            },
            "EVEN" => {
              // In practice a remark about the person's name; see TYPE
              // at level 2.
              if let Some(d) = data {
                work.extra_head.push(tagged("Note:", d));
              }
            }
            "BIRT" => {
              // The default Birth already exists; recall it.
              pending = Pending::Birth;
              if let Some(d) = data
                && d != "Y"
              {
                work.birth.sub.push(tagged("+Note", d));
              }
            }
            "DEAT" => {
              let mut block = EventBlock::new("Death");
              if let Some(d) = data
                && d != "Y"
              {
                block.sub.push(tagged("+Note", d));
              }
              work.death = Some(block);
              pending = Pending::Death;
            }
            "EMIG" => {
              let mut block = EventBlock::new("Emigration");
              if let Some(d) = data
                && d != "Y"
              {
                block.sub.push(tagged("+Where", d));
              }
              work.others.push(block);
              pending = Pending::Other(work.others.len() - 1);
            }
            "PROP" => {
              let mut block = EventBlock::with_rest("Misc", "Property acquisition");
              if let Some(d) = data
                && d != "Y"
              {
                block.sub.push(tagged("+Note", d));
              }
              work.others.push(block);
              pending = Pending::Other(work.others.len() - 1);
            }
            "OCCU" => {
              let mut block = EventBlock::with_rest("Misc", "Occupation");
              if let Some(d) = data
                && d != "Y"
              {
                block.sub.push(tagged("+Occupation", d));
                work.extra_head.push(tagged("Occupation:", d));
              }
              work.others.push(block);
              pending = Pending::Other(work.others.len() - 1);
            }
            "NOTE" => match data.and_then(|d| file.note.get(d)) {
              Some(note) => {
                let lines = self.process_note(note);
                work.extra_head.extend(lines);
              }
              None => self.warn(line_no, "referenced note not found"),
            },
            // Family membership is reconstructed from the FAM records
            // themselves; the back-references add nothing.
            "FAMS" | "FAMC" => {}
            other => self.warn(line_no, &format!("ignored; unknown tag {other}")),
          }
        }
        2 => {
          l2 = line.tag.clone();
          match line.tag.as_str() {
            "DATE" => match data {
              None => self.warn(line_no, "ignored; no date given"),
              Some(d) => {
                let converted =
                  convert_date(d, self.origin.as_str(), line_no, &mut self.diags);
                if let Some(block) = work.block_mut(pending) {
                  block.date = converted.primary;
                  if let Some(before) = converted.before {
                    // The upper bound of a range rides along as the
                    // first attribute so sorting stays chronological.
                    block.sub.insert(0, tagged("+Before", &before));
                  }
                }
                // No event to date: silently skipped, as for HEAD dates.
              }
            },
            "PLAC" => {
              if let Some(block) = work.block_mut(pending) {
                block.sub.push(tagged("+Place", data.unwrap_or("not given")));
              }
            }
            "TYPE" => {
              if l1 == "EVEN"
                && let Some(d) = data
                && d != "Surname"
                && d != "Family Genealogy"
              {
                self.warn(line_no, &format!("EVEN has TYPE \"{d}\"; expected Surname"));
              }
            }
            "SOUR" => match data.and_then(|d| file.sour.get(d)) {
              Some(source) => {
                let lines = self.process_source(source);
                match work.block_mut(pending) {
                  Some(block) => block.sub.extend(lines),
                  None => self.warn(line_no, "no event for referenced source"),
                }
              }
              None => self.warn(line_no, "referenced source not found"),
            },
            other => self.warn(line_no, &format!("ignored; unknown tag {other}")),
          }
        }
        3 => {
          l3 = line.tag.clone();
          if l2 == "PLAC" && line.tag == "MAP" {
            match work.block_mut(pending) {
              Some(block) => {
                block.sub.push("-Mapref".to_string());
                if data.is_some() {
                  self.warn(line_no, "ignored unexpected data after MAP");
                }
              }
              None => self.warn(line_no, "ignored; MAP tag with no event"),
            }
          } else if l2 == "SOUR" && line.tag == "PAGE" {
            match (data, work.block_mut(pending)) {
              (None, _) => self.warn(line_no, "ignored; PAGE tag with no data"),
              (_, None) => self.warn(line_no, "ignored; PAGE tag with no event"),
              (Some(d), Some(block)) => block.sub.push(tagged("-Page", d)),
            }
          } else {
            self.warn(line_no, &format!("ignored; unknown tag {}", line.tag));
          }
        }
        _ => {
          if l3 == "MAP" && matches!(line.tag.as_str(), "LATI" | "LONG") {
            if let (Some(d), Some(block)) = (data, work.block_mut(pending))
              && let Some(last) = block.sub.last_mut()
            {
              if last.as_str() == "-Mapref" {
                last.push_str("     ");
              } else {
                last.push(' ');
              }
              last.push_str(d);
            }
          } else {
            self.warn(line_no, &format!("ignored; unknown tag {}", line.tag));
          }
        }
      }
    }

    self.by_xref.insert(xref, self.works.len());
    self.works.push(work);
  }

  // ── NOTE expansion ──────────────────────────────────────────────────────

  /// Expand a NOTE record into header-style card lines (`Note:`). CONT
  /// joins with a newline — in card terms a fresh `| ` continuation line;
  /// CONC joins with no separator at all. Those semantics must be exact
  /// for transcript fidelity. Event-level notes arrive through the SOUR
  /// expansion instead.
  fn process_note(&mut self, note: &GedRecord) -> Vec<String> {
    let mut text: Vec<String> = Vec::new();
    if let Some(d) = &note.data {
      text.push(d.clone());
    }
    let mut multiline = false;

    for line in &note.lines {
      if line.level != 1 {
        self.warn(line.line_no, "ignored; unexpected level in NOTE");
        continue;
      }
      match line.tag.as_str() {
        "CONT" => {
          multiline = true;
          match &line.data {
            None => text.push("|".to_string()),
            Some(d) => text.push(format!("| {d}")),
          }
        }
        "CONC" => {
          if let Some(d) = &line.data {
            match text.last_mut() {
              None => text.push(d.clone()),
              Some(last) if last.as_str() == "|" => {
                last.push(' ');
                last.push_str(d);
              }
              Some(last) => last.push_str(d),
            }
          }
        }
        other => self.warn(line.line_no, &format!("ignored; unknown tag {other}")),
      }
    }

    if text.is_empty() {
      return Vec::new();
    }
    if multiline {
      let mut out = vec!["Note:".to_string()];
      out.extend(text);
      // The initial text line must carry a continuation marker too.
      if out[1].is_empty() {
        out[1] = "|".to_string();
      } else if !out[1].starts_with('|') {
        out[1] = format!("| {}", out[1]);
      }
      out
    } else {
      vec![tagged("Note:", &text[0])]
    }
  }

  // ── SOUR expansion ──────────────────────────────────────────────────────

  /// Expand a SOUR record into a `+Source` block: TITL becomes the
  /// description, AUTH/PUBL/NOTE become sub-attributes, NOTE continuations
  /// become `|` lines.
  fn process_source(&mut self, sour: &GedRecord) -> Vec<String> {
    let mut description = String::new();
    let mut rest: Vec<String> = Vec::new();
    let mut l1 = String::new();

    for line in &sour.lines {
      let txt = line.data.as_deref().unwrap_or("");
      match line.level {
        1 => {
          l1 = line.tag.clone();
          match line.tag.as_str() {
            "TITL" => {
              if !description.is_empty() {
                description.push(' ');
              }
              description.push_str(txt);
            }
            "AUTH" => rest.push(tagged("-Author", txt)),
            "PUBL" => rest.push(tagged("-Edition", txt)),
            "NOTE" => rest.push(tagged("-Note", txt)),
            other => self.warn(line.line_no, &format!("ignored; unknown tag {other}")),
          }
        }
        2 => {
          if l1 == "NOTE" && matches!(line.tag.as_str(), "CONT" | "CONC") {
            if txt.is_empty() {
              rest.push("|".to_string());
            } else {
              rest.push(format!("| {txt}"));
            }
          } else {
            self.warn(line.line_no, &format!("ignored; unknown tag {}", line.tag));
          }
        }
        _ => self.warn(line.line_no, "ignored; unexpected level in SOUR"),
      }
    }

    let mut out = vec![tagged("+Source", &description)];
    out.extend(rest);
    out
  }

  // ── FAM linking ─────────────────────────────────────────────────────────

  fn process_fam(&mut self, rec: &GedRecord) {
    let mut husb: Option<String> = None;
    let mut wife: Option<String> = None;
    let mut children: Vec<String> = Vec::new();
    let mut marr: Option<String> = None;
    let mut marr_before: Option<String> = None;
    let mut place: Option<String> = None;
    let mut mapref: Option<String> = None;
    let mut marr_note: Option<String> = None;

    let mut l1 = String::new();
    let mut l3 = String::new();

    for line in &rec.lines {
      let data = line.data.as_deref();
      match line.level {
        1 => {
          l1 = line.tag.clone();
          match (line.tag.as_str(), data) {
            ("HUSB", Some(d)) => husb = Some(d.to_string()),
            ("WIFE", Some(d)) => wife = Some(d.to_string()),
            ("CHIL", Some(d)) => children.push(d.to_string()),
            ("HUSB" | "WIFE" | "CHIL", None) => {
              self.warn(line.line_no, "ignored; missing xref")
            }
            ("MARR", d) => {
              marr = Some("?".to_string());
              if let Some(d) = d
                && d != "Y"
              {
                marr_note = Some(d.to_string());
              }
            }
            (other, _) => self.warn(line.line_no, &format!("ignored; unknown tag {other}")),
          }
        }
        2 => match line.tag.as_str() {
          "_MREL" | "_FREL" => {
            if data != Some("Natural") {
              self.warn(line.line_no, "ignored; children assumed natural");
            }
          }
          "DATE" if l1 == "MARR" => {
            if let Some(d) = data {
              let converted = convert_date(d, self.origin.as_str(), line.line_no, &mut self.diags);
              marr = Some(converted.primary);
              marr_before = converted.before;
            }
          }
          "PLAC" if l1 == "MARR" => place = data.map(str::to_string),
          _ => self.warn(line.line_no, "ignored"),
        },
        3 => {
          l3 = line.tag.clone();
          if line.tag != "MAP" {
            self.warn(line.line_no, "ignored");
          }
        }
        _ => {
          if l3 == "MAP" && matches!(line.tag.as_str(), "LATI" | "LONG") {
            if let Some(d) = data {
              match &mut mapref {
                None => mapref = Some(d.to_string()),
                Some(m) => {
                  m.push(' ');
                  m.push_str(d);
                }
              }
            }
          } else {
            self.warn(line.line_no, "ignored");
          }
        }
      }
    }

    let father = self.resolve_parent(husb.as_deref(), "HUSB", rec.first_line);
    let mother = self.resolve_parent(wife.as_deref(), "WIFE", rec.first_line);
    let father_line = father.map(|i| tagged("Father:", &self.works[i].display_ref()));
    let mother_line = mother.map(|i| tagged("Mother:", &self.works[i].display_ref()));

    // First-assignment wins: a child already linked to parents keeps them
    // and the conflict is reported.
    for child_xref in &children {
      let Some(&ci) = self.by_xref.get(child_xref) else {
        self.diags.warn(
          self.origin.as_str(),
          Some(rec.first_line),
          format!("CHIL {child_xref} not found"),
        );
        continue;
      };
      let child = &self.works[ci];
      if child.father_line.is_none() && child.mother_line.is_none() {
        self.works[ci].father_line = father_line.clone();
        self.works[ci].mother_line = mother_line.clone();
      } else {
        let msg = format!(
          "{} ({child_xref}) has two sets of parents; keeping {} / {}",
          child.display_ref(),
          child.father_line.as_deref().unwrap_or("(none)"),
          child.mother_line.as_deref().unwrap_or("(none)"),
        );
        self.diags.warn(self.origin.as_str(), Some(rec.first_line), msg);
      }
    }

    // Marriage events go on both partners, each referencing the other.
    let mut marr = marr;
    if marr.is_none() && self.options.assume_partnership {
      marr = Some("?".to_string());
    }
    let Some(marr_date) = marr else { return };
    if father.is_none() && mother.is_none() {
      return;
    }

    let mut sub = Vec::new();
    if let Some(before) = &marr_before {
      sub.push(tagged("+Before", before));
    }
    if let Some(note) = &marr_note {
      sub.push(tagged("+Note", note));
    }
    if let Some(place) = &place {
      sub.push(tagged("+Place", place));
      if let Some(mapref) = &mapref {
        sub.push(tagged("-Mapref", mapref));
      }
    }

    let father_ref = father.map(|i| self.works[i].display_ref());
    let mother_ref = mother.map(|i| self.works[i].display_ref());

    if let Some(fi) = father {
      let mut block = EventBlock::with_rest(
        "Marriage",
        mother_ref.as_deref().unwrap_or("not known"),
      );
      block.date = marr_date.clone();
      block.sub = sub.clone();
      self.works[fi].others.push(block);
    }
    if let Some(mi) = mother {
      let mut block = EventBlock::with_rest(
        "Marriage",
        father_ref.as_deref().unwrap_or("not known"),
      );
      block.date = marr_date.clone();
      block.sub = sub.clone();
      self.works[mi].others.push(block);
    }
  }

  fn resolve_parent(&mut self, xref: Option<&str>, role: &str, line_no: usize) -> Option<usize> {
    let xref = xref?;
    match self.by_xref.get(xref) {
      Some(&i) => Some(i),
      None => {
        self.diags.warn(
          self.origin.as_str(),
          Some(line_no),
          format!("{role} {xref} not found"),
        );
        None
      }
    }
  }

  // ── Finalisation ────────────────────────────────────────────────────────

  fn finalize(mut self, db: &mut Database) -> ImportReport {
    let mut added = 0;
    for mut work in std::mem::take(&mut self.works) {
      if work.death.is_none() && self.options.assume_dead {
        let mut death = EventBlock::new("Death");
        death.sub.push(tagged("+Source", "Assumed, date unknown"));
        work.death = Some(death);
      }
      // Event dates only settle once DATE lines are applied, so ordering
      // happens here rather than on insertion.
      work.others.sort_by(|a, b| a.date.cmp(&b.date));

      let card = work.render_card();
      let parsed = stemma_card::parse_str(&card, format!("gedcom-{}", work.xref));
      for d in parsed.diagnostics {
        self.diags.push(d);
      }
      let mut person = parsed.person;
      person.source = PersonSource::Gedcom {
        xref: work.xref.clone(),
      };
      match db.add_person(person) {
        Ok(_) => added += 1,
        Err(e) => self.diags.error(self.origin.as_str(), None, e.to_string()),
      }
    }
    tracing::info!(persons = added, "gedcom import complete");
    ImportReport {
      persons_added: added,
      diagnostics:   self.diags.into_vec(),
    }
  }

  fn warn(&mut self, line_no: usize, message: &str) {
    self.diags.warn(self.origin.as_str(), Some(line_no), message);
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Import GEDCOM text into `db`. Malformed content degrades to partial
/// data plus diagnostics; only an unreadable file is fatal (see
/// [`import_file`]).
pub fn import_str(
  input: &str,
  origin: &str,
  db: &mut Database,
  options: &ImportOptions,
) -> ImportReport {
  let mut diags = Diagnostics::new();
  let file = read_records(input, origin, &mut diags);

  let mut importer = Importer {
    origin: origin.to_string(),
    options,
    diags,
    works: Vec::new(),
    by_xref: HashMap::new(),
    all_standard: true,
  };

  for rec in &file.indi {
    importer.process_indi(rec, &file);
  }
  if !importer.all_standard {
    importer.allocate_nonstandard(db);
  }
  for rec in &file.fam {
    importer.process_fam(rec);
  }
  importer.finalize(db)
}

/// Import a GEDCOM file from disk.
pub fn import_file(
  path: &Path,
  db: &mut Database,
  options: &ImportOptions,
) -> Result<ImportReport> {
  let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(import_str(&text, &path.display().to_string(), db, options))
}
