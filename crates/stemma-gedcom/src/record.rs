//! Record collection — the first GEDCOM pass.
//!
//! A GEDCOM file is a flat sequence of level-numbered lines; every line at
//! level 0 opens a record that owns all following lines until the next
//! level 0. This pass only groups and files the records; field extraction
//! happens later, once every record is known.

use std::collections::HashMap;

use stemma_core::Diagnostics;

/// Levels 0 through 4 are consumed; deeper lines are dropped with a
/// warning.
pub const MAX_LEVEL: u8 = 4;

/// One body line of a record, already split into level, tag and data.
#[derive(Debug, Clone)]
pub struct GedLine {
  pub level:   u8,
  pub tag:     String,
  pub data:    Option<String>,
  pub line_no: usize,
}

/// A level-0 record with its body lines.
#[derive(Debug, Clone)]
pub struct GedRecord {
  pub first_line: usize,
  pub xref:       Option<String>,
  pub tag:        String,
  /// Text after the tag on the level-0 line itself (NOTE records can carry
  /// their first line of text here).
  pub data:       Option<String>,
  pub lines:      Vec<GedLine>,
}

/// All records of one file, filed by type. Singletons keep the first
/// occurrence; NOTE and SOUR records are keyed by xref for reference
/// resolution; INDI and FAM keep file order.
#[derive(Debug, Default)]
pub struct GedcomFile {
  pub head: Option<GedRecord>,
  pub subm: Option<GedRecord>,
  pub trlr: Option<GedRecord>,
  pub indi: Vec<GedRecord>,
  pub fam:  Vec<GedRecord>,
  pub note: HashMap<String, GedRecord>,
  pub sour: HashMap<String, GedRecord>,
}

// ─── Line splitting ──────────────────────────────────────────────────────────

/// Split `LEVEL [@XREF@] TAG [DATA]`. Returns `(level, xref, tag, data)`.
fn split_line(line: &str) -> Option<(u8, Option<&str>, &str, Option<&str>)> {
  let line = line.trim();
  let (level_text, rest) = match line.split_once(char::is_whitespace) {
    Some((l, r)) => (l, r.trim_start()),
    None => (line, ""),
  };
  let level: u8 = level_text.parse().ok()?;

  let (first, after) = match rest.split_once(char::is_whitespace) {
    Some((f, a)) => (f, a.trim_start()),
    None => (rest, ""),
  };
  if first.is_empty() {
    return None;
  }

  if first.starts_with('@') {
    // Cross-referenced record: the tag follows the xref.
    let (tag, data) = match after.split_once(char::is_whitespace) {
      Some((t, d)) => (t, d.trim()),
      None => (after, ""),
    };
    if tag.is_empty() {
      return None;
    }
    Some((level, Some(first), tag, (!data.is_empty()).then_some(data)))
  } else {
    Some((level, None, first, (!after.is_empty()).then_some(after.trim_end())))
  }
}

// ─── Collection ──────────────────────────────────────────────────────────────

pub fn read_records(input: &str, origin: &str, diags: &mut Diagnostics) -> GedcomFile {
  let mut file = GedcomFile::default();
  let mut current: Option<GedRecord> = None;

  for (idx, raw) in input.lines().enumerate() {
    let line_no = idx + 1;
    // A byte-order marker survives on the first line of some exports.
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    if raw.trim().is_empty() {
      continue;
    }

    let Some((level, xref, tag, data)) = split_line(raw) else {
      diags.warn(
        origin,
        Some(line_no),
        format!("\"{}\" ignored; not a GEDCOM line", raw.trim()),
      );
      continue;
    };

    if level == 0 {
      if let Some(rec) = current.take() {
        file_record(&mut file, rec, origin, diags);
      }
      current = Some(GedRecord {
        first_line: line_no,
        xref: xref.map(str::to_string),
        tag: tag.to_string(),
        data: data.map(str::to_string),
        lines: Vec::new(),
      });
    } else if level > MAX_LEVEL {
      diags.warn(
        origin,
        Some(line_no),
        format!("\"{}\" ignored; level > {MAX_LEVEL}", raw.trim()),
      );
    } else if let Some(rec) = &mut current {
      rec.lines.push(GedLine {
        level,
        tag: tag.to_string(),
        data: data.map(str::to_string),
        line_no,
      });
    } else {
      diags.warn(
        origin,
        Some(line_no),
        format!("\"{}\" ignored; not part of a record", raw.trim()),
      );
    }
  }
  if let Some(rec) = current.take() {
    file_record(&mut file, rec, origin, diags);
  }
  file
}

fn file_record(file: &mut GedcomFile, rec: GedRecord, origin: &str, diags: &mut Diagnostics) {
  let line = rec.first_line;
  match rec.tag.as_str() {
    "HEAD" => file_singleton(&mut file.head, rec, origin, diags),
    "SUBM" => file_singleton(&mut file.subm, rec, origin, diags),
    "TRLR" => file_singleton(&mut file.trlr, rec, origin, diags),
    "INDI" => {
      if rec.xref.is_none() {
        diags.warn(origin, Some(line), "INDI record with no xref ignored");
      } else {
        file.indi.push(rec);
      }
    }
    "FAM" => {
      if rec.xref.is_none() {
        diags.warn(origin, Some(line), "FAM record with no xref ignored");
      } else {
        file.fam.push(rec);
      }
    }
    "NOTE" => file_keyed(&mut file.note, rec, origin, diags),
    "SOUR" => file_keyed(&mut file.sour, rec, origin, diags),
    other => diags.warn(
      origin,
      Some(line),
      format!("record with unknown tag \"{other}\" ignored"),
    ),
  }
}

fn file_singleton(
  slot: &mut Option<GedRecord>,
  rec: GedRecord,
  origin: &str,
  diags: &mut Diagnostics,
) {
  if slot.is_none() {
    let tag = rec.tag.clone();
    *slot = Some(rec);
    tracing::debug!(%tag, "singleton record read");
  } else {
    diags.warn(
      origin,
      Some(rec.first_line),
      format!("repeat {} record ignored", rec.tag),
    );
  }
}

fn file_keyed(
  map: &mut HashMap<String, GedRecord>,
  rec: GedRecord,
  origin: &str,
  diags: &mut Diagnostics,
) {
  let Some(xref) = rec.xref.clone() else {
    diags.warn(
      origin,
      Some(rec.first_line),
      format!("{} record with no xref ignored", rec.tag),
    );
    return;
  };
  map.insert(xref, rec);
}

#[cfg(test)]
mod tests {
  use super::*;

  fn read(input: &str) -> (GedcomFile, Vec<stemma_core::Diagnostic>) {
    let mut diags = Diagnostics::new();
    let file = read_records(input, "test.ged", &mut diags);
    (file, diags.into_vec())
  }

  const SAMPLE: &str = "\
0 HEAD
1 SOUR FTM
0 @I1@ INDI
1 NAME John /Doe/
1 SEX M
0 @F1@ FAM
1 HUSB @I1@
0 @N1@ NOTE First line of note
1 CONT second line
0 TRLR
";

  #[test]
  fn records_grouped_by_level_zero() {
    let (file, diags) = read(SAMPLE);
    assert!(diags.is_empty(), "{diags:?}");
    assert!(file.head.is_some());
    assert!(file.trlr.is_some());
    assert_eq!(file.indi.len(), 1);
    assert_eq!(file.fam.len(), 1);
    assert_eq!(file.indi[0].xref.as_deref(), Some("@I1@"));
    assert_eq!(file.indi[0].lines.len(), 2);
    // The NOTE record keeps its level-0 text.
    let note = file.note.get("@N1@").unwrap();
    assert_eq!(note.data.as_deref(), Some("First line of note"));
  }

  #[test]
  fn bom_is_stripped() {
    let (file, diags) = read("\u{feff}0 HEAD\n0 TRLR\n");
    assert!(diags.is_empty());
    assert!(file.head.is_some());
  }

  #[test]
  fn line_before_any_record_is_warned() {
    let (_, diags) = read("1 SOUR ghost\n0 HEAD\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("not part of a record"));
  }

  #[test]
  fn deep_levels_are_dropped_with_warning() {
    let (file, diags) = read("0 @I1@ INDI\n5 DEEP too far\n1 SEX M\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("level > 4"));
    assert_eq!(file.indi[0].lines.len(), 1);
  }

  #[test]
  fn repeat_singleton_is_ignored() {
    let (_, diags) = read("0 HEAD\n0 HEAD\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("repeat HEAD"));
  }

  #[test]
  fn indi_without_xref_is_ignored() {
    let (file, diags) = read("0 INDI\n1 SEX M\n");
    assert!(file.indi.is_empty());
    assert_eq!(diags.len(), 1);
  }
}
