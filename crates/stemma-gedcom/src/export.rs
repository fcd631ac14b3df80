//! GEDCOM export.
//!
//! Walks the database and emits INDI records plus FAM records derived from
//! parent links and partnerships. The output targets the practical subset
//! this crate imports, so export-then-reimport round-trips ids, names,
//! dates and parent linkage.

use std::collections::HashMap;
use std::path::Path;

use stemma_core::{Database, DateFormat, Sex, date::format_date};

use crate::error::{Error, Result};

// ─── Family assembly ─────────────────────────────────────────────────────────

/// One FAM record under construction, keyed by the (husband, wife) pair.
#[derive(Debug)]
struct FamWork {
  husb:      Option<usize>,
  wife:      Option<usize>,
  marr_date: Option<String>,
  children:  Vec<usize>,
}

fn find_or_create(
  fams: &mut Vec<FamWork>,
  husb: Option<usize>,
  wife: Option<usize>,
) -> usize {
  if let Some(i) = fams.iter().position(|f| f.husb == husb && f.wife == wife) {
    return i;
  }
  fams.push(FamWork {
    husb,
    wife,
    marr_date: None,
    children: Vec::new(),
  });
  fams.len() - 1
}

// ─── Name conversion ─────────────────────────────────────────────────────────

/// The last name element becomes the `/surname/`.
fn name_to_gedcom(name: &str) -> String {
  let parts: Vec<&str> = name.split_whitespace().collect();
  match parts.split_last() {
    None => String::new(),
    Some((last, [])) => format!("/{last}/"),
    Some((last, given)) => format!("{} /{last}/", given.join(" ")),
  }
}

// ─── Export ──────────────────────────────────────────────────────────────────

fn gedcom_today() -> String {
  chrono::Local::now().format("%-d %b %Y").to_string().to_uppercase()
}

/// Render the whole database as GEDCOM text, with an explicit header date
/// (separated out so tests are deterministic).
pub fn export_with_date(db: &Database, header_date: &str) -> String {
  let mut fams: Vec<FamWork> = Vec::new();
  let mut famc: HashMap<usize, usize> = HashMap::new();

  // Pass 1: every person with a known parent id joins a family as a
  // child. Parents known by name only cannot be exported.
  for p in db.iter() {
    let Some(pid) = p.id else { continue };
    let f = p.father.as_ref().and_then(|r| r.id);
    let m = p.mother.as_ref().and_then(|r| r.id);
    if f.is_some() || m.is_some() {
      let i = find_or_create(&mut fams, f, m);
      fams[i].children.push(pid);
      famc.insert(pid, i);
    }
  }

  // Pass 2: partnerships create (or date) the couple's family. Both
  // partners see the same pair, so the family is created once.
  for p in db.iter() {
    let Some(pid) = p.id else { continue };
    for partner in db.partners(pid) {
      let Some(qid) = partner.id else { continue };
      let (husb, wife) = match p.sex {
        Sex::Male => (Some(pid), Some(qid)),
        _ => (Some(qid), Some(pid)),
      };
      let i = find_or_create(&mut fams, husb, wife);
      if !partner.assumed && fams[i].marr_date.is_none() {
        let date = format_date(Some(&partner.date), None, DateFormat::Gedcom);
        if !date.is_empty() {
          fams[i].marr_date = Some(date);
        }
      }
    }
  }

  let mut fams_of: HashMap<usize, Vec<usize>> = HashMap::new();
  for (i, fam) in fams.iter().enumerate() {
    for side in [fam.husb, fam.wife].into_iter().flatten() {
      fams_of.entry(side).or_default().push(i);
    }
  }

  // ── Rendering ───────────────────────────────────────────────────────────

  let mut out = vec![
    "0 HEAD".to_string(),
    "1 SOUR stemma".to_string(),
    format!("1 DATE {header_date}"),
    "1 GEDC".to_string(),
    "2 VERS 5.5.1".to_string(),
    "1 CHAR UTF-8".to_string(),
  ];

  for p in db.iter() {
    let Some(pid) = p.id else { continue };
    out.push(format!("0 @I{pid}@ INDI"));
    out.push(format!("1 NAME {}", name_to_gedcom(p.display_name())));
    match p.sex {
      Sex::Male => out.push("1 SEX M".to_string()),
      Sex::Female => out.push("1 SEX F".to_string()),
      Sex::Unknown => {}
    }

    out.push("1 BIRT".to_string());
    let dob = format_date(
      p.birth_event().map(|e| e.date.as_str()),
      None,
      DateFormat::Gedcom,
    );
    if !dob.is_empty() {
      out.push(format!("2 DATE {dob}"));
    }

    if p.death_event().is_some() {
      out.push("1 DEAT".to_string());
      let dod = format_date(p.death_date(), None, DateFormat::Gedcom);
      if !dod.is_empty() {
        out.push(format!("2 DATE {dod}"));
      }
    }

    if let Some(&i) = famc.get(&pid) {
      out.push(format!("1 FAMC @F{}@", i + 1));
    }
    for &i in fams_of.get(&pid).into_iter().flatten() {
      out.push(format!("1 FAMS @F{}@", i + 1));
    }
  }

  for (i, fam) in fams.iter().enumerate() {
    out.push(format!("0 @F{}@ FAM", i + 1));
    if let Some(h) = fam.husb {
      out.push(format!("1 HUSB @I{h}@"));
    }
    if let Some(w) = fam.wife {
      out.push(format!("1 WIFE @I{w}@"));
    }
    for &c in &fam.children {
      out.push(format!("1 CHIL @I{c}@"));
    }
    if let Some(date) = &fam.marr_date {
      out.push("1 MARR".to_string());
      out.push(format!("2 DATE {date}"));
    }
  }

  out.push("0 TRLR".to_string());
  let mut text = out.join("\n");
  text.push('\n');
  text
}

/// Render the whole database as GEDCOM text, dated today.
pub fn export_string(db: &Database) -> String {
  export_with_date(db, &gedcom_today())
}

/// Write the database to a GEDCOM file.
pub fn export_file(path: &Path, db: &Database) -> Result<()> {
  std::fs::write(path, export_string(db)).map_err(|source| Error::Write {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use stemma_core::{Event, EventKind, ParentRef, Person, PersonSource};

  fn person(id: usize, name: &str, sex: Sex, birth: &str) -> Person {
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    p.sex = sex;
    p.push_event(Event::new(birth, EventKind::Birth));
    p
  }

  #[test]
  fn name_conversion() {
    assert_eq!(name_to_gedcom("John Albert Doe"), "John Albert /Doe/");
    assert_eq!(name_to_gedcom("Cher"), "/Cher/");
  }

  #[test]
  fn export_contains_expected_records() {
    let mut db = Database::new();
    let mut father = person(1, "John Doe", Sex::Male, "1870-01-02");
    father.push_event(Event::new("1940", EventKind::Death));
    let mut marr = Event::new("1895-02-14", EventKind::Marriage);
    marr.rest = Some("Mary Roe [2]".to_string());
    father.insert_event(marr);
    db.add_person(father).unwrap();
    let mut mother = person(2, "Mary Roe", Sex::Female, "1872");
    let mut marr = Event::new("1895-02-14", EventKind::Marriage);
    marr.rest = Some("John Doe [1]".to_string());
    mother.insert_event(marr);
    db.add_person(mother).unwrap();
    let mut child = person(3, "Alice Doe", Sex::Female, "1900");
    child.father = Some(ParentRef {
      name: "John Doe".to_string(),
      id:   Some(1),
    });
    child.mother = Some(ParentRef {
      name: "Mary Roe".to_string(),
      id:   Some(2),
    });
    db.add_person(child).unwrap();

    let text = export_with_date(&db, "1 JAN 2000");
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines.contains(&"0 @I1@ INDI"));
    assert!(lines.contains(&"1 NAME John /Doe/"));
    assert!(lines.contains(&"1 SEX M"));
    assert!(lines.contains(&"2 DATE 2 JAN 1870"));
    assert!(lines.contains(&"1 DEAT"));
    assert!(lines.contains(&"0 @F1@ FAM"));
    assert!(lines.contains(&"1 HUSB @I1@"));
    assert!(lines.contains(&"1 WIFE @I2@"));
    assert!(lines.contains(&"1 CHIL @I3@"));
    assert!(lines.contains(&"1 MARR"));
    assert!(lines.contains(&"2 DATE 14 FEB 1895"));
    assert!(lines.contains(&"0 TRLR"));
    // The child belongs to the couple's family.
    assert!(lines.contains(&"1 FAMC @F1@"));
  }

  #[test]
  fn death_omitted_for_living() {
    let mut db = Database::new();
    db.add_person(person(1, "Jane Doe", Sex::Female, "1960")).unwrap();
    let text = export_with_date(&db, "1 JAN 2000");
    assert!(!text.contains("DEAT"));
  }
}
