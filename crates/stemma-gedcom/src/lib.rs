//! GEDCOM codec for the Stemma family database.
//!
//! Imports a practical subset of GEDCOM 5.5.1 (INDI, FAM, NOTE, SOUR, with
//! the extension tags real exports actually contain) into the native
//! person model, and exports the database back out. Unsupported constructs
//! are logged and skipped, never fatal.
//!
//! # Quick start
//!
//! ```no_run
//! use stemma_core::Database;
//! use stemma_gedcom::{ImportOptions, import_file};
//!
//! let mut db = Database::new();
//! let report = import_file(
//!   std::path::Path::new("family.ged"),
//!   &mut db,
//!   &ImportOptions::default(),
//! ).unwrap();
//! println!("{} persons, {} problems", report.persons_added, report.diagnostics.len());
//! ```

pub mod date;
pub mod error;
mod export;
mod import;
pub mod record;

pub use date::{GedcomDate, convert_date};
pub use error::{Error, Result};
pub use export::{export_file, export_string, export_with_date};
pub use import::{ImportOptions, ImportReport, import_file, import_str};

// ─── Round-trip test ─────────────────────────────────────────────────────────


// ─── Shared test helpers ─────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod test_helpers {
  use stemma_core::{
    Database, Event, EventKind, ParentRef, Person, PersonSource, Sex,
  };

  fn person(id: usize, name: &str, sex: Sex, birth: &str) -> Person {
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    p.sex = sex;
    p.push_event(Event::new(birth, EventKind::Birth));
    p
  }

  fn parent(name: &str, id: usize) -> Option<ParentRef> {
    Some(ParentRef {
      name: name.to_string(),
      id:   Some(id),
    })
  }

  /// Two parents (explicitly married), two children. Everyone except the
  /// children has a recorded death so the data is also usable in privacy
  /// tests.
  pub(crate) fn small_family() -> Database {
    let mut db = Database::new();

    let mut father = person(1, "John Doe", Sex::Male, "1870-01-02");
    father.push_event(Event::new("1940", EventKind::Death));
    let mut marr = Event::new("1895-02-14", EventKind::Marriage);
    marr.rest = Some("Mary Roe [2]".to_string());
    father.insert_event(marr);
    db.add_person(father).unwrap();

    let mut mother = person(2, "Mary Roe", Sex::Female, "1872");
    mother.push_event(Event::new("1950", EventKind::Death));
    let mut marr = Event::new("1895-02-14", EventKind::Marriage);
    marr.rest = Some("John Doe [1]".to_string());
    mother.insert_event(marr);
    db.add_person(mother).unwrap();

    let mut alice = person(3, "Alice Doe", Sex::Female, "1900");
    alice.father = parent("John Doe", 1);
    alice.mother = parent("Mary Roe", 2);
    db.add_person(alice).unwrap();

    let mut bob = person(4, "Bob Doe", Sex::Male, "1898");
    bob.father = parent("John Doe", 1);
    bob.mother = parent("Mary Roe", 2);
    db.add_person(bob).unwrap();

    db
  }
}
