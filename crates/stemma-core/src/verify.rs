//! Database integrity verification.
//!
//! A full scan cross-checking every stored parent and partner reference:
//! the id must resolve to a person actually bearing the recorded name, and
//! partnerships must be recorded symmetrically on both sides. Problems are
//! reported, never fixed — the card files are the authority and only an
//! editor should change them.
//!
//! Normal queries never run these checks; they tolerate dangling
//! references by treating them as absent.

use crate::{
  database::Database,
  diag::Diagnostic,
  person::{ParentRef, Person, normalise_name, parse_name_and_id},
};

impl Database {
  pub fn verify(&self) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for p in self.iter() {
      let Some(id) = p.id else { continue };
      self.verify_parent(p, id, p.father.as_ref(), "father", &mut diags);
      self.verify_parent(p, id, p.mother.as_ref(), "mother", &mut diags);
      self.verify_partnerships(p, id, &mut diags);
    }
    diags
  }

  fn verify_parent(
    &self,
    p: &Person,
    id: usize,
    slot: Option<&ParentRef>,
    label: &str,
    diags: &mut Vec<Diagnostic>,
  ) {
    let Some(parent) = slot else { return };
    let Some(pid) = parent.id else { return };
    let origin = p.origin();
    match self.get(pid) {
      None => diags.push(Diagnostic::error(
        origin,
        None,
        format!("{label} [{pid}] of [{id}] does not resolve"),
      )),
      Some(target) => {
        let recorded = normalise_name(&parent.name);
        let actual = normalise_name(target.display_name());
        if recorded != actual {
          diags.push(Diagnostic::warning(
            origin,
            None,
            format!(
              "{label} [{pid}] of [{id}] is recorded as \"{recorded}\" but is named \"{actual}\""
            ),
          ));
        }
      }
    }
  }

  fn verify_partnerships(&self, p: &Person, id: usize, diags: &mut Vec<Diagnostic>) {
    let origin = p.origin();
    for ev in p.partnership_events() {
      let Some(rest) = ev.rest.as_deref() else { continue };
      let (partner, warn) = parse_name_and_id(rest, &origin);
      if let Some(w) = warn {
        diags.push(w);
        continue;
      }
      let Some(pid) = partner.id else { continue };

      let Some(other) = self.get(pid) else {
        diags.push(Diagnostic::error(
          origin.as_str(),
          None,
          format!("partner [{pid}] of [{id}] does not resolve"),
        ));
        continue;
      };

      let actual = normalise_name(other.display_name());
      if partner.name != actual && !partner.name.is_empty() {
        diags.push(Diagnostic::warning(
          origin.as_str(),
          None,
          format!(
            "partner [{pid}] of [{id}] is recorded as \"{}\" but is named \"{actual}\"",
            partner.name
          ),
        ));
      }

      // Symmetry: the partner must record a partnership back to the
      // subject, with the same date.
      let back: Vec<&str> = other
        .partnership_events()
        .filter(|e| {
          e.rest
            .as_deref()
            .map(|r| parse_name_and_id(r, &origin).0.id == Some(id))
            .unwrap_or(false)
        })
        .map(|e| e.date.as_str())
        .collect();
      if back.is_empty() {
        diags.push(Diagnostic::warning(
          origin.as_str(),
          None,
          format!("[{id}] records partner [{pid}] but [{pid}] has no matching partnership"),
        ));
      } else if !back.contains(&ev.date.as_str()) {
        diags.push(Diagnostic::warning(
          origin.as_str(),
          None,
          format!(
            "partnership dates disagree: [{id}] has {} but [{pid}] has {}",
            ev.date,
            back.join(", ")
          ),
        ));
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    event::{Event, EventKind},
    person::PersonSource,
  };

  fn person(id: usize, name: &str) -> Person {
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    p
  }

  fn partnership(date: &str, partner: &str) -> Event {
    let mut e = Event::new(date, EventKind::Marriage);
    e.rest = Some(partner.to_string());
    e
  }

  #[test]
  fn clean_database_verifies_clean() {
    let mut db = Database::new();
    let mut a = person(1, "John Doe");
    a.push_event(partnership("1920", "Mary Roe [2]"));
    let mut b = person(2, "Mary Roe");
    b.push_event(partnership("1920", "John Doe [1]"));
    db.add_person(a).unwrap();
    db.add_person(b).unwrap();
    let mut c = person(3, "Kid Doe");
    c.father = Some(ParentRef {
      name: "John Doe".to_string(),
      id:   Some(1),
    });
    db.add_person(c).unwrap();
    assert!(db.verify().is_empty());
  }

  #[test]
  fn dangling_parent_id_reported() {
    let mut db = Database::new();
    let mut c = person(3, "Kid Doe");
    c.father = Some(ParentRef {
      name: "John Doe".to_string(),
      id:   Some(9),
    });
    db.add_person(c).unwrap();
    let diags = db.verify();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("does not resolve"));
  }

  #[test]
  fn parent_name_mismatch_reported() {
    let mut db = Database::new();
    db.add_person(person(1, "John Doe")).unwrap();
    let mut c = person(3, "Kid Doe");
    c.father = Some(ParentRef {
      name: "Jack Doe".to_string(),
      id:   Some(1),
    });
    db.add_person(c).unwrap();
    let diags = db.verify();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("Jack Doe"));
  }

  #[test]
  fn asymmetric_partnership_reported() {
    let mut db = Database::new();
    let mut a = person(1, "John Doe");
    a.push_event(partnership("1920", "Mary Roe [2]"));
    db.add_person(a).unwrap();
    db.add_person(person(2, "Mary Roe")).unwrap();
    let diags = db.verify();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("no matching partnership"));
  }

  #[test]
  fn partnership_date_mismatch_reported() {
    let mut db = Database::new();
    let mut a = person(1, "John Doe");
    a.push_event(partnership("1920", "Mary Roe [2]"));
    let mut b = person(2, "Mary Roe");
    b.push_event(partnership("1921", "John Doe [1]"));
    db.add_person(a).unwrap();
    db.add_person(b).unwrap();
    let diags = db.verify();
    // Both directions report the disagreement.
    assert_eq!(diags.len(), 2);
    assert!(diags[0].message.contains("dates disagree"));
  }
}
