//! Derived relationship queries.
//!
//! Nothing here is cached: sibling sets, child lists and partner lists are
//! recomputed from the parent-reference fields on every call. The two
//! parent references on each person are the single source of truth;
//! everything else is a view.

use crate::{
  database::Database,
  person::{ParentRef, Person, parse_name_and_id},
};

// ─── Partner ─────────────────────────────────────────────────────────────────

/// One partnership of a person: either recorded as an explicit Marriage or
/// Partnership event, or assumed from children who share an identified
/// co-parent with no explicit event covering them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
  /// Raw event date; `?` for assumed partnerships.
  pub date:    String,
  pub name:    Option<String>,
  pub id:      Option<usize>,
  pub assumed: bool,
}

impl Partner {
  /// True when this partner and the given parent reference identify the
  /// same person: by id when both sides carry one, by name otherwise.
  fn covers(&self, parent: &ParentRef) -> bool {
    match (self.id, parent.id) {
      (Some(a), Some(b)) => a == b,
      _ => !parent.name.is_empty() && self.name.as_deref() == Some(parent.name.as_str()),
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

fn father_id(p: &Person) -> Option<usize> {
  p.father.as_ref().and_then(|r| r.id)
}

fn mother_id(p: &Person) -> Option<usize> {
  p.mother.as_ref().and_then(|r| r.id)
}

impl Database {
  /// Persons sharing the subject's father id or mother id, the subject
  /// included, sorted by raw birth date. Unknown parent ids never match
  /// each other, so two persons with unrecorded fathers are not siblings.
  /// Empty only when the subject is missing or has no parent id at all.
  pub fn siblings(&self, id: usize) -> Vec<&Person> {
    let Some(subject) = self.get(id) else {
      return Vec::new();
    };
    let f = father_id(subject);
    let m = mother_id(subject);
    if f.is_none() && m.is_none() {
      return Vec::new();
    }

    let mut out: Vec<&Person> = self
      .iter()
      .filter(|p| {
        (f.is_some() && father_id(p) == f) || (m.is_some() && mother_id(p) == m)
      })
      .collect();
    out.sort_by(|a, b| a.birth_date().cmp(b.birth_date()));
    out
  }

  /// Persons recording the subject as father or mother, sorted by raw
  /// birth date. `other_parent` narrows the result to children whose other
  /// parent slot carries that id.
  pub fn children(&self, id: usize, other_parent: Option<usize>) -> Vec<&Person> {
    let mut out: Vec<&Person> = self
      .iter()
      .filter(|p| {
        let pf = father_id(p);
        let pm = mother_id(p);
        if pf != Some(id) && pm != Some(id) {
          return false;
        }
        match other_parent {
          None => true,
          Some(o) => {
            let other = if pf == Some(id) { pm } else { pf };
            other == Some(o)
          }
        }
      })
      .collect();
    out.sort_by(|a, b| a.birth_date().cmp(b.birth_date()));
    out
  }

  /// The parent reference on `child` that is not the given parent.
  pub fn other_parent<'a>(&self, child: &'a Person, id: usize) -> Option<&'a ParentRef> {
    if father_id(child) == Some(id) {
      child.mother.as_ref()
    } else {
      child.father.as_ref()
    }
  }

  /// All partnerships of the subject, explicit and assumed, deduplicated
  /// and sorted by raw date (assumed partnerships carry `?` and therefore
  /// sort last).
  ///
  /// The assumption step exists because many historical records only name
  /// a child's other parent, with no marriage record for the couple.
  pub fn partners(&self, id: usize) -> Vec<Partner> {
    let Some(subject) = self.get(id) else {
      return Vec::new();
    };
    let origin = subject.origin();
    let mut out: Vec<Partner> = Vec::new();

    for ev in subject.partnership_events() {
      let (name, pid) = match ev.rest.as_deref() {
        Some(rest) => {
          // Warnings from the reference grammar are not surfaced here;
          // the integrity pass reports dangling or malformed references.
          let (r, _) = parse_name_and_id(rest, &origin);
          ((!r.name.is_empty()).then(|| r.name), r.id)
        }
        None => (None, None),
      };
      out.push(Partner {
        date: ev.date.clone(),
        name,
        id: pid,
        assumed: false,
      });
    }

    for child in self.children(id, None) {
      let Some(other) = self.other_parent(child, id) else {
        continue;
      };
      if other.id.is_none() && other.name.is_empty() {
        continue;
      }
      if out.iter().any(|p| p.covers(other)) {
        continue;
      }
      out.push(Partner {
        date:    "?".to_string(),
        name:    (!other.name.is_empty()).then(|| other.name.clone()),
        id:      other.id,
        assumed: true,
      });
    }

    out.sort_by(|a, b| a.date.cmp(&b.date));
    out
  }

  /// Children of the subject belonging to a specific partnership: matched
  /// by the partner's id when one is known, by name for name-only
  /// partners.
  pub fn children_of_partnership(&self, id: usize, partner: &Partner) -> Vec<&Person> {
    match partner.id {
      Some(pid) => self.children(id, Some(pid)),
      None => {
        let mut out: Vec<&Person> = self
          .children(id, None)
          .into_iter()
          .filter(|child| match self.other_parent(child, id) {
            Some(other) => other.id.is_none() && partner.covers(other),
            None => false,
          })
          .collect();
        out.sort_by(|a, b| a.birth_date().cmp(b.birth_date()));
        out
      }
    }
  }
}
