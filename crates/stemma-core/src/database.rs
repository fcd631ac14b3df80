//! The Database — all persons, indexed by id.
//!
//! Persons live in a sparse array: slot `i` is either empty or holds the
//! person whose own id is `i`. The order in which records arrive is not
//! known, so gaps are filled with `None` as loading proceeds. Adding at an
//! occupied slot is an error — the first writer wins, never a silent
//! overwrite.
//!
//! Relationship queries (siblings, partners, trees, privacy, verification)
//! are implemented in their own modules as further `impl Database` blocks;
//! this module owns only storage and reload semantics.

use crate::{
  diag::Diagnostics,
  error::{Error, Result},
  person::Person,
};

/// What a single-file reload did to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
  /// Same id as before: the record was replaced in place.
  Replaced,
  /// A new id (or a new file): the record was inserted; if the file
  /// previously loaded under a different id, that entry is left behind and
  /// a warning is reported.
  Added,
  /// The record could not be taken over (id removed or duplicate); the
  /// database is unchanged.
  Skipped,
}

#[derive(Debug, Default)]
pub struct Database {
  persons: Vec<Option<Person>>,
}

impl Database {
  pub fn new() -> Self { Self::default() }

  // ── Storage ─────────────────────────────────────────────────────────────

  /// Add a person under its own id. The array grows as needed; a clash with
  /// an existing record is an error and leaves the existing record intact.
  pub fn add_person(&mut self, person: Person) -> Result<usize> {
    let Some(id) = person.id else {
      return Err(Error::MissingId(person.origin()));
    };
    if self.persons.len() <= id {
      self.persons.resize_with(id + 1, || None);
    }
    if self.persons[id].is_some() {
      return Err(Error::DuplicateId {
        id,
        rejected: person.origin(),
      });
    }
    self.persons[id] = Some(person);
    Ok(id)
  }

  pub fn get(&self, id: usize) -> Option<&Person> {
    self.persons.get(id).and_then(|slot| slot.as_ref())
  }

  pub fn get_mut(&mut self, id: usize) -> Option<&mut Person> {
    self.persons.get_mut(id).and_then(|slot| slot.as_mut())
  }

  /// Number of persons actually present.
  pub fn len(&self) -> usize {
    self.persons.iter().filter(|p| p.is_some()).count()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Length of the backing array, including gaps.
  pub fn slots(&self) -> usize { self.persons.len() }

  pub fn iter(&self) -> impl Iterator<Item = &Person> {
    self.persons.iter().filter_map(|slot| slot.as_ref())
  }

  pub fn max_id(&self) -> Option<usize> {
    self.persons.iter().rposition(|slot| slot.is_some())
  }

  /// Unoccupied ids below the maximum used id. Slot 0 is conventionally
  /// never used, so it is not reported.
  pub fn unused_ids(&self) -> Vec<usize> {
    (1..self.persons.len()).filter(|&i| self.persons[i].is_none()).collect()
  }

  // ── Lookup ──────────────────────────────────────────────────────────────

  /// Persons whose name contains every given word, case-insensitively.
  /// An empty term list matches everyone.
  pub fn matching(&self, terms: &str) -> Vec<&Person> {
    let words: Vec<String> = terms.split_whitespace().map(|w| w.to_lowercase()).collect();
    self
      .iter()
      .filter(|p| {
        let name = p.display_name().to_lowercase();
        words.iter().all(|w| name.contains(w.as_str()))
      })
      .collect()
  }

  // ── Privacy cache ───────────────────────────────────────────────────────

  /// Invalidate every memoised privacy result. Must be called after any
  /// edit that could change a death record or a private flag.
  pub fn clear_privacy_cache(&mut self) {
    for p in self.persons.iter_mut().flatten() {
      p.calculated_privacy = None;
    }
  }

  // ── Single-record reload ────────────────────────────────────────────────

  /// Take over a freshly re-parsed record for a file that may already be
  /// loaded. Replace-in-place if the id is unchanged; insert as new (with a
  /// warning, leaving the stale entry behind) if the id changed; leave the
  /// database untouched (with a warning) if the id was removed.
  pub fn reload_one(&mut self, person: Person, diags: &mut Diagnostics) -> ReloadOutcome {
    let origin = person.origin();
    let previous = self
      .persons
      .iter()
      .flatten()
      .find(|p| p.source == person.source)
      .and_then(|p| p.id);

    match (previous, person.id) {
      (_, None) => {
        diags.warn(
          origin,
          None,
          "id removed from file; database entry left untouched",
        );
        ReloadOutcome::Skipped
      }
      (Some(old), Some(new)) if old == new => {
        self.persons[new] = Some(person);
        ReloadOutcome::Replaced
      }
      (old, Some(new)) => {
        if let Some(old) = old {
          diags.warn(
            origin.as_str(),
            None,
            format!("id changed from [{old}] to [{new}]; stale entry [{old}] kept"),
          );
        }
        match self.add_person(person) {
          Ok(_) => ReloadOutcome::Added,
          Err(e) => {
            diags.error(origin, None, e.to_string());
            ReloadOutcome::Skipped
          }
        }
      }
    }
  }
}
