//! Privacy classification.
//!
//! A person is private when explicitly flagged, or — under the default
//! policy — when no death is recorded, since a presumed-living person must
//! not appear in published reports. Privacy also shields a living person's
//! close relatives, so the check walks partners, children and siblings
//! recursively, capped at a configured number of hops.
//!
//! The hop cap is an intentional approximation, not a full transitive
//! closure: a change more hops away than the cap does not affect a
//! person's classification. The result is memoised per person because the
//! walk is too expensive to repeat on every query; the cache is cleared
//! explicitly after edits.

use crate::{database::Database, person::Person, settings::Settings};

impl Database {
  /// Classify one person, using and filling the memo cache.
  pub fn is_private(&mut self, id: usize, settings: &Settings) -> bool {
    if let Some(p) = self.get(id)
      && let Some(cached) = p.calculated_privacy
    {
      return cached;
    }
    let value = self.privacy_walk(id, 0, settings);
    if let Some(p) = self.get_mut(id) {
      p.calculated_privacy = Some(value);
    }
    value
  }

  /// Fill the cache for every person, e.g. before building report views.
  pub fn compute_all_privacy(&mut self, settings: &Settings) {
    let ids: Vec<usize> = self.iter().filter_map(|p| p.id).collect();
    for id in ids {
      self.is_private(id, settings);
    }
  }

  pub(crate) fn base_private(&self, p: &Person, settings: &Settings) -> bool {
    p.private || (settings.presume_living_private && p.death_event().is_none())
  }

  /// Depth-capped recursive walk. The memo cache is deliberately only
  /// consulted at the entry point: a cached value already includes that
  /// person's own relatives, so reusing it mid-walk would widen the hop
  /// cap unpredictably.
  fn privacy_walk(&self, id: usize, depth: usize, settings: &Settings) -> bool {
    let Some(p) = self.get(id) else {
      // Dangling references are tolerated during queries.
      return false;
    };
    if self.base_private(p, settings) {
      return true;
    }
    if depth >= settings.privacy_depth {
      return false;
    }

    for partner in self.partners(id) {
      if let Some(pid) = partner.id
        && self.privacy_walk(pid, depth + 1, settings)
      {
        return true;
      }
    }
    for child in self.children(id, None) {
      if let Some(cid) = child.id
        && self.privacy_walk(cid, depth + 1, settings)
      {
        return true;
      }
    }
    for sibling in self.siblings(id) {
      if let Some(sid) = sibling.id
        && sid != id
        && self.privacy_walk(sid, depth + 1, settings)
      {
        return true;
      }
    }
    false
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    event::{Event, EventKind},
    person::{ParentRef, PersonSource},
  };

  fn dead_person(id: usize, name: &str, father: Option<usize>) -> Person {
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    p.father = father.map(|fid| ParentRef {
      name: format!("Person {fid}"),
      id:   Some(fid),
    });
    p.push_event(Event::new("1800", EventKind::Birth));
    p.push_event(Event::new("1870", EventKind::Death));
    p
  }

  /// A four-generation chain 1 → 2 → 3 → 4, all with recorded deaths.
  fn chain() -> Database {
    let mut db = Database::new();
    db.add_person(dead_person(1, "Person 1", None)).unwrap();
    db.add_person(dead_person(2, "Person 2", Some(1))).unwrap();
    db.add_person(dead_person(3, "Person 3", Some(2))).unwrap();
    db.add_person(dead_person(4, "Person 4", Some(3))).unwrap();
    db
  }

  fn remove_death(db: &mut Database, id: usize) {
    let p = db.get_mut(id).unwrap();
    p.events.retain(|e| e.kind != EventKind::Death);
  }

  // ── Base policy ─────────────────────────────────────────────────────────

  #[test]
  fn all_dead_relatives_means_public() {
    let mut db = chain();
    let settings = Settings::default();
    assert!(!db.is_private(1, &settings));
  }

  #[test]
  fn no_death_record_means_private() {
    let mut db = chain();
    remove_death(&mut db, 1);
    let settings = Settings::default();
    assert!(db.is_private(1, &settings));
  }

  #[test]
  fn explicit_flag_overrides_death_record() {
    let mut db = chain();
    db.get_mut(1).unwrap().private = true;
    let settings = Settings::default();
    assert!(db.is_private(1, &settings));
  }

  #[test]
  fn presume_living_policy_can_be_disabled() {
    let mut db = chain();
    remove_death(&mut db, 1);
    let settings = Settings {
      presume_living_private: false,
      ..Settings::default()
    };
    assert!(!db.is_private(1, &settings));
  }

  // ── Hop cap ─────────────────────────────────────────────────────────────

  #[test]
  fn living_relative_within_two_hops_propagates() {
    // Person 3 is subject 1's grandchild: two hops (child, then child's
    // child).
    let mut db = chain();
    remove_death(&mut db, 3);
    let settings = Settings::default();
    assert!(db.is_private(1, &settings));
  }

  #[test]
  fn living_relative_at_three_hops_does_not_propagate() {
    // Person 4 is three hops from subject 1 — beyond the documented
    // approximation boundary.
    let mut db = chain();
    remove_death(&mut db, 4);
    let settings = Settings::default();
    assert!(!db.is_private(1, &settings));
    // But person 4's own parent is affected.
    assert!(db.is_private(3, &settings));
  }

  // ── Memoisation ─────────────────────────────────────────────────────────

  #[test]
  fn cache_is_used_until_cleared() {
    let mut db = chain();
    let settings = Settings::default();
    assert!(!db.is_private(1, &settings));

    remove_death(&mut db, 1);
    // Stale without an invalidation.
    assert!(!db.is_private(1, &settings));

    db.clear_privacy_cache();
    assert!(db.is_private(1, &settings));
  }
}
