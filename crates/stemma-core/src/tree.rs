//! Descendant and ancestor tree construction.
//!
//! Both trees are built directly as view structures: plain, acyclic and
//! serialisable, ready for the external renderer. Recursion is bounded by
//! `Settings::max_tree_depth`; a cut descendant branch carries an explicit
//! truncation marker so the report can say "more below".

use std::collections::HashSet;

use serde::Serialize;

use crate::{
  database::Database,
  person::ParentRef,
  settings::Settings,
  view::PersonRef,
};

// ─── Descendants ─────────────────────────────────────────────────────────────

/// One couple (or single parent) line in a descendant tree. A subject with
/// several partnerships produces several nodes at the same level, each
/// carrying only the children of that partnership.
#[derive(Debug, Clone, Serialize)]
pub struct DescendantNode {
  /// 1-based generation level.
  pub level:     usize,
  pub left:      PersonRef,
  /// The partner; `None` for a childless leaf or for children whose other
  /// parent is completely unrecorded.
  pub right:     Option<PersonRef>,
  /// True when the depth limit cut off existing children.
  pub truncated: bool,
  pub children:  Vec<DescendantNode>,
}

// ─── Ancestors ───────────────────────────────────────────────────────────────

/// A node in the pedigree: a database person, a name-only leaf, or a
/// "not known" placeholder. Placeholders and name-only leaves carry no
/// parents array.
#[derive(Debug, Clone, Serialize)]
pub struct AncestorNode {
  /// 1-based generation level; the subject is level 1.
  pub level:   usize,
  pub subject: PersonRef,
  /// `[father, mother]` when the node is a database person.
  pub parents: Option<Box<[AncestorNode; 2]>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AncestorTree {
  pub root:      AncestorNode,
  /// Deepest level present anywhere in the tree, placeholders included.
  /// Report layout sizes its columns from this even though individual
  /// branches stop earlier.
  pub max_depth: usize,
}

// ─── Builders ────────────────────────────────────────────────────────────────

impl Database {
  /// Descendant tree of `id`: one node per partnership, chronologically
  /// ordered, recursing into the children of that partnership only.
  /// `None` when the person is not in the database.
  pub fn descendant_tree(&self, id: usize, settings: &Settings) -> Option<Vec<DescendantNode>> {
    self.get(id)?;
    Some(self.descend(id, 1, settings))
  }

  fn descend(&self, id: usize, level: usize, settings: &Settings) -> Vec<DescendantNode> {
    let Some(subject) = self.get(id) else {
      return Vec::new();
    };
    let left = self.person_ref_of(subject, settings);

    let partners = self.partners(id);
    let all_children = self.children(id, None);
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut nodes = Vec::new();

    for partner in &partners {
      let kids = self.children_of_partnership(id, partner);
      for kid in &kids {
        if let Some(kid_id) = kid.id {
          claimed.insert(kid_id);
        }
      }
      let right = match partner.id.and_then(|pid| self.get(pid)) {
        Some(p) => Some(self.person_ref_of(p, settings)),
        None => partner
          .name
          .as_deref()
          .map(|n| PersonRef::name_only(n, partner.id)),
      };
      let truncated = level >= settings.max_tree_depth && !kids.is_empty();
      let children = if truncated {
        Vec::new()
      } else {
        kids
          .iter()
          .filter_map(|k| k.id)
          .flat_map(|kid_id| self.descend(kid_id, level + 1, settings))
          .collect()
      };
      nodes.push(DescendantNode {
        level,
        left: left.clone(),
        right,
        truncated,
        children,
      });
    }

    // Children whose other parent is completely unrecorded belong to no
    // partnership; they get a partner-less node of their own.
    let leftover: Vec<usize> = all_children
      .iter()
      .filter_map(|c| c.id)
      .filter(|cid| !claimed.contains(cid))
      .collect();
    if !leftover.is_empty() {
      let truncated = level >= settings.max_tree_depth;
      let children = if truncated {
        Vec::new()
      } else {
        leftover
          .iter()
          .flat_map(|&cid| self.descend(cid, level + 1, settings))
          .collect()
      };
      nodes.push(DescendantNode {
        level,
        left: left.clone(),
        right: None,
        truncated,
        children,
      });
    }

    if nodes.is_empty() {
      nodes.push(DescendantNode {
        level,
        left,
        right: None,
        truncated: false,
        children: Vec::new(),
      });
    }
    nodes
  }

  /// Ancestor tree of `id`. Each database person gets a two-slot parents
  /// array; a parent known by name only becomes a leaf, an unrecorded
  /// parent becomes a "not known" placeholder.
  pub fn ancestor_tree(&self, id: usize, settings: &Settings) -> Option<AncestorTree> {
    self.get(id)?;
    let mut max_depth = 0;
    let root = self.ascend_person(id, 1, settings, &mut max_depth);
    Some(AncestorTree {
      root,
      max_depth,
    })
  }

  fn ascend_person(
    &self,
    id: usize,
    level: usize,
    settings: &Settings,
    max_depth: &mut usize,
  ) -> AncestorNode {
    *max_depth = (*max_depth).max(level);
    let Some(p) = self.get(id) else {
      return AncestorNode {
        level,
        subject: PersonRef::not_known(),
        parents: None,
      };
    };
    let subject = self.person_ref_of(p, settings);
    let parents = if level < settings.max_tree_depth {
      Some(Box::new([
        self.ascend_slot(p.father.as_ref(), level + 1, settings, max_depth),
        self.ascend_slot(p.mother.as_ref(), level + 1, settings, max_depth),
      ]))
    } else {
      None
    };
    AncestorNode {
      level,
      subject,
      parents,
    }
  }

  fn ascend_slot(
    &self,
    slot: Option<&ParentRef>,
    level: usize,
    settings: &Settings,
    max_depth: &mut usize,
  ) -> AncestorNode {
    match slot {
      Some(parent) => match parent.id {
        // A dangling id is tolerated: ascend_person falls back to a
        // placeholder if the slot does not resolve.
        Some(pid) if self.get(pid).is_some() => {
          self.ascend_person(pid, level, settings, max_depth)
        }
        _ => {
          *max_depth = (*max_depth).max(level);
          AncestorNode {
            level,
            subject: PersonRef::name_only(&parent.name, parent.id),
            parents: None,
          }
        }
      },
      None => {
        *max_depth = (*max_depth).max(level);
        AncestorNode {
          level,
          subject: PersonRef::not_known(),
          parents: None,
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    event::{Event, EventKind},
    person::{ParentRef, Person, PersonSource},
  };

  fn person(id: usize, name: &str, birth: &str) -> Person {
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    p.push_event(Event::new(birth, EventKind::Birth));
    p
  }

  fn parent(name: &str, id: Option<usize>) -> Option<ParentRef> {
    Some(ParentRef {
      name: name.to_string(),
      id,
    })
  }

  /// Three generations: 1+2 → 3, 3+4 → 5 and 6.
  fn three_generations() -> Database {
    let mut db = Database::new();
    db.add_person(person(1, "Adam Elder", "1850")).unwrap();
    db.add_person(person(2, "Ann Elder", "1852")).unwrap();
    let mut p3 = person(3, "Bert Elder", "1880");
    p3.father = parent("Adam Elder", Some(1));
    p3.mother = parent("Ann Elder", Some(2));
    db.add_person(p3).unwrap();
    db.add_person(person(4, "Beth Young", "1882")).unwrap();
    let mut p5 = person(5, "Carl Elder", "1910");
    p5.father = parent("Bert Elder", Some(3));
    p5.mother = parent("Beth Young", Some(4));
    db.add_person(p5).unwrap();
    let mut p6 = person(6, "Cora Elder", "1912");
    p6.father = parent("Bert Elder", Some(3));
    p6.mother = parent("Beth Young", Some(4));
    db.add_person(p6).unwrap();
    db
  }

  // ── Descendants ─────────────────────────────────────────────────────────

  #[test]
  fn descendant_tree_recurses_per_partnership() {
    let db = three_generations();
    let settings = Settings::default();
    let nodes = db.descendant_tree(1, &settings).unwrap();
    assert_eq!(nodes.len(), 1);
    let root = &nodes[0];
    assert_eq!(root.level, 1);
    assert_eq!(root.right.as_ref().unwrap().id, Some(2));
    // One child couple node (Bert + Beth) with two leaf children.
    assert_eq!(root.children.len(), 1);
    let bert = &root.children[0];
    assert_eq!(bert.level, 2);
    assert_eq!(bert.right.as_ref().unwrap().id, Some(4));
    assert_eq!(bert.children.len(), 2);
    assert!(bert.children.iter().all(|n| n.children.is_empty() && n.right.is_none()));
  }

  #[test]
  fn descendant_tree_truncates_at_depth_limit() {
    let db = three_generations();
    let settings = Settings {
      max_tree_depth: 1,
      ..Settings::default()
    };
    let nodes = db.descendant_tree(1, &settings).unwrap();
    assert!(nodes[0].truncated);
    assert!(nodes[0].children.is_empty());
  }

  #[test]
  fn descendant_tree_missing_person_is_none() {
    let db = three_generations();
    assert!(db.descendant_tree(42, &Settings::default()).is_none());
  }

  // ── Ancestors ───────────────────────────────────────────────────────────

  #[test]
  fn ancestor_tree_resolves_ids_and_placeholders() {
    let db = three_generations();
    let settings = Settings::default();
    let tree = db.ancestor_tree(5, &settings).unwrap();
    assert_eq!(tree.root.subject.id, Some(5));

    let parents = tree.root.parents.as_ref().unwrap();
    assert_eq!(parents[0].subject.id, Some(3));
    assert_eq!(parents[1].subject.id, Some(4));

    // Bert's parents resolve; Beth's are unrecorded placeholders.
    let bert = &parents[0];
    let beth = &parents[1];
    assert!(bert.parents.is_some());
    let beth_parents = beth.parents.as_ref().unwrap();
    assert_eq!(beth_parents[0].subject.name, "not known");
    assert!(beth_parents[0].parents.is_none());
  }

  #[test]
  fn ancestor_tree_tracks_max_depth() {
    let db = three_generations();
    let settings = Settings::default();
    let tree = db.ancestor_tree(5, &settings).unwrap();
    // 5 → parents (2) → Bert's parents / Beth's placeholders (3) →
    // Adam/Ann's placeholders (4).
    assert_eq!(tree.max_depth, 4);
  }

  #[test]
  fn ancestor_tree_name_only_parent_is_leaf() {
    let mut db = three_generations();
    db.get_mut(4).unwrap().father = parent("Old Young", None);
    let tree = db.ancestor_tree(5, &Settings::default()).unwrap();
    let parents = tree.root.parents.as_ref().unwrap();
    let beth = &parents[1];
    let beth_parents = beth.parents.as_ref().unwrap();
    assert_eq!(beth_parents[0].subject.name, "Old Young");
    assert!(beth_parents[0].parents.is_none());
  }
}
