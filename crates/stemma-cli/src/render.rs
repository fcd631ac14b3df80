//! Plain-text rendering of the core view structures.
//!
//! This is the console fallback; HTML and the fancier text reports are
//! produced by the external template renderer from the same views.

use stemma_core::{
  tree::{AncestorNode, AncestorTree, DescendantNode},
  view::PersonCard,
};

fn indent(level: usize) -> String {
  "    ".repeat(level.saturating_sub(1))
}

// ─── Descendants ─────────────────────────────────────────────────────────────

pub fn descendants_text(nodes: &[DescendantNode]) -> String {
  let mut out = String::new();
  for node in nodes {
    render_descendant(node, &mut out);
  }
  out
}

fn render_descendant(node: &DescendantNode, out: &mut String) {
  out.push_str(&indent(node.level));
  out.push_str(&node.left.vital);
  if let Some(right) = &node.right {
    out.push_str(" === ");
    out.push_str(&right.vital);
  }
  out.push('\n');
  if node.truncated {
    out.push_str(&indent(node.level + 1));
    out.push_str("...\n");
    return;
  }
  for child in &node.children {
    render_descendant(child, out);
  }
}

// ─── Ancestors ───────────────────────────────────────────────────────────────

pub fn ancestors_text(tree: &AncestorTree) -> String {
  let mut out = String::new();
  render_ancestor(&tree.root, &mut out);
  out.push_str(&format!("(depth {})\n", tree.max_depth));
  out
}

fn render_ancestor(node: &AncestorNode, out: &mut String) {
  out.push_str(&indent(node.level));
  out.push_str(&node.subject.vital);
  out.push('\n');
  if let Some(parents) = &node.parents {
    for parent in parents.iter() {
      render_ancestor(parent, out);
    }
  }
}

// ─── Family ──────────────────────────────────────────────────────────────────

pub fn family_text(card: &PersonCard) -> String {
  let mut out = String::new();
  out.push_str(&card.subject.vital);
  out.push('\n');

  out.push_str("  Father:   ");
  out.push_str(card.father.as_ref().map(|p| p.vital.as_str()).unwrap_or("not known"));
  out.push('\n');
  out.push_str("  Mother:   ");
  out.push_str(card.mother.as_ref().map(|p| p.vital.as_str()).unwrap_or("not known"));
  out.push('\n');

  if !card.siblings.is_empty() {
    out.push_str("  Siblings:\n");
    for s in &card.siblings {
      out.push_str("    ");
      out.push_str(&s.vital);
      if s.id == card.subject.id {
        out.push_str("  *");
      }
      out.push('\n');
    }
  }
  if !card.partnerships.is_empty() {
    out.push_str("  Partnerships:\n");
    for p in &card.partnerships {
      out.push_str("    ");
      out.push_str(&p.date);
      out.push_str("  ");
      out.push_str(p.partner.as_ref().map(|r| r.vital.as_str()).unwrap_or("not known"));
      if p.assumed {
        out.push_str("  (assumed)");
      }
      out.push('\n');
    }
  }
  if !card.children.is_empty() {
    out.push_str("  Children:\n");
    for c in &card.children {
      out.push_str("    ");
      out.push_str(&c.vital);
      out.push('\n');
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use stemma_core::view::PersonRef;

  fn person_ref(id: usize, vital: &str) -> PersonRef {
    PersonRef {
      id:      Some(id),
      name:    vital.to_string(),
      vital:   vital.to_string(),
      private: false,
    }
  }

  #[test]
  fn descendants_indent_by_level() {
    let tree = vec![DescendantNode {
      level:     1,
      left:      person_ref(1, "[1] A"),
      right:     Some(person_ref(2, "[2] B")),
      truncated: false,
      children:  vec![DescendantNode {
        level:     2,
        left:      person_ref(3, "[3] C"),
        right:     None,
        truncated: false,
        children:  vec![],
      }],
    }];
    let text = descendants_text(&tree);
    assert_eq!(text, "[1] A === [2] B\n    [3] C\n");
  }

  #[test]
  fn truncated_branch_shows_ellipsis() {
    let tree = vec![DescendantNode {
      level:     1,
      left:      person_ref(1, "[1] A"),
      right:     None,
      truncated: true,
      children:  vec![],
    }];
    assert!(descendants_text(&tree).contains("..."));
  }
}
