//! Runtime settings, threaded explicitly into parsing, formatting and
//! queries.
//!
//! There is deliberately no global configuration object: every function that
//! depends on a policy takes a `&Settings`, so the parsers and queries stay
//! pure and independently testable.

use serde::{Deserialize, Serialize};

/// Output format for the textual date grammar (see [`crate::date`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
  /// The stored string, unchanged. Formatting is idempotent.
  #[default]
  Raw,
  /// Year only; qualifiers are dropped.
  YearOnly,
  /// Qualifier rendered as an `abt.`/`bef.`/`aft.` prefix; quarter dates
  /// become `abt.` plus the middle month of the quarter.
  Cooked,
  /// GEDCOM `DD MMM YYYY` form with `ABT`/`BEF`/`AFT` prefixes; unknown
  /// dates render as the empty string.
  Gedcom,
}

/// Tunable policy for queries and report building.
///
/// The privacy defaults reproduce the original behavior (presumed-living
/// persons are private, relatives up to 2 hops away are shielded), but both
/// are policy, not invariants, and can be changed per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub date_format: DateFormat,
  /// Maximum recursion depth for descendant and ancestor trees.
  pub max_tree_depth: usize,
  /// How many relationship hops the privacy check walks. This is an
  /// intentional approximation, not a full closure.
  pub privacy_depth: usize,
  /// Treat a person with no recorded death as living, and therefore
  /// private.
  pub presume_living_private: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      date_format:            DateFormat::Raw,
      max_tree_depth:         99,
      privacy_depth:          2,
      presume_living_private: true,
    }
  }
}
