//! Structured diagnostics for the warn-and-continue policy.
//!
//! A malformed record must never make the rest of the archive unusable, so
//! the parsers and the integrity checker report problems as [`Diagnostic`]
//! values instead of failing. Callers collect them in a [`Diagnostics`] sink,
//! which also mirrors every entry onto the `tracing` subscriber as it
//! arrives.

use std::fmt;

use serde::Serialize;

/// How bad a reported problem is.
///
/// `Warning` means the offending data was kept (possibly with a field
/// defaulted); `Error` means the offending record or line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Warning,
  Error,
}

/// A single reported problem, with enough context to find the input line.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
  pub severity: Severity,
  /// File path or import-source name the problem was found in.
  pub origin:   String,
  /// 1-based line number, when one can be attributed.
  pub line:     Option<usize>,
  pub message:  String,
}

impl Diagnostic {
  pub fn warning(origin: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
    Self {
      severity: Severity::Warning,
      origin:   origin.into(),
      line,
      message:  message.into(),
    }
  }

  pub fn error(origin: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
    Self {
      severity: Severity::Error,
      origin:   origin.into(),
      line,
      message:  message.into(),
    }
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sev = match self.severity {
      Severity::Warning => "warning",
      Severity::Error => "error",
    };
    match self.line {
      Some(n) => write!(f, "{sev}: {}:{n}: {}", self.origin, self.message),
      None => write!(f, "{sev}: {}: {}", self.origin, self.message),
    }
  }
}

/// An append-only collection of diagnostics.
///
/// Entries are logged through `tracing` when pushed, so interactive use sees
/// problems immediately while batch callers can still inspect the full list
/// afterwards.
#[derive(Debug, Default)]
pub struct Diagnostics {
  entries: Vec<Diagnostic>,
}

impl Diagnostics {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, diag: Diagnostic) {
    match diag.severity {
      Severity::Warning => tracing::warn!(origin = %diag.origin, "{}", diag.message),
      Severity::Error => tracing::error!(origin = %diag.origin, "{}", diag.message),
    }
    self.entries.push(diag);
  }

  pub fn warn(&mut self, origin: impl Into<String>, line: Option<usize>, message: impl Into<String>) {
    self.push(Diagnostic::warning(origin, line, message));
  }

  pub fn error(&mut self, origin: impl Into<String>, line: Option<usize>, message: impl Into<String>) {
    self.push(Diagnostic::error(origin, line, message));
  }

  pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
    for d in other {
      self.push(d);
    }
  }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { self.entries.iter() }

  /// Consume the sink and return the collected entries.
  pub fn into_vec(self) -> Vec<Diagnostic> { self.entries }
}

impl IntoIterator for Diagnostics {
  type Item = Diagnostic;
  type IntoIter = std::vec::IntoIter<Diagnostic>;

  fn into_iter(self) -> Self::IntoIter { self.entries.into_iter() }
}
