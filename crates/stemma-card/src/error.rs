//! Error types for the stemma-card codec.
//!
//! Malformed content never raises an error — the parser reports
//! diagnostics and continues. Errors are reserved for I/O.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot read {path}: {source}")]
  Read {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("database directory unreadable: {path}: {source}")]
  UnreadableRoot {
    path:   PathBuf,
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
