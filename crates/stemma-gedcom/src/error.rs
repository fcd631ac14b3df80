//! Error types for the GEDCOM codec.
//!
//! As with the card codec, malformed content is reported through
//! diagnostics; errors are I/O only.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("cannot read {path}: {source}")]
  Read {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("cannot write {path}: {source}")]
  Write {
    path:   PathBuf,
    source: std::io::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
