//! Error types for `stemma-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: [{0}]")]
  PersonNotFound(usize),

  #[error("id [{id}] is not unique; record from {rejected} rejected")]
  DuplicateId { id: usize, rejected: String },

  #[error("record from {0} has no usable id")]
  MissingId(String),

  #[error("database directory unreadable: {0}")]
  Unreadable(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
