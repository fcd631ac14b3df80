//! Core types and the relationship engine for the Stemma family database.
//!
//! This crate is deliberately free of I/O and CLI dependencies. The card
//! and GEDCOM codecs populate a [`Database`] of [`Person`] records; the
//! engine answers derived queries over them (siblings, partners, trees,
//! privacy, integrity) and exposes plain view structures for rendering.

pub mod database;
pub mod date;
pub mod diag;
pub mod error;
pub mod event;
pub mod person;
pub mod privacy;
pub mod relation;
pub mod settings;
pub mod tree;
pub mod verify;
pub mod view;

pub use database::{Database, ReloadOutcome};
pub use diag::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, Result};
pub use event::{Attribute, Event, EventKind, FileAttachment, SourceRef};
pub use person::{NameAndId, ParentRef, Person, PersonSource, Sex, normalise_name, parse_name_and_id};
pub use relation::Partner;
pub use settings::{DateFormat, Settings};
