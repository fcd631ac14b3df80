//! Card-file codec for the Stemma family database.
//!
//! A card is one person's flat-text record: free-form tagged header lines,
//! a timeline of event blocks, and an opaque footer introduced by a
//! literal `EOF` line. Pure synchronous; no database or CLI dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let text = "Name: Jane Doe\nUniq: 42\n1900 Birth\n";
//! let card = stemma_card::parse_str(text, "jane.card");
//! println!("[{:?}] {} problems", card.person.id, card.diagnostics.len());
//! ```

pub mod error;
pub mod event;
pub mod line;
mod loader;
mod parse;
mod serialize;

pub use error::{Error, Result};
pub use event::parse_event;
pub use loader::{load_dir, reload_file};
pub use parse::{ParsedCard, parse_file, parse_str};
pub use serialize::{card_text, new_card};
