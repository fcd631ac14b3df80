//! Directory loader — build a database from a tree of card files.
//!
//! The only fatal condition is the root directory being unreadable.
//! Everything below that — unreadable files, malformed cards, duplicate
//! ids — degrades to partial data plus diagnostics.

use std::path::{Path, PathBuf};

use stemma_core::{Database, Diagnostic, Diagnostics, ReloadOutcome};

use crate::{
  error::{Error, Result},
  parse::parse_file,
};

fn collect_cards(
  dir: &Path,
  files: &mut Vec<PathBuf>,
  diags: &mut Diagnostics,
) -> std::io::Result<()> {
  for entry in std::fs::read_dir(dir)? {
    let entry = match entry {
      Ok(e) => e,
      Err(e) => {
        diags.error(dir.display().to_string(), None, e.to_string());
        continue;
      }
    };
    let path = entry.path();
    if path.is_dir() {
      // A subdirectory we cannot read costs us its cards, not the load.
      if let Err(e) = collect_cards(&path, files, diags) {
        diags.error(path.display().to_string(), None, e.to_string());
      }
    } else if path.extension().and_then(|e| e.to_str()) == Some("card") {
      files.push(path);
    }
  }
  Ok(())
}

/// Scan `dir` recursively for `*.card` files and build a fresh database.
/// The previous database, if any, is simply dropped by the caller — a
/// reload is always wholesale.
pub fn load_dir(dir: &Path) -> Result<(Database, Vec<Diagnostic>)> {
  let mut diags = Diagnostics::new();
  let mut files = Vec::new();
  collect_cards(dir, &mut files, &mut diags).map_err(|source| Error::UnreadableRoot {
    path: dir.to_path_buf(),
    source,
  })?;
  files.sort();

  let mut db = Database::new();
  for path in &files {
    match parse_file(path) {
      Err(e) => diags.error(path.display().to_string(), None, e.to_string()),
      Ok(card) => {
        for d in card.diagnostics {
          diags.push(d);
        }
        if let Err(e) = db.add_person(card.person) {
          diags.error(path.display().to_string(), None, e.to_string());
        }
      }
    }
  }
  tracing::info!(
    persons = db.len(),
    files = files.len(),
    problems = diags.len(),
    "database loaded"
  );
  Ok((db, diags.into_vec()))
}

/// Re-parse a single card file and take it over into the database.
pub fn reload_file(
  db: &mut Database,
  path: &Path,
) -> Result<(ReloadOutcome, Vec<Diagnostic>)> {
  let card = parse_file(path)?;
  let mut all = card.diagnostics;
  let mut diags = Diagnostics::new();
  let outcome = db.reload_one(card.person, &mut diags);
  all.extend(diags.into_vec());
  Ok((outcome, all))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn write_card(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }

  fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("stemma-card-test-{tag}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn loads_recursively_and_reports_duplicates() {
    let dir = temp_dir("load");
    write_card(&dir, "Doe/JohnDoe-1.card", "Name: John Doe\nUniq: 1\n");
    write_card(&dir, "Roe/MaryRoe-2.card", "Name: Mary Roe\nUniq: 2\n");
    // Same id as John: first writer wins, one error.
    write_card(&dir, "Zoe/SueZoe-dup.card", "Name: Sue Zoe\nUniq: 1\n");

    let (db, diags) = load_dir(&dir).unwrap();
    assert_eq!(db.len(), 2);
    assert_eq!(db.get(1).unwrap().display_name(), "John Doe");
    let errors: Vec<_> = diags
      .iter()
      .filter(|d| d.severity == stemma_core::Severity::Error)
      .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("not unique"));

    std::fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn unreadable_root_is_fatal() {
    let missing = Path::new("/nonexistent/stemma-db");
    assert!(matches!(load_dir(missing), Err(Error::UnreadableRoot { .. })));
  }

  #[test]
  fn reload_file_replaces_in_place() {
    let dir = temp_dir("reload");
    write_card(&dir, "Doe/JohnDoe-1.card", "Name: John Doe\nUniq: 1\n");
    let (mut db, _) = load_dir(&dir).unwrap();

    write_card(&dir, "Doe/JohnDoe-1.card", "Name: Johnny Doe\nUniq: 1\n");
    let (outcome, diags) =
      reload_file(&mut db, &dir.join("Doe/JohnDoe-1.card")).unwrap();
    assert_eq!(outcome, ReloadOutcome::Replaced);
    assert!(diags.is_empty());
    assert_eq!(db.get(1).unwrap().display_name(), "Johnny Doe");

    std::fs::remove_dir_all(&dir).unwrap();
  }
}
