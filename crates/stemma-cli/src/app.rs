//! Command implementations over a loaded database.
//!
//! The shell and the one-shot subcommands both dispatch here; this layer
//! stays thin — parse the argument, call the engine, print the view.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use stemma_core::{Database, Diagnostic, Settings};
use stemma_gedcom::ImportOptions;

use crate::render;

pub struct App {
  pub db:             Database,
  pub settings:       Settings,
  pub db_dir:         Option<PathBuf>,
  pub branch:         Option<String>,
  pub import_options: ImportOptions,
}

impl App {
  pub fn new(
    settings: Settings,
    db_dir: Option<PathBuf>,
    branch: Option<String>,
    import_options: ImportOptions,
  ) -> Self {
    Self {
      db: Database::new(),
      settings,
      db_dir,
      branch,
      import_options,
    }
  }

  fn print_diagnostics(diags: &[Diagnostic]) {
    for d in diags {
      println!("{d}");
    }
  }

  // ── Loading ─────────────────────────────────────────────────────────────

  /// Wholesale (re)load: the previous contents are discarded.
  pub fn reload(&mut self) -> Result<()> {
    let Some(dir) = self.db_dir.clone() else {
      bail!("no database directory configured");
    };
    let (db, diags) = stemma_card::load_dir(&dir)
      .with_context(|| format!("loading database from {}", dir.display()))?;
    Self::print_diagnostics(&diags);
    println!("{} persons loaded", db.len());
    self.db = db;
    Ok(())
  }

  /// Reload a single card file in place.
  pub fn reload_file(&mut self, path: &Path) -> Result<()> {
    let (outcome, diags) = stemma_card::reload_file(&mut self.db, path)
      .with_context(|| format!("reloading {}", path.display()))?;
    Self::print_diagnostics(&diags);
    println!("{outcome:?}");
    self.db.clear_privacy_cache();
    Ok(())
  }

  // ── Argument resolution ─────────────────────────────────────────────────

  /// A person argument is an id, or name words matching exactly one
  /// person.
  pub fn resolve(&self, arg: &str) -> Result<usize> {
    let arg = arg.trim();
    if arg.is_empty() {
      bail!("expected a person id or name");
    }
    if let Ok(id) = arg.parse::<usize>() {
      if self.db.get(id).is_none() {
        bail!("no person with id [{id}]");
      }
      return Ok(id);
    }
    let matches = self.db.matching(arg);
    match matches.len() {
      0 => bail!("no person matches \"{arg}\""),
      1 => matches[0].id.context("matched person has no id"),
      n => {
        for p in &matches {
          println!("{}", p.vital_line(&self.settings));
        }
        bail!("\"{arg}\" is ambiguous ({n} matches)");
      }
    }
  }

  // ── Queries ─────────────────────────────────────────────────────────────

  pub fn list(&self) {
    for p in self.db.iter() {
      println!("{}", p.vital_line(&self.settings));
    }
  }

  pub fn unused(&self) {
    let unused = self.db.unused_ids();
    if unused.is_empty() {
      println!("no unused ids");
      return;
    }
    let text: Vec<String> = unused.iter().map(|id| id.to_string()).collect();
    println!("{}", text.join(" "));
  }

  pub fn find(&self, terms: &str) {
    for p in self.db.matching(terms) {
      println!("{}", p.vital_line(&self.settings));
    }
  }

  pub fn family(&self, arg: &str) -> Result<()> {
    let id = self.resolve(arg)?;
    let card = self
      .db
      .person_card(id, &self.settings)
      .context("person disappeared mid-query")?;
    print!("{}", render::family_text(&card));
    Ok(())
  }

  pub fn descendants(&mut self, arg: &str) -> Result<()> {
    let id = self.resolve(arg)?;
    self.db.compute_all_privacy(&self.settings);
    let nodes = self
      .db
      .descendant_tree(id, &self.settings)
      .context("person disappeared mid-query")?;
    print!("{}", render::descendants_text(&nodes));
    Ok(())
  }

  pub fn ancestors(&mut self, arg: &str) -> Result<()> {
    let id = self.resolve(arg)?;
    self.db.compute_all_privacy(&self.settings);
    let tree = self
      .db
      .ancestor_tree(id, &self.settings)
      .context("person disappeared mid-query")?;
    print!("{}", render::ancestors_text(&tree));
    Ok(())
  }

  pub fn verify(&self) {
    let diags = self.db.verify();
    if diags.is_empty() {
      println!("database is consistent");
    } else {
      Self::print_diagnostics(&diags);
      println!("{} problems", diags.len());
    }
  }

  pub fn private(&mut self, arg: &str) -> Result<()> {
    let id = self.resolve(arg)?;
    let private = self.db.is_private(id, &self.settings);
    println!("[{id}] is {}", if private { "private" } else { "public" });
    Ok(())
  }

  pub fn clear_cache(&mut self) {
    self.db.clear_privacy_cache();
    println!("privacy cache cleared");
  }

  // ── GEDCOM ──────────────────────────────────────────────────────────────

  pub fn import_gedcom(&mut self, path: &Path) -> Result<()> {
    let report = stemma_gedcom::import_file(path, &mut self.db, &self.import_options)
      .with_context(|| format!("importing {}", path.display()))?;
    Self::print_diagnostics(&report.diagnostics);
    println!("{} persons imported", report.persons_added);
    self.db.clear_privacy_cache();
    Ok(())
  }

  pub fn export_gedcom(&self, path: &Path) -> Result<()> {
    stemma_gedcom::export_file(path, &self.db)
      .with_context(|| format!("exporting to {}", path.display()))?;
    println!("{} persons exported", self.db.len());
    Ok(())
  }

  // ── New person ──────────────────────────────────────────────────────────

  /// Create a card file for a new person with the next free id above the
  /// maximum, and load it.
  pub fn new_person(&mut self, name: &str) -> Result<()> {
    let name = stemma_core::normalise_name(name);
    if name.is_empty() {
      bail!("expected a name");
    }
    let Some(dir) = self.db_dir.clone() else {
      bail!("no database directory configured");
    };
    let id = self.db.max_id().map(|m| m + 1).unwrap_or(1);
    let path = self.card_path(&dir, &name, id);
    if path.exists() {
      bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&path, stemma_card::new_card(&name, id, None, None))
      .with_context(|| format!("writing {}", path.display()))?;
    println!("created {}", path.display());
    self.reload_file(&path)
  }

  /// `<db>/[branch/]<Surname>/<JoinedName>-<id>.card`
  fn card_path(&self, dir: &Path, name: &str, id: usize) -> PathBuf {
    let mut path = dir.to_path_buf();
    if let Some(branch) = &self.branch {
      path.push(branch);
    }
    let words: Vec<&str> = name.split_whitespace().collect();
    let surname = words.last().copied().unwrap_or("Unknown");
    path.push(surname);
    path.push(format!("{}-{id}.card", words.concat()));
    path
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use stemma_core::{Person, PersonSource};

  fn app_with_person(id: usize, name: &str) -> App {
    let mut app = App::new(Settings::default(), None, None, ImportOptions::default());
    let mut p = Person::new(PersonSource::New);
    p.id = Some(id);
    p.name = Some(name.to_string());
    app.db.add_person(p).unwrap();
    app
  }

  #[test]
  fn resolve_by_id_and_name() {
    let app = app_with_person(3, "Jane Doe");
    assert_eq!(app.resolve("3").unwrap(), 3);
    assert_eq!(app.resolve("jane").unwrap(), 3);
    assert!(app.resolve("17").is_err());
    assert!(app.resolve("nobody").is_err());
  }

  #[test]
  fn card_path_layout() {
    let mut app = app_with_person(1, "X");
    app.branch = Some("maternal".to_string());
    let path = app.card_path(Path::new("/db"), "Jane Ann Doe", 7);
    assert_eq!(path, PathBuf::from("/db/maternal/Doe/JaneAnnDoe-7.card"));
  }
}
