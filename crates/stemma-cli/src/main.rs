//! `stemma` — command-line front end for the Stemma family database.
//!
//! # Usage
//!
//! ```text
//! stemma --db ~/family                  # interactive shell
//! stemma --db ~/family list             # one-shot command
//! stemma import-gedcom dobbs.ged --assume-dead
//! stemma --config ~/.config/stemma.toml descendants 12
//! ```

mod app;
mod render;
mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use stemma_core::Settings;
use stemma_gedcom::ImportOptions;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "stemma", about = "Personal genealogical record store")]
struct Args {
  /// Path to a TOML configuration file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Database directory (overrides the config file).
  #[arg(long, value_name = "DIR")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List all persons.
  List,
  /// List unused ids.
  Unused,
  /// Find persons matching the given words.
  Find { terms: Vec<String> },
  /// Show a person's immediate family.
  Family { person: String },
  /// Print a person's descendant tree.
  Descendants { person: String },
  /// Print a person's ancestor tree.
  Ancestors { person: String },
  /// Cross-check all references in the database.
  Verify,
  /// Show a person's computed privacy.
  Private { person: String },
  /// Import a GEDCOM file.
  ImportGedcom {
    file: PathBuf,
    /// Synthesize a Death for individuals without one.
    #[arg(long)]
    assume_dead: bool,
    /// Synthesize a Marriage for families without one.
    #[arg(long)]
    assume_partnership: bool,
  },
  /// Export the database to a GEDCOM file.
  ExportGedcom { file: PathBuf },
  /// Create a new person.
  New { name: Vec<String> },
}

// ─── Config file ─────────────────────────────────────────────────────────────

/// Shape of the TOML config file; everything has a default so the file is
/// optional.
///
/// ```toml
/// db_dir = "/home/me/family"
/// branch = "paternal"
///
/// [settings]
/// date_format = "cooked"
/// max_tree_depth = 12
/// privacy_depth = 2
/// presume_living_private = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppConfig {
  db_dir:   Option<PathBuf>,
  branch:   Option<String>,
  settings: Settings,
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
  let mut builder = config::Config::builder();
  if let Some(path) = path {
    builder = builder.add_source(config::File::from(path.clone()).required(true));
  }
  builder = builder.add_source(config::Environment::with_prefix("STEMMA"));
  let settings = builder.build().context("failed to read configuration")?;
  settings
    .try_deserialize()
    .context("failed to deserialise configuration")
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let cfg = load_config(args.config.as_ref())?;

  // CLI flags override the config file.
  let db_dir = args.db.or(cfg.db_dir);

  let mut import_options = ImportOptions::default();
  if let Some(Command::ImportGedcom {
    assume_dead,
    assume_partnership,
    ..
  }) = &args.command
  {
    import_options.assume_dead = *assume_dead;
    import_options.assume_partnership = *assume_partnership;
  }

  let mut app = App::new(cfg.settings, db_dir, cfg.branch, import_options);
  if app.db_dir.is_some() {
    app.reload()?;
  }

  match args.command {
    None => shell::run(&mut app),
    Some(Command::List) => {
      app.list();
      Ok(())
    }
    Some(Command::Unused) => {
      app.unused();
      Ok(())
    }
    Some(Command::Find { terms }) => {
      app.find(&terms.join(" "));
      Ok(())
    }
    Some(Command::Family { person }) => app.family(&person),
    Some(Command::Descendants { person }) => app.descendants(&person),
    Some(Command::Ancestors { person }) => app.ancestors(&person),
    Some(Command::Verify) => {
      app.verify();
      Ok(())
    }
    Some(Command::Private { person }) => app.private(&person),
    Some(Command::ImportGedcom { file, .. }) => app.import_gedcom(&file),
    Some(Command::ExportGedcom { file }) => app.export_gedcom(&file),
    Some(Command::New { name }) => app.new_person(&name.join(" ")),
  }
}
