//! The interactive line-mode shell.
//!
//! Commands may be abbreviated to any unambiguous prefix: `de 12` runs
//! `descendants 12`, while `f` is rejected as ambiguous between `find`
//! and `family`. Errors from a command are printed and the loop
//! continues; only end-of-input or `quit` leaves the shell.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::app::App;

const COMMANDS: &[(&str, &str)] = &[
  ("list", "list all persons"),
  ("unused", "list unused ids"),
  ("find", "find persons matching the given words"),
  ("family", "show a person's immediate family"),
  ("descendants", "print a person's descendant tree"),
  ("ancestors", "print a person's ancestor tree"),
  ("verify", "cross-check all references in the database"),
  ("private", "show a person's computed privacy"),
  ("clear", "clear the privacy cache"),
  ("reload", "reload the whole database, or one card file"),
  ("import", "import a GEDCOM file"),
  ("export", "export the database to a GEDCOM file"),
  ("new", "create a new person"),
  ("help", "show this list"),
  ("quit", "leave the shell"),
];

/// Resolve a possibly-abbreviated command word.
fn match_command(word: &str) -> Vec<&'static str> {
  COMMANDS
    .iter()
    .map(|(name, _)| *name)
    .filter(|name| name.starts_with(word))
    .collect()
}

pub fn run(app: &mut App) -> Result<()> {
  println!("This is stemma. Type help or ? to list commands.");
  let stdin = std::io::stdin();
  let mut lines = stdin.lock().lines();

  loop {
    print!("(stemma) ");
    std::io::stdout().flush()?;
    let Some(line) = lines.next() else { break };
    let line = line?;
    let line = line.trim();
    if line.is_empty() {
      continue;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
      Some((w, r)) => (w, r.trim()),
      None => (line, ""),
    };
    if word == "?" {
      help();
      continue;
    }

    let matches = match_command(word);
    match matches.as_slice() {
      [] => println!("unknown command \"{word}\"; type help for the list"),
      [name] => {
        if *name == "quit" {
          break;
        }
        if let Err(e) = dispatch(app, name, rest) {
          println!("{e:#}");
        }
      }
      several => {
        println!("ambiguous command \"{word}\"; matches: {}", several.join(" "));
      }
    }
  }
  Ok(())
}

fn help() {
  for (name, text) in COMMANDS {
    println!("{name:<14}{text}");
  }
}

fn dispatch(app: &mut App, name: &str, rest: &str) -> Result<()> {
  match name {
    "list" => app.list(),
    "unused" => app.unused(),
    "find" => app.find(rest),
    "family" => app.family(rest)?,
    "descendants" => app.descendants(rest)?,
    "ancestors" => app.ancestors(rest)?,
    "verify" => app.verify(),
    "private" => app.private(rest)?,
    "clear" => app.clear_cache(),
    "reload" => {
      if rest.is_empty() {
        app.reload()?;
      } else {
        app.reload_file(std::path::Path::new(rest))?;
      }
    }
    "import" => app.import_gedcom(std::path::Path::new(rest))?,
    "export" => app.export_gedcom(std::path::Path::new(rest))?,
    "new" => app.new_person(rest)?,
    "help" => help(),
    _ => unreachable!("command table covers all names"),
  }
  Ok(())
}
