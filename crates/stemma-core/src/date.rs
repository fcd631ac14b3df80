//! The textual date grammar and its formatting.
//!
//! Dates are stored exactly as written: `YYYY[-MM[-DD]]` optionally followed
//! by a qualifier (`~` about, `<` before, `>` after), the literal `?` for an
//! unknown date, or `YYYY-Qn` for a registration quarter. Ordering is always
//! plain string comparison on the raw form; since `?` sorts after every
//! digit, events with unknown dates come last without special casing.
//!
//! Formatting is a pure function of the raw string and the requested
//! [`DateFormat`] — in particular `Raw` is the identity, so normalising and
//! reformatting is idempotent.

use crate::settings::DateFormat;

const MONTH_NAMES: [&str; 12] = [
  "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT",
  "NOV", "DEC",
];

/// Middle month of each registration quarter, index 1..=4.
const QUARTER_MONTHS: [&str; 5] = ["?", "02", "05", "08", "11"];

/// Split a trailing qualifier off a raw date.
fn split_qualifier(date: &str) -> (&str, Option<char>) {
  match date.chars().last() {
    Some(q @ ('~' | '<' | '>')) => (&date[..date.len() - 1], Some(q)),
    _ => (date, None),
  }
}

fn month_name(mm: &str) -> Option<&'static str> {
  let n: usize = mm.parse().ok()?;
  MONTH_NAMES.get(n.wrapping_sub(1)).copied()
}

/// Quarter digit for a `Qn` month field, if it is one.
fn quarter(mm: &str) -> Option<usize> {
  let mut chars = mm.chars();
  if !matches!(chars.next(), Some('Q' | 'q')) {
    return None;
  }
  match chars.next().and_then(|c| c.to_digit(10)) {
    Some(n @ 1..=4) if chars.next().is_none() => Some(n as usize),
    _ => None,
  }
}

/// Render `date` in the requested format.
///
/// A missing date renders as `default`, or `?` if no default is given.
pub fn format_date(date: Option<&str>, default: Option<&str>, format: DateFormat) -> String {
  let Some(date) = date else {
    return default.unwrap_or("?").to_string();
  };
  match format {
    DateFormat::Raw => date.to_string(),
    DateFormat::YearOnly | DateFormat::Cooked => format_cooked(date, format),
    DateFormat::Gedcom => format_gedcom(date),
  }
}

fn format_cooked(date: &str, format: DateFormat) -> String {
  let (bare, qual) = split_qualifier(date);
  let prefix = match qual {
    Some('~') => "abt.",
    Some('<') => "bef.",
    Some('>') => "aft.",
    _ => "",
  };

  let parts: Vec<&str> = bare.split('-').collect();
  if parts.len() <= 1 {
    // Only the year (or `?`) is available; the qualifier applies to it.
    return format!("{prefix}{bare}");
  }
  if format == DateFormat::YearOnly {
    // More than the year is recorded but only the year is wanted. The year
    // itself is taken as certain, so the qualifier is dropped.
    return parts[0].to_string();
  }
  if let Some(q) = quarter(parts[1]) {
    // A registration quarter is only approximate; render as "about" the
    // middle month of the quarter.
    return format!("abt.{}-{}", parts[0], QUARTER_MONTHS[q]);
  }
  format!("{prefix}{bare}")
}

fn format_gedcom(date: &str) -> String {
  if date == "?" {
    return String::new();
  }
  let (bare, qual) = split_qualifier(date);
  let prefix = match qual {
    Some('~') => "ABT ",
    Some('<') => "BEF ",
    Some('>') => "AFT ",
    _ => "",
  };

  let parts: Vec<&str> = bare.split('-').collect();
  let year = parts[0];
  if parts.len() == 1 {
    return format!("{prefix}{year}");
  }
  if let Some(q) = quarter(parts[1]) {
    let month = month_name(QUARTER_MONTHS[q]).unwrap_or("???");
    return format!("ABT {month} {year}");
  }
  let Some(month) = month_name(parts[1]) else {
    // Month field outside the grammar; fall back to the raw form.
    return format!("{prefix}{bare}");
  };
  if parts.len() == 2 {
    return format!("{prefix}{month} {year}");
  }
  let day = parts[2].trim_start_matches('0');
  format!("{prefix}{day} {month} {year}")
}

#[cfg(test)]
mod tests {
  use super::*;

  // ── Raw is the identity ─────────────────────────────────────────────────

  #[test]
  fn raw_format_is_idempotent() {
    for d in ["1950-03-15", "1950-03-15~", "1950<", "1881-Q2", "?"] {
      let once = format_date(Some(d), None, DateFormat::Raw);
      let twice = format_date(Some(&once), None, DateFormat::Raw);
      assert_eq!(once, d);
      assert_eq!(twice, d);
    }
  }

  #[test]
  fn missing_date_uses_default() {
    assert_eq!(format_date(None, None, DateFormat::Cooked), "?");
    assert_eq!(format_date(None, Some("n/a"), DateFormat::Raw), "n/a");
  }

  // ── Cooked ──────────────────────────────────────────────────────────────

  #[test]
  fn cooked_renders_qualifier_as_prefix() {
    assert_eq!(format_date(Some("1950-03-15<"), None, DateFormat::Cooked), "bef.1950-03-15");
    assert_eq!(format_date(Some("1950~"), None, DateFormat::Cooked), "abt.1950");
    assert_eq!(format_date(Some("1950-03>"), None, DateFormat::Cooked), "aft.1950-03");
    assert_eq!(format_date(Some("1950-03-15"), None, DateFormat::Cooked), "1950-03-15");
  }

  #[test]
  fn cooked_quarter_becomes_about_middle_month() {
    assert_eq!(format_date(Some("1881-Q2"), None, DateFormat::Cooked), "abt.1881-05");
    assert_eq!(format_date(Some("1881-Q4"), None, DateFormat::Cooked), "abt.1881-11");
  }

  #[test]
  fn cooked_unknown_passes_through() {
    assert_eq!(format_date(Some("?"), None, DateFormat::Cooked), "?");
  }

  // ── Year only ───────────────────────────────────────────────────────────

  #[test]
  fn year_only_drops_month_and_qualifier() {
    assert_eq!(format_date(Some("1950-03-15<"), None, DateFormat::YearOnly), "1950");
    // A bare year keeps its qualifier; the uncertainty applies to the year.
    assert_eq!(format_date(Some("1950~"), None, DateFormat::YearOnly), "abt.1950");
  }

  // ── GEDCOM ──────────────────────────────────────────────────────────────

  #[test]
  fn gedcom_full_date() {
    assert_eq!(format_date(Some("1900-03-15"), None, DateFormat::Gedcom), "15 MAR 1900");
    assert_eq!(format_date(Some("1900-03-05"), None, DateFormat::Gedcom), "5 MAR 1900");
  }

  #[test]
  fn gedcom_qualifiers() {
    assert_eq!(format_date(Some("1900-03-15~"), None, DateFormat::Gedcom), "ABT 15 MAR 1900");
    assert_eq!(format_date(Some("1900<"), None, DateFormat::Gedcom), "BEF 1900");
    assert_eq!(format_date(Some("1900-12>"), None, DateFormat::Gedcom), "AFT DEC 1900");
  }

  #[test]
  fn gedcom_unknown_is_empty() {
    assert_eq!(format_date(Some("?"), None, DateFormat::Gedcom), "");
  }

  #[test]
  fn gedcom_quarter() {
    assert_eq!(format_date(Some("1881-Q2"), None, DateFormat::Gedcom), "ABT MAY 1881");
  }

  // ── Ordering property ───────────────────────────────────────────────────

  #[test]
  fn unknown_date_sorts_after_digits() {
    assert!("?" > "1999-12-31");
    assert!("1900" < "1900-01");
  }
}
