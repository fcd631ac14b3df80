//! Free-order GEDCOM date conversion.
//!
//! Every whitespace-delimited token is classified on its own: a month
//! abbreviation, a qualifier keyword, a 4-digit year or a 1–2-digit day.
//! The pieces are accumulated independently of position, so `15 MAR 1900`
//! and `MAR 15 1900` mean the same thing. The output is the card date
//! grammar: `YYYY[-MM[-DD]]` plus `~`/`<`/`>`, or `?` when no year was
//! found.
//!
//! A `BET x AND y` range becomes an "after x" primary date — keeping
//! chronological sort order — with the upper bound carried separately as a
//! "before" value for the caller to attach as an event attribute.

use stemma_core::Diagnostics;

/// The converted date, plus the upper bound of a `BET … AND …` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomDate {
  pub primary: String,
  pub before:  Option<String>,
}

fn month_number(token: &str) -> Option<&'static str> {
  Some(match token {
    "JAN" => "01",
    "FEB" => "02",
    "MAR" => "03",
    "APR" => "04",
    "MAY" => "05",
    "JUN" => "06",
    "JUL" => "07",
    "AUG" => "08",
    "SEP" => "09",
    "OCT" => "10",
    "NOV" => "11",
    "DEC" => "12",
    _ => return None,
  })
}

/// Assemble `YYYY[-MM[-DD]]<qualifier>`, or `?` when the year is missing.
fn build_date(
  year: Option<&str>,
  month: Option<&str>,
  day: Option<&str>,
  qualifier: &str,
) -> String {
  let Some(year) = year else {
    return "?".to_string();
  };
  let mut date = year.to_string();
  if let Some(month) = month {
    date.push('-');
    date.push_str(month);
    if let Some(day) = day {
      date.push('-');
      date.push_str(day);
    }
  }
  date.push_str(qualifier);
  date
}

/// Convert one GEDCOM `DATE` value.
pub fn convert_date(
  text: &str,
  origin: &str,
  line_no: usize,
  diags: &mut Diagnostics,
) -> GedcomDate {
  let mut qualifier = "";
  let mut year: Option<String> = None;
  let mut month: Option<&'static str> = None;
  let mut day: Option<String> = None;
  let mut range_start: Option<String> = None;

  for raw in text.split_whitespace() {
    let token = raw.to_ascii_uppercase();
    let digits = token.chars().all(|c| c.is_ascii_digit());
    if let Some(m) = month_number(&token) {
      month = Some(m);
    } else if token == "ABT" || token == "CAL" || token == "EST" {
      qualifier = "~";
    } else if token == "BEF" {
      qualifier = "<";
    } else if token == "AFT" {
      qualifier = ">";
    } else if token == "BET" {
      // Only marks that a range follows; the first side is captured when
      // AND arrives.
    } else if token == "AND" {
      range_start = Some(build_date(year.as_deref(), month, day.as_deref(), ">"));
      year = None;
      month = None;
      day = None;
      qualifier = "";
    } else if token.len() == 4 && digits {
      year = Some(token);
    } else if token.len() == 1 && digits {
      day = Some(format!("0{token}"));
    } else if token.len() == 2 && digits {
      day = Some(token);
    } else {
      diags.warn(
        origin,
        Some(line_no),
        format!("in date \"{text}\": token \"{raw}\" not understood"),
      );
    }
  }

  let date = build_date(year.as_deref(), month, day.as_deref(), qualifier);
  match range_start {
    Some(primary) => GedcomDate {
      primary,
      before: Some(date),
    },
    None => GedcomDate {
      primary: date,
      before:  None,
    },
  }
}
