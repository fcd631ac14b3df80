//! Line classification — the leaf utility of the card grammar.
//!
//! A card line's role is decided by its first character (after trailing
//! whitespace is removed by the caller). Header and footer membership is
//! not a property of the line itself; the card parser's state machine
//! decides that.

/// What a single card line is, judged in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
  Blank,
  /// `#` comment, ignored everywhere.
  Comment,
  /// Starts with a digit or `?` — the first line of an event block.
  EventStart,
  /// `+` — starts an attribute or a `+source` block.
  AttributeStart,
  /// `-` — a sub-attribute of the current attribute or source.
  SubAttribute,
  /// `|` — continuation of the preceding text.
  Continuation,
  /// The literal word `EOF`, case-insensitive: everything after is footer.
  EofMarker,
  /// Anything else; a header line or, inside a timeline, a mistake.
  Other,
}

pub fn classify(line: &str) -> LineClass {
  if line.trim().is_empty() {
    return LineClass::Blank;
  }
  if line.eq_ignore_ascii_case("eof") {
    return LineClass::EofMarker;
  }
  match line.chars().next() {
    Some(c) if c.is_ascii_digit() || c == '?' => LineClass::EventStart,
    Some('+') => LineClass::AttributeStart,
    Some('-') => LineClass::SubAttribute,
    Some('|') => LineClass::Continuation,
    Some('#') => LineClass::Comment,
    _ => LineClass::Other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classification() {
    assert_eq!(classify(""), LineClass::Blank);
    assert_eq!(classify("   "), LineClass::Blank);
    assert_eq!(classify("# comment"), LineClass::Comment);
    assert_eq!(classify("1881-Q2      Birth"), LineClass::EventStart);
    assert_eq!(classify("?           Death"), LineClass::EventStart);
    assert_eq!(classify("+Place      Leeds"), LineClass::AttributeStart);
    assert_eq!(classify("-Author     J. Smith"), LineClass::SubAttribute);
    assert_eq!(classify("| continued"), LineClass::Continuation);
    assert_eq!(classify("EOF"), LineClass::EofMarker);
    assert_eq!(classify("eof"), LineClass::EofMarker);
    assert_eq!(classify("Name:       Jane"), LineClass::Other);
  }

  #[test]
  fn eof_must_be_the_whole_line() {
    assert_eq!(classify("EOF trailing"), LineClass::Other);
  }
}
