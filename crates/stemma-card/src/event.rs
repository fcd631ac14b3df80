//! Event-block parser.
//!
//! One block is the ordered run of lines belonging to a single life event:
//!
//! ```text
//! 1881-04-03   Marriage    Mary Roe [2]
//! +Place       St. Mary's, Leeds
//! -url         https://example.org/parish
//! +Source      Parish register
//! | 1881, page 113
//! -Author      Rev. A. Clark
//! -file        image register-1881.png
//! -transcript  Married: John Doe, bachelor,
//! | and Mary Roe, spinster.
//! ```
//!
//! The first line is date, type and optional remainder; every further line
//! is dispatched on its leading character. Errors are reported and the
//! line (or missing field) is skipped — the block is never rejected.

use stemma_core::{
  Attribute, Diagnostics, Event, EventKind, FileAttachment, SourceRef,
};

use crate::line::{LineClass, classify};

// ─── Field splitting ─────────────────────────────────────────────────────────

/// Split into at most `n` whitespace-run-separated fields; the last field
/// keeps its internal spacing.
fn split_fields(line: &str, n: usize) -> Vec<&str> {
  let mut fields = Vec::new();
  let mut rest = line.trim_start();
  while fields.len() + 1 < n {
    match rest.find(char::is_whitespace) {
      Some(pos) => {
        fields.push(&rest[..pos]);
        rest = rest[pos..].trim_start();
        if rest.is_empty() {
          return fields;
        }
      }
      None => {
        if !rest.is_empty() {
          fields.push(rest);
        }
        return fields;
      }
    }
  }
  let rest = rest.trim_end();
  if !rest.is_empty() {
    fields.push(rest);
  }
  fields
}

// ─── Builder state ───────────────────────────────────────────────────────────

/// Where a `|` continuation line is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
  None,
  Attr,
  Sub,
  SourceDesc,
  Transcript,
}

struct EventBuilder<'a> {
  event:  Event,
  attr:   Option<Attribute>,
  source: Option<SourceRef>,
  sub:    Option<Attribute>,
  sink:   Sink,
  origin: &'a str,
}

impl<'a> EventBuilder<'a> {
  fn new(event: Event, origin: &'a str) -> Self {
    Self {
      event,
      attr: None,
      source: None,
      sub: None,
      sink: Sink::None,
      origin,
    }
  }

  fn flush_sub(&mut self) {
    if let Some(sub) = self.sub.take() {
      if let Some(source) = &mut self.source {
        source.info.push(sub);
      } else if let Some(attr) = &mut self.attr {
        attr.children.push(sub);
      }
    }
  }

  fn flush_container(&mut self) {
    self.flush_sub();
    if let Some(attr) = self.attr.take() {
      self.event.attributes.push(attr);
    }
    if let Some(source) = self.source.take() {
      self.event.sources.push(source);
    }
  }

  // ── Line handlers ───────────────────────────────────────────────────────

  fn start_attribute(&mut self, line: &str) {
    self.flush_container();
    let body = &line[1..];
    let fields = split_fields(body, 2);
    let tag = fields.first().copied().unwrap_or("");
    let rest = fields.get(1).copied().unwrap_or("");
    if tag.eq_ignore_ascii_case("source") {
      self.source = Some(SourceRef {
        description: rest.to_string(),
        ..SourceRef::default()
      });
      self.sink = Sink::SourceDesc;
    } else {
      self.attr = Some(Attribute::new(tag, rest));
      self.sink = Sink::Attr;
    }
  }

  fn start_sub(&mut self, line: &str, line_no: usize, diags: &mut Diagnostics) {
    if self.attr.is_none() && self.source.is_none() {
      diags.warn(
        self.origin,
        Some(line_no),
        format!("sub-attribute with no attribute or source: \"{line}\""),
      );
      return;
    }
    self.flush_sub();
    let body = &line[1..];
    let fields = split_fields(body, 2);
    let tag = fields.first().copied().unwrap_or("");
    let rest = fields.get(1).copied().unwrap_or("");

    if tag.eq_ignore_ascii_case("url") {
      // A link for the enclosing attribute; inside a source it becomes an
      // info item of its own.
      if let Some(attr) = &mut self.attr {
        attr.url = Some(rest.to_string());
      } else if let Some(source) = &mut self.source {
        let mut item = Attribute::new("URL", rest);
        item.url = Some(rest.to_string());
        source.info.push(item);
      }
      self.sink = Sink::None;
    } else if tag.eq_ignore_ascii_case("file") {
      let Some(source) = &mut self.source else {
        diags.warn(
          self.origin,
          Some(line_no),
          "-file outside a source block",
        );
        return;
      };
      let parts = split_fields(rest, 2);
      if parts.len() < 2 {
        diags.warn(
          self.origin,
          Some(line_no),
          format!("-file needs a type and a name: \"{line}\""),
        );
        return;
      }
      source.files.push(FileAttachment {
        kind: parts[0].to_string(),
        name: parts[1].to_string(),
      });
      self.sink = Sink::None;
    } else if tag.eq_ignore_ascii_case("transcript") {
      let Some(source) = &mut self.source else {
        diags.warn(
          self.origin,
          Some(line_no),
          "-transcript outside a source block",
        );
        return;
      };
      source.transcripts.push(rest.to_string());
      self.sink = Sink::Transcript;
    } else {
      self.sub = Some(Attribute::new(tag, rest));
      self.sink = Sink::Sub;
    }
  }

  fn continuation(&mut self, line: &str, line_no: usize, diags: &mut Diagnostics) {
    let content = line[1..].strip_prefix(' ').unwrap_or(&line[1..]).trim_end();
    match self.sink {
      Sink::Attr => {
        if let Some(attr) = &mut self.attr {
          attr.continue_text(content.trim());
        }
      }
      Sink::Sub => {
        if let Some(sub) = &mut self.sub {
          sub.continue_text(content.trim());
        }
      }
      Sink::SourceDesc => {
        if let Some(source) = &mut self.source {
          source.continue_description(content.trim());
        }
      }
      Sink::Transcript => {
        // Transcript text keeps its line structure.
        if let Some(source) = &mut self.source
          && let Some(text) = source.transcripts.last_mut()
        {
          if !text.is_empty() {
            text.push('\n');
          }
          text.push_str(content);
        }
      }
      Sink::None => diags.warn(
        self.origin,
        Some(line_no),
        "continuation line with nothing to continue",
      ),
    }
  }

  fn finish(mut self) -> Event {
    self.flush_container();
    self.event
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Parse the lines of one event block. `first_line_no` is the 1-based file
/// line of the block's first line, used for diagnostics.
pub fn parse_event(
  lines: &[String],
  origin: &str,
  first_line_no: usize,
  diags: &mut Diagnostics,
) -> Event {
  let head = lines.first().map(String::as_str).unwrap_or("");
  let fields = split_fields(head, 3);

  let date = fields.first().copied().unwrap_or("?");
  let kind = match fields.get(1) {
    Some(tag) => EventKind::from_tag(tag),
    None => {
      diags.error(
        origin,
        Some(first_line_no),
        format!("insufficient fields in event line \"{head}\""),
      );
      EventKind::Other(String::new())
    }
  };
  let mut event = Event::new(date, kind);
  event.rest = fields.get(2).map(|r| r.to_string());
  event.lines = lines.to_vec();

  let mut builder = EventBuilder::new(event, origin);
  for (offset, line) in lines.iter().enumerate().skip(1) {
    let line_no = first_line_no + offset;
    match classify(line) {
      LineClass::Blank | LineClass::Comment => {}
      LineClass::AttributeStart => builder.start_attribute(line),
      LineClass::SubAttribute => builder.start_sub(line, line_no, diags),
      LineClass::Continuation => builder.continuation(line, line_no, diags),
      _ => diags.warn(
        origin,
        Some(line_no),
        format!("unexpected line in event block dropped: \"{line}\""),
      ),
    }
  }
  builder.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(lines: &[&str]) -> (Event, Vec<stemma_core::Diagnostic>) {
    let owned: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
    let mut diags = Diagnostics::new();
    let event = parse_event(&owned, "test.card", 1, &mut diags);
    (event, diags.into_vec())
  }

  // ── First line ──────────────────────────────────────────────────────────

  #[test]
  fn date_type_and_remainder() {
    let (e, diags) = parse(&["1881-04-03  Marriage    Mary Roe [2]"]);
    assert!(diags.is_empty());
    assert_eq!(e.date, "1881-04-03");
    assert_eq!(e.kind, EventKind::Marriage);
    assert_eq!(e.rest.as_deref(), Some("Mary Roe [2]"));
  }

  #[test]
  fn missing_type_is_reported_but_kept() {
    let (e, diags) = parse(&["1881"]);
    assert_eq!(diags.len(), 1);
    assert_eq!(e.date, "1881");
    assert_eq!(e.kind, EventKind::Other(String::new()));
  }

  // ── Attributes ──────────────────────────────────────────────────────────

  #[test]
  fn attributes_with_continuation_and_url() {
    let (e, diags) = parse(&[
      "1900        Misc",
      "+Note       first part",
      "| second part",
      "-url        https://example.org/x",
    ]);
    assert!(diags.is_empty());
    assert_eq!(e.attributes.len(), 1);
    let a = &e.attributes[0];
    assert_eq!(a.caption, "Note");
    assert_eq!(a.text, "first part second part");
    assert_eq!(a.url.as_deref(), Some("https://example.org/x"));
  }

  #[test]
  fn sub_attributes_nest_under_their_attribute() {
    let (e, _) = parse(&[
      "1900        Misc",
      "+Place      Leeds",
      "-County     Yorkshire",
      "| West Riding",
    ]);
    let a = &e.attributes[0];
    assert_eq!(a.children.len(), 1);
    assert_eq!(a.children[0].caption, "County");
    assert_eq!(a.children[0].text, "Yorkshire West Riding");
  }

  // ── Sources ─────────────────────────────────────────────────────────────

  #[test]
  fn source_block_with_file_and_transcript() {
    let (e, diags) = parse(&[
      "1881-04-03  Marriage    Mary Roe [2]",
      "+Source     Parish register",
      "| 1881, page 113",
      "-Author     Rev. A. Clark",
      "-file       image register-1881.png",
      "-transcript Married: John Doe, bachelor,",
      "| and Mary Roe, spinster.",
    ]);
    assert!(diags.is_empty());
    assert_eq!(e.sources.len(), 1);
    let s = &e.sources[0];
    assert_eq!(s.description, "Parish register 1881, page 113");
    assert_eq!(s.info.len(), 1);
    assert_eq!(s.info[0].caption, "Author");
    assert_eq!(s.files.len(), 1);
    assert_eq!(s.files[0].kind, "image");
    assert_eq!(s.files[0].name, "register-1881.png");
    assert_eq!(
      s.transcripts[0],
      "Married: John Doe, bachelor,\nand Mary Roe, spinster."
    );
  }

  #[test]
  fn file_without_source_is_warned_and_dropped() {
    let (e, diags) = parse(&[
      "1900        Misc",
      "+Note       something",
      "-file       image x.png",
    ]);
    assert_eq!(diags.len(), 1);
    assert!(e.sources.is_empty());
  }

  // ── Recovery ────────────────────────────────────────────────────────────

  #[test]
  fn bare_continuation_is_warned() {
    let (_, diags) = parse(&["1900        Misc", "| floating text"]);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("nothing to continue"));
  }

  #[test]
  fn sub_attribute_without_container_is_warned() {
    let (e, diags) = parse(&["1900        Misc", "-County     Yorkshire"]);
    assert_eq!(diags.len(), 1);
    assert!(e.attributes.is_empty());
  }

  #[test]
  fn unknown_lead_character_is_dropped_with_warning() {
    let (e, diags) = parse(&["1900        Misc", "stray header text"]);
    assert_eq!(diags.len(), 1);
    assert!(e.attributes.is_empty());
  }

  #[test]
  fn comments_and_blanks_are_ignored() {
    let (_, diags) = parse(&["1900        Misc", "# note to self", "   "]);
    assert!(diags.is_empty());
  }
}
