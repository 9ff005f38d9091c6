//! Line-oriented document scanner
//!
//! Raw text is turned into a small token stream first, then grouped:
//!
//! ```text
//! Document       = Header VersionSection*
//! VersionSection = Heading Body
//! Body           = (Admonition | Text)*
//! ```
//!
//! The scanner never fails. A line that looks like a heading but does not
//! match the grammar stays in the nearest enclosing section (or the header).

use crate::changelog::heading::Heading;

/// Header used when a document is missing or has no preamble
pub const DEFAULT_HEADER: &str = "# Changelog";

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
  /// A valid version heading
  Heading,
  /// First line of a blockquote run, or a `> [!KIND]` line
  AdmonitionStart,
  /// Subsequent line of a blockquote run
  AdmonitionContinuation,
  /// Whitespace-only line
  Blank,
  /// Anything else
  Text,
}

/// One token of the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
  pub kind: LineKind,
  pub text: &'a str,
}

/// Tokenize text into classified lines
pub fn tokenize(text: &str) -> Vec<Line<'_>> {
  let mut lines = Vec::new();
  let mut in_quote = false;

  for text in text.lines() {
    let trimmed = text.trim_start();
    let kind = if trimmed.starts_with('>') {
      if in_quote && !is_kind_tag(trimmed) {
        LineKind::AdmonitionContinuation
      } else {
        LineKind::AdmonitionStart
      }
    } else if trimmed.is_empty() {
      LineKind::Blank
    } else if text.starts_with("## [") && Heading::parse(text).is_some() {
      LineKind::Heading
    } else {
      LineKind::Text
    };

    in_quote = matches!(kind, LineKind::AdmonitionStart | LineKind::AdmonitionContinuation);
    lines.push(Line { kind, text });
  }

  lines
}

/// `> [!NOTE]`, `> [!WARNING]`, `> [!CAUTION]`...
fn is_kind_tag(line: &str) -> bool {
  let rest = line.trim_start_matches('>').trim();
  rest.starts_with("[!") && rest.ends_with(']')
}

/// A version section: its parsed heading and the raw text below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
  pub heading: Heading,
  pub body: String,
}

impl Section {
  /// Canonical text: heading, one blank line, trimmed body, one trailing newline
  pub fn text(&self) -> String {
    let mut out = self.heading.to_string();
    let body = trim_blank_lines(&self.body);
    if !body.is_empty() {
      out.push_str("\n\n");
      out.push_str(body);
    }
    out.push('\n');
    out
  }
}

/// Split a document into its header and version sections
pub fn scan(text: &str) -> (String, Vec<Section>) {
  let mut header: Vec<&str> = Vec::new();
  let mut sections: Vec<(Heading, Vec<&str>)> = Vec::new();

  for line in tokenize(text) {
    if line.kind == LineKind::Heading
      && let Some(heading) = Heading::parse(line.text)
    {
      sections.push((heading, Vec::new()));
      continue;
    }

    match sections.last_mut() {
      Some((_, body)) => body.push(line.text),
      None => header.push(line.text),
    }
  }

  let joined = header.join("\n");
  let header = trim_blank_lines(&joined);
  let header = if header.is_empty() {
    DEFAULT_HEADER.to_string()
  } else {
    header.to_string()
  };

  let sections = sections
    .into_iter()
    .map(|(heading, body)| Section {
      heading,
      body: trim_blank_lines(&body.join("\n")).to_string(),
    })
    .collect();

  (header, sections)
}

/// Drop leading whitespace-only lines and all trailing whitespace
pub(crate) fn trim_blank_lines(text: &str) -> &str {
  let mut start = 0;
  for line in text.split_inclusive('\n') {
    if !line.trim().is_empty() {
      break;
    }
    start += line.len();
  }
  text[start..].trim_end()
}
