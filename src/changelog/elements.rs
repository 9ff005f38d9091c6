//! Section decomposition and composition
//!
//! A section body is split into a fixed set of slots. Composition maps the
//! slots back to text in a fixed order:
//!
//! 1. heading line
//! 2. development warning
//! 3. availability note
//! 4. yanked notice
//! 5. changes
//!
//! For any record without foreign content, `decompose(compose(e)) == e`.

use crate::changelog::heading::{CompareRange, Heading, ReleaseLabel};
use crate::changelog::notices::{NoticeKind, classify};
use crate::changelog::scanner::{LineKind, Section, scan, tokenize, trim_blank_lines};
use semver::Version;
use tracing::warn;

/// Structural view of a version section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionElements {
  pub version: Version,
  pub label: ReleaseLabel,
  pub compare: CompareRange,
  /// Freeform text kept verbatim (minus classified notices)
  pub changes: String,
  pub development_warning: Option<String>,
  pub availability_note: Option<String>,
  pub yanked_notice: Option<String>,
}

impl VersionElements {
  /// Bare record with no body content
  pub fn new(version: Version, label: ReleaseLabel, compare: CompareRange) -> Self {
    Self {
      version,
      label,
      compare,
      changes: String::new(),
      development_warning: None,
      availability_note: None,
      yanked_notice: None,
    }
  }

  /// Decompose section text. Returns None if the text has no version heading.
  pub fn decompose(section_text: &str) -> Option<Self> {
    let (_, sections) = scan(section_text);
    sections.first().map(Self::from_section)
  }

  /// Decompose an already-scanned section
  pub fn from_section(section: &Section) -> Self {
    let mut elements = Self::new(
      section.heading.version.clone(),
      section.heading.label,
      section.heading.compare.clone(),
    );

    let mut kept: Vec<&str> = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in tokenize(&section.body) {
      match line.kind {
        LineKind::AdmonitionStart => {
          elements.take_block(&mut block, &mut kept);
          block.push(line.text);
        }
        LineKind::AdmonitionContinuation => block.push(line.text),
        _ => {
          elements.take_block(&mut block, &mut kept);
          kept.push(line.text);
        }
      }
    }
    elements.take_block(&mut block, &mut kept);

    elements.changes = collapse_blank_runs(&kept);
    elements
  }

  /// Route a finished blockquote run to its slot, or back into the changes
  fn take_block<'a>(&mut self, block: &mut Vec<&'a str>, kept: &mut Vec<&'a str>) {
    if block.is_empty() {
      return;
    }

    let text = block.join("\n");
    let slot = match classify(&text) {
      Some(NoticeKind::DevelopmentWarning) => &mut self.development_warning,
      Some(NoticeKind::Availability) => &mut self.availability_note,
      Some(NoticeKind::Yanked) => &mut self.yanked_notice,
      None => {
        kept.append(block);
        return;
      }
    };

    if slot.is_some() {
      warn!(version = %self.version, "dropping duplicate notice block:\n{}", text);
    } else {
      *slot = Some(text);
    }
    block.clear();
  }

  pub fn heading(&self) -> Heading {
    Heading {
      version: self.version.clone(),
      label: self.label,
      compare: self.compare.clone(),
    }
  }

  /// Body slots in template order, empty ones skipped
  fn body_parts(&self) -> Vec<&str> {
    [
      self.development_warning.as_deref(),
      self.availability_note.as_deref(),
      self.yanked_notice.as_deref(),
      Some(self.changes.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(trim_blank_lines)
    .filter(|part| !part.is_empty())
    .collect()
  }

  /// Render canonical section text
  pub fn compose(&self) -> String {
    self.to_section().text()
  }

  pub fn to_section(&self) -> Section {
    Section {
      heading: self.heading(),
      body: self.body_parts().join("\n\n"),
    }
  }
}

/// Join lines, keeping at most one blank line in a row, trimmed
fn collapse_blank_runs(lines: &[&str]) -> String {
  let mut out: Vec<&str> = Vec::new();
  let mut previous_blank = false;

  for line in lines {
    let blank = line.trim().is_empty();
    if blank && previous_blank {
      continue;
    }
    out.push(if blank { "" } else { line });
    previous_blank = blank;
  }

  trim_blank_lines(&out.join("\n")).to_string()
}

/// Render a record back into section text
pub fn compose(elements: &VersionElements) -> String {
  elements.compose()
}
