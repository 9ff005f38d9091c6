//! Changelog engine
//!
//! Parses a Markdown changelog into structured version sections, moves sections
//! through the release lifecycle and keeps compare links between adjacent
//! sections consistent.
//!
//! ## Modules
//! - **heading**: version heading grammar and the structured compare range
//! - **scanner**: line tokens, header/section split
//! - **elements**: section decomposition and composition
//! - **notices**: admonition classification and wording
//! - **lifecycle**: advance-to-draft and freeze transitions
//! - **linkage**: ordered insertion, compare-base rewrites, section replacement
//!
//! Every mutating operation works in place and returns whether the document
//! changed, so re-running under automated retry is always safe.

pub mod elements;
pub mod heading;
pub mod lifecycle;
pub mod linkage;
pub mod notices;
pub mod scanner;

pub use elements::{VersionElements, compose};
pub use heading::{CompareRange, GitRef, Heading, ReleaseLabel, TAG_PREFIX, parse_date, parse_version};
pub use notices::Registry;
pub use scanner::{DEFAULT_HEADER, Section, scan};

use chrono::NaiveDate;
use semver::Version;
use std::collections::BTreeSet;
use std::fmt;

/// A changelog document: header preamble plus sections, newest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
  header: String,
  sections: Vec<Section>,
}

impl Default for Changelog {
  fn default() -> Self {
    Self {
      header: DEFAULT_HEADER.to_string(),
      sections: Vec::new(),
    }
  }
}

impl Changelog {
  /// Parse document text. Never fails; see [`scan`].
  pub fn parse(text: &str) -> Self {
    let (header, sections) = scan(text);
    Self { header, sections }
  }

  pub fn header(&self) -> &str {
    &self.header
  }

  pub fn sections(&self) -> &[Section] {
    &self.sections
  }

  /// Render the whole document
  pub fn render(&self) -> String {
    let mut out = self.header.clone();
    out.push('\n');
    for section in &self.sections {
      out.push('\n');
      out.push_str(&section.text());
    }
    out
  }

  /// Index of the first (most recent) section with this version
  pub fn position(&self, version: &Version) -> Option<usize> {
    self.sections.iter().position(|s| &s.heading.version == version)
  }

  /// Index of the first released section with this version
  fn released_position(&self, version: &Version) -> Option<usize> {
    self
      .sections
      .iter()
      .position(|s| &s.heading.version == version && !s.heading.label.is_unreleased())
  }

  /// The section currently in development, if any
  pub fn unreleased(&self) -> Option<&Section> {
    self.sections.iter().find(|s| s.heading.label.is_unreleased())
  }

  /// Decompose the most recent section with this version
  pub fn decompose(&self, version: &Version) -> Option<VersionElements> {
    self
      .position(version)
      .map(|index| VersionElements::from_section(&self.sections[index]))
  }

  /// Decompose the released section with this version, skipping a draft of the same version
  pub fn decompose_released(&self, version: &Version) -> Option<VersionElements> {
    self
      .released_position(version)
      .map(|index| VersionElements::from_section(&self.sections[index]))
  }

  /// Overwrite the released section with this version. Returns whether the text changed.
  pub fn replace_released(&mut self, elements: &VersionElements) -> bool {
    let Some(index) = self.released_position(&elements.version) else {
      return false;
    };
    self.replace_at(index, elements.to_section())
  }

  /// Re-date a released section in place
  pub fn set_release_date(&mut self, version: &Version, date: NaiveDate) -> bool {
    let Some(index) = self.released_position(version) else {
      return false;
    };
    let heading = &mut self.sections[index].heading;
    if heading.label == ReleaseLabel::Released(date) {
      return false;
    }
    heading.label = ReleaseLabel::Released(date);
    true
  }

  pub(crate) fn replace_at(&mut self, index: usize, section: Section) -> bool {
    if self.sections[index].text() == section.text() {
      return false;
    }
    self.sections[index] = section;
    true
  }

  /// `(version, date)` of every released section, in document order
  pub fn extract_all_releases(&self) -> Vec<(Version, NaiveDate)> {
    self
      .sections
      .iter()
      .filter_map(|s| s.heading.label.date().map(|date| (s.heading.version.clone(), date)))
      .collect()
  }

  /// Every version that has a heading, released or not
  pub fn extract_all_version_headings(&self) -> BTreeSet<Version> {
    self.sections.iter().map(|s| s.heading.version.clone()).collect()
  }

  /// Repository URL taken from the first heading's compare link
  pub fn repo_url(&self) -> Option<&str> {
    self.sections.first().map(|s| s.heading.compare.repo_url.as_str())
  }
}

impl fmt::Display for Changelog {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.render())
  }
}
