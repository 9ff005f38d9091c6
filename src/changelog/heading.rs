//! Version heading grammar
//!
//! A version heading is a single line:
//!
//! ```text
//! ## [1.2.3 (2026-02-14)](https://github.com/org/repo/compare/v1.2.2...v1.2.3)
//! ## [1.2.4 (unreleased)](https://github.com/org/repo/compare/v1.2.3...main)
//! ## [0.1.0 (2024-01-02)](https://github.com/org/repo/commits/v0.1.0)
//! ```
//!
//! The compare range is held as a structured `(from, to)` pair. URL text is only
//! ever rendered from it, never patched in place.

use crate::core::error::{ChangelogError, ChangelogResult};
use chrono::NaiveDate;
use semver::Version;
use std::fmt;

/// Prefix of release tags (`v1.2.3`)
pub const TAG_PREFIX: &str = "v";

/// Label used in place of a date while a version is in development
pub const UNRELEASED: &str = "unreleased";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a caller-supplied version, accepting an optional leading `v`
pub fn parse_version(input: &str) -> ChangelogResult<Version> {
  let trimmed = input.trim();
  let bare = trimmed.strip_prefix(TAG_PREFIX).unwrap_or(trimmed);
  Version::parse(bare).map_err(|e| ChangelogError::InvalidVersion {
    input: input.to_string(),
    reason: e.to_string(),
  })
}

/// Parse a caller-supplied `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> ChangelogResult<NaiveDate> {
  NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| ChangelogError::InvalidDate {
    input: input.to_string(),
  })
}

/// Release state of a section: a calendar date or the `unreleased` sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseLabel {
  Unreleased,
  Released(NaiveDate),
}

impl ReleaseLabel {
  fn parse(s: &str) -> Option<Self> {
    if s.eq_ignore_ascii_case(UNRELEASED) {
      return Some(Self::Unreleased);
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok().map(Self::Released)
  }

  pub fn is_unreleased(&self) -> bool {
    matches!(self, Self::Unreleased)
  }

  /// Release date, if released
  pub fn date(&self) -> Option<NaiveDate> {
    match self {
      Self::Unreleased => None,
      Self::Released(date) => Some(*date),
    }
  }
}

impl fmt::Display for ReleaseLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unreleased => write!(f, "{}", UNRELEASED),
      Self::Released(date) => write!(f, "{}", date.format(DATE_FORMAT)),
    }
  }
}

/// One end of a compare range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitRef {
  /// Start of history (no older release exists)
  Root,
  /// Release tag `v<version>`
  Tag(Version),
  /// Branch name, e.g. the development branch
  Branch(String),
}

impl GitRef {
  fn parse(s: &str) -> Self {
    if let Some(bare) = s.strip_prefix(TAG_PREFIX)
      && let Ok(version) = Version::parse(bare)
    {
      return Self::Tag(version);
    }
    Self::Branch(s.to_string())
  }

  /// Build a branch reference
  pub fn branch(name: impl Into<String>) -> Self {
    Self::Branch(name.into())
  }

  pub fn is_branch(&self, name: &str) -> bool {
    matches!(self, Self::Branch(b) if b == name)
  }
}

impl fmt::Display for GitRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Root => write!(f, "<root>"),
      Self::Tag(version) => write!(f, "{}{}", TAG_PREFIX, version),
      Self::Branch(name) => write!(f, "{}", name),
    }
  }
}

/// Commit span a heading links to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareRange {
  /// Repository URL without trailing slash (e.g. `https://github.com/org/repo`)
  pub repo_url: String,
  pub from: GitRef,
  pub to: GitRef,
}

impl CompareRange {
  pub fn new(repo_url: impl Into<String>, from: GitRef, to: GitRef) -> Self {
    Self {
      repo_url: repo_url.into(),
      from,
      to,
    }
  }

  /// Parse `<repo>/compare/<from>...<to>` or `<repo>/commits/<to>`
  pub fn parse_url(url: &str) -> Option<Self> {
    if let Some((repo, span)) = url.rsplit_once("/compare/") {
      let (from, to) = span.split_once("...")?;
      if repo.is_empty() || from.is_empty() || to.is_empty() {
        return None;
      }
      return Some(Self::new(repo, GitRef::parse(from), GitRef::parse(to)));
    }

    let (repo, to) = url.rsplit_once("/commits/")?;
    if repo.is_empty() || to.is_empty() {
      return None;
    }
    Some(Self::new(repo, GitRef::Root, GitRef::parse(to)))
  }

  /// Render the comparison URL
  pub fn url(&self) -> String {
    match &self.from {
      GitRef::Root => format!("{}/commits/{}", self.repo_url, self.to),
      from => format!("{}/compare/{}...{}", self.repo_url, from, self.to),
    }
  }
}

/// Parsed `## [<version> (<label>)](<url>)` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
  pub version: Version,
  pub label: ReleaseLabel,
  pub compare: CompareRange,
}

impl Heading {
  /// Parse a heading line. Returns None for anything that does not fully match.
  pub fn parse(line: &str) -> Option<Self> {
    let (version, label, url) = heading_parts(line.trim_end())?;

    Some(Self {
      version: Version::parse(version).ok()?,
      label: ReleaseLabel::parse(label)?,
      compare: CompareRange::parse_url(url)?,
    })
  }
}

impl fmt::Display for Heading {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "## [{} ({})]({})", self.version, self.label, self.compare.url())
  }
}

/// Split a heading line into its raw version, label and URL slots
fn heading_parts(line: &str) -> Option<(&str, &str, &str)> {
  use winnow::prelude::*;
  use winnow::token::{take_till, take_until};

  let mut parser = (
    "## [",
    take_until::<_, _, ()>(1.., " ("),
    " (",
    take_until(1.., ")]("),
    ")](",
    take_till(1.., |c: char| c == ')' || c.is_whitespace()),
    ")",
  );

  let Ok((_, version, _, label, _, url, _)) = parser.parse(line) else {
    return None;
  };

  Some((version, label, url))
}
