//! Admonition classification and canonical notice wording
//!
//! Blocks are classified by sniffing characteristic phrases. Hand-written
//! prose using the same phrasing will be classified too; there is no hidden
//! marker in the on-disk format to tell them apart.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Warning installed on every unreleased section
pub const DEVELOPMENT_WARNING: &str =
  "> [!WARNING]\n> This version is **not released yet** and is under active development.";

/// Display name of the release host
pub const HOST_NAME: &str = "GitHub";

/// Structural category of an admonition block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  DevelopmentWarning,
  Availability,
  Yanked,
}

/// Classify a blockquote run. None means it is ordinary content.
pub fn classify(block: &str) -> Option<NoticeKind> {
  // Emphasis markers would split phrases like "**not available** on"
  let plain: String = block
    .to_lowercase()
    .chars()
    .filter(|c| !matches!(c, '*' | '_'))
    .collect();

  if plain.contains("not released yet") {
    Some(NoticeKind::DevelopmentWarning)
  } else if plain.contains("yanked") {
    Some(NoticeKind::Yanked)
  } else if plain.contains("available on") {
    Some(NoticeKind::Availability)
  } else {
    None
  }
}

/// Package registry the project publishes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Registry {
  #[default]
  Pypi,
  CratesIo,
}

impl Registry {
  pub fn display_name(&self) -> &'static str {
    match self {
      Registry::Pypi => "PyPI",
      Registry::CratesIo => "crates.io",
    }
  }

  /// Page of a single release on the registry
  pub fn release_url(&self, package: &str, version: &Version) -> String {
    match self {
      Registry::Pypi => format!("https://pypi.org/project/{}/{}/", package, version),
      Registry::CratesIo => format!("https://crates.io/crates/{}/{}", package, version),
    }
  }
}

impl fmt::Display for Registry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.display_name())
  }
}

/// Markdown link to a release page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLink {
  pub name: String,
  pub url: String,
}

impl PlatformLink {
  pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      url: url.into(),
    }
  }
}

impl fmt::Display for PlatformLink {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]({})", self.name, self.url)
  }
}

/// Where a version can and cannot be found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Availability {
  /// Platforms carrying the version
  pub available_on: Vec<PlatformLink>,
  /// Platforms for which this is the inaugural release
  pub first_on: Vec<PlatformLink>,
  /// Platforms where the version is confirmed missing
  pub missing_from: Vec<String>,
}

impl Availability {
  pub fn is_empty(&self) -> bool {
    self.available_on.is_empty() && self.first_on.is_empty() && self.missing_from.is_empty()
  }

  /// Render the `[!NOTE]` block, or None when there is nothing to say
  pub fn render(&self, version: &Version) -> Option<String> {
    if self.is_empty() {
      return None;
    }

    let mut lines = vec!["> [!NOTE]".to_string()];
    if !self.available_on.is_empty() {
      lines.push(format!(
        "> `{}` is available on {}.",
        version,
        join_words(&self.available_on)
      ));
    }
    if !self.first_on.is_empty() {
      lines.push(format!(
        "> `{}` is the *first version* available on {}.",
        version,
        join_words(&self.first_on)
      ));
    }
    if !self.missing_from.is_empty() {
      lines.push(format!(
        "> `{}` is **not available** on {}.",
        version,
        join_words(&self.missing_from)
      ));
    }

    Some(lines.join("\n"))
  }

  /// Read a note back into its entries. Sentences that do not follow the
  /// canonical wording are ignored, as are bare names where a link is expected.
  pub fn parse(block: &str) -> Self {
    let mut availability = Availability::default();
    for line in block.lines() {
      let sentence = line.trim_start_matches('>').trim();
      if let Some((_, list)) = sentence.split_once("is the *first version* available on ") {
        availability.first_on.extend(split_words(list).into_iter().filter_map(into_link));
      } else if let Some((_, list)) = sentence.split_once("is **not available** on ") {
        availability.missing_from.extend(split_words(list).into_iter().map(|(name, _)| name));
      } else if let Some((_, list)) = sentence.split_once("is available on ") {
        availability.available_on.extend(split_words(list).into_iter().filter_map(into_link));
      }
    }
    availability
  }

  /// Copy of the entries whose platform name passes `keep`
  pub fn filtered(&self, keep: impl Fn(&str) -> bool) -> Self {
    Self {
      available_on: self.available_on.iter().filter(|l| keep(l.name.as_str())).cloned().collect(),
      first_on: self.first_on.iter().filter(|l| keep(l.name.as_str())).cloned().collect(),
      missing_from: self.missing_from.iter().filter(|n| keep(n.as_str())).cloned().collect(),
    }
  }

  pub fn append(&mut self, other: Availability) {
    self.available_on.extend(other.available_on);
    self.first_on.extend(other.first_on);
    self.missing_from.extend(other.missing_from);
  }
}

/// Inverse of `join_words`: "[A](a), B and C." -> (name, url) pairs
fn split_words(list: &str) -> Vec<(String, Option<String>)> {
  list
    .trim()
    .trim_end_matches('.')
    .split(", ")
    .flat_map(|part| part.split(" and "))
    .map(str::trim)
    .filter(|word| !word.is_empty())
    .map(|word| {
      match word
        .strip_prefix('[')
        .and_then(|w| w.strip_suffix(')'))
        .and_then(|w| w.split_once("]("))
      {
        Some((name, url)) => (name.to_string(), Some(url.to_string())),
        None => (word.to_string(), None),
      }
    })
    .collect()
}

fn into_link((name, url): (String, Option<String>)) -> Option<PlatformLink> {
  url.map(|url| PlatformLink::new(name, url))
}

/// Render the `[!CAUTION]` block for a withdrawn release
pub fn yanked_notice(version: &Version, registry: Registry, url: &str) -> String {
  format!(
    "> [!CAUTION]\n> `{}` has been [yanked from {}]({}).",
    version,
    registry.display_name(),
    url
  )
}

/// "A", "A and B", "A, B and C"
fn join_words<T: fmt::Display>(items: &[T]) -> String {
  let words: Vec<String> = items.iter().map(|i| i.to_string()).collect();
  match words.split_last() {
    None => String::new(),
    Some((last, [])) => last.clone(),
    Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
  }
}
