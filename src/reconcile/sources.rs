//! External release records
//!
//! Lookup tables are fetched by the caller (registry API, release host API,
//! `git tag`) and handed over as immutable snapshots. An empty table means the
//! source is unavailable and is skipped, never an error.

use crate::changelog::parse_version;
use crate::core::error::{ChangelogResult, ResultExt};
use chrono::NaiveDate;
use semver::Version;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

/// A release as published on the package registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryRelease {
  pub date: NaiveDate,
  /// Withdrawn from the registry
  #[serde(default)]
  pub yanked: bool,
  /// Package name the version was published under (projects get renamed)
  #[serde(default)]
  pub source_name: Option<String>,
}

/// A release page on the hosting platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRelease {
  pub date: NaiveDate,
  #[serde(default)]
  pub body: String,
}

/// A version-control tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRelease {
  pub date: NaiveDate,
}

/// Which external source a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
  Registry,
  Host,
  Tag,
}

impl SourceKind {
  /// Preference order when sources disagree
  pub const ALL: [SourceKind; 3] = [SourceKind::Registry, SourceKind::Host, SourceKind::Tag];
}

impl fmt::Display for SourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SourceKind::Registry => write!(f, "registry"),
      SourceKind::Host => write!(f, "release host"),
      SourceKind::Tag => write!(f, "git tags"),
    }
  }
}

/// The three lookup tables, keyed by version
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseSources {
  pub registry: BTreeMap<Version, RegistryRelease>,
  pub host: BTreeMap<Version, HostRelease>,
  pub tags: BTreeMap<Version, TagRelease>,
}

impl ReleaseSources {
  /// Whether the source has any data at all
  pub fn is_available(&self, kind: SourceKind) -> bool {
    self.boundary(kind).is_some()
  }

  /// First-appearance boundary: the lowest version the source knows
  pub fn boundary(&self, kind: SourceKind) -> Option<&Version> {
    match kind {
      SourceKind::Registry => self.registry.keys().next(),
      SourceKind::Host => self.host.keys().next(),
      SourceKind::Tag => self.tags.keys().next(),
    }
  }

  pub fn date_of(&self, kind: SourceKind, version: &Version) -> Option<NaiveDate> {
    match kind {
      SourceKind::Registry => self.registry.get(version).map(|r| r.date),
      SourceKind::Host => self.host.get(version).map(|r| r.date),
      SourceKind::Tag => self.tags.get(version).map(|r| r.date),
    }
  }

  pub fn contains(&self, kind: SourceKind, version: &Version) -> bool {
    self.date_of(kind, version).is_some()
  }

  /// Date from the most preferred source that knows the version
  pub fn authoritative_date(&self, version: &Version) -> Option<(SourceKind, NaiveDate)> {
    SourceKind::ALL
      .into_iter()
      .find_map(|kind| self.date_of(kind, version).map(|date| (kind, date)))
  }

  /// Union of the versions known to any source
  pub fn all_versions(&self) -> BTreeSet<Version> {
    self
      .registry
      .keys()
      .chain(self.host.keys())
      .chain(self.tags.keys())
      .cloned()
      .collect()
  }

  /// Load a table from a JSON object keyed by version string
  pub fn load_table<T: DeserializeOwned>(path: &Path) -> ChangelogResult<BTreeMap<Version, T>> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read lookup table {}", path.display()))?;
    parse_table(&content).with_context(|| format!("Invalid lookup table {}", path.display()))
  }
}

/// Parse a JSON object keyed by version string; keys may carry a `v` prefix
pub fn parse_table<T: DeserializeOwned>(json: &str) -> ChangelogResult<BTreeMap<Version, T>> {
  let raw: BTreeMap<String, T> = serde_json::from_str(json)?;
  raw
    .into_iter()
    .map(|(key, value)| Ok((parse_version(&key)?, value)))
    .collect()
}
