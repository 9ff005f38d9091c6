//! Ordering and compare-range linkage
//!
//! Sections are kept newest first, and every section's compare range starts at
//! the version of the next-older section (or at the root of history when none
//! exists). Insertions rewrite the neighbour above so the chain stays intact.

use crate::changelog::Changelog;
use crate::changelog::elements::VersionElements;
use crate::changelog::heading::{CompareRange, GitRef, ReleaseLabel};
use crate::changelog::scanner::scan;
use crate::core::error::{ChangelogError, ChangelogResult};
use chrono::NaiveDate;
use semver::Version;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

impl Changelog {
  /// Rewrite the compare-range start of the most recent section of `version`
  pub fn update_compare_base(&mut self, version: &Version, new_base: GitRef) -> bool {
    match self.position(version) {
      Some(index) => self.rebase_at(index, new_base),
      None => false,
    }
  }

  fn rebase_at(&mut self, index: usize, new_base: GitRef) -> bool {
    let heading = &mut self.sections[index].heading;
    if heading.compare.from == new_base {
      return false;
    }
    debug!(
      version = %heading.version,
      from = %heading.compare.from,
      to = %new_base,
      "rewriting compare base"
    );
    heading.compare.from = new_base;
    true
  }

  /// Insert a dated section for a version the document does not mention yet
  ///
  /// The new section compares against the nearest lower version known either
  /// to the caller or to the document's releases. It lands right before the
  /// first older release, and the section just above it is rebased onto it.
  /// The unreleased section always stays on top, even when the inserted
  /// version is newer than the draft's.
  pub fn insert_orphan_section(
    &mut self,
    version: &Version,
    date: NaiveDate,
    repo_url: &str,
    known_versions: &BTreeSet<Version>,
  ) -> bool {
    if self.position(version).is_some() {
      return false;
    }

    let released = self
      .sections
      .iter()
      .filter(|s| !s.heading.label.is_unreleased())
      .map(|s| &s.heading.version);
    let lower = known_versions
      .iter()
      .chain(released)
      .filter(|v| *v < version)
      .max()
      .cloned();
    let from = lower.map(GitRef::Tag).unwrap_or(GitRef::Root);

    let elements = VersionElements::new(
      version.clone(),
      ReleaseLabel::Released(date),
      CompareRange::new(repo_url, from, GitRef::Tag(version.clone())),
    );

    let index = self
      .sections
      .iter()
      .position(|s| s.heading.version < *version && !s.heading.label.is_unreleased())
      .unwrap_or(self.sections.len());
    // Drafts stay on top even when the release outruns their version
    if let Some(draft) = self.sections[..index]
      .iter()
      .find(|s| s.heading.label.is_unreleased() && s.heading.version <= *version)
    {
      warn!(
        %version,
        draft = %draft.heading.version,
        "inserted release is not older than the unreleased section above it"
      );
    }
    self.sections.insert(index, elements.to_section());
    info!(%version, %date, position = index, "inserted missing release section");

    if index > 0 {
      self.rebase_at(index - 1, GitRef::Tag(version.clone()));
    }
    true
  }

  /// Replace the most recent section of `version` with caller-supplied text
  ///
  /// The text must start with a valid version heading.
  pub fn replace_section(&mut self, version: &Version, new_section_text: &str) -> ChangelogResult<bool> {
    let (_, mut sections) = scan(new_section_text);
    if sections.is_empty() {
      return Err(ChangelogError::MalformedSection {
        version: version.to_string(),
      });
    }
    let replacement = sections.swap_remove(0);

    let Some(index) = self.position(version) else {
      debug!(%version, "no section to replace");
      return Ok(false);
    };
    Ok(self.replace_at(index, replacement))
  }
}
