//! Release lifecycle transitions
//!
//! ```text
//!   Released | absent --advance_to_draft--> Unreleased
//!   Unreleased        --freeze-----------> Released
//! ```
//!
//! Both transitions decompose the section, mutate the record and compose it
//! back. Both are idempotent: a call that finds nothing to do returns `false`.

use crate::changelog::Changelog;
use crate::changelog::elements::VersionElements;
use crate::changelog::heading::{GitRef, ReleaseLabel};
use crate::changelog::notices::DEVELOPMENT_WARNING;
use chrono::NaiveDate;
use semver::Version;
use tracing::{debug, info, warn};

impl Changelog {
  /// Start the next draft by cloning the most recent section of `current`
  ///
  /// The draft compares `v<current>` against `development_branch`, carries the
  /// development warning and starts with no changes.
  pub fn advance_to_draft(&mut self, current: &Version, development_branch: &str) -> bool {
    if let Some(draft) = self.unreleased()
      && &draft.heading.version != current
    {
      debug!(draft = %draft.heading.version, %current, "another version is already in development");
      return false;
    }

    let Some(index) = self.position(current) else {
      debug!(%current, "no section to clone, changelog left untouched");
      return false;
    };

    let source = &self.sections[index];
    if source.heading.label.is_unreleased() {
      debug!(%current, "draft already exists");
      return false;
    }

    let mut elements = VersionElements::from_section(source);
    elements.label = ReleaseLabel::Unreleased;
    elements.compare.from = GitRef::Tag(current.clone());
    elements.compare.to = GitRef::branch(development_branch);
    elements.development_warning = Some(DEVELOPMENT_WARNING.to_string());
    elements.availability_note = None;
    elements.yanked_notice = None;
    elements.changes.clear();

    self.sections.insert(0, elements.to_section());
    info!(%current, branch = development_branch, "created unreleased section");
    true
  }

  /// Turn the unreleased section into the `current` release dated `date`
  ///
  /// The compare range end moves from the development branch to `v<current>`,
  /// the development warning goes away, the changes stay.
  pub fn freeze(&mut self, current: &Version, date: NaiveDate, default_branch: &str) -> bool {
    let Some(index) = self.sections.iter().position(|s| s.heading.label.is_unreleased()) else {
      debug!(%current, "no unreleased section to freeze");
      return false;
    };

    let mut elements = VersionElements::from_section(&self.sections[index]);
    if !elements.compare.to.is_branch(default_branch) {
      debug!(to = %elements.compare.to, default_branch, "compare range did not end on the default branch");
    }
    if elements.version != *current {
      warn!(draft = %elements.version, %current, "freezing draft under a different version");
    }

    elements.version = current.clone();
    elements.label = ReleaseLabel::Released(date);
    elements.compare.to = GitRef::Tag(current.clone());
    elements.development_warning = None;

    self.sections[index] = elements.to_section();
    info!(%current, %date, "froze unreleased section");
    true
  }
}
