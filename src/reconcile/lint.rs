//! Drift detection and repair against external release records
//!
//! Three passes over the document:
//! 1. dates and source membership of every released section
//! 2. versions the sources know but the document lacks (orphans)
//! 3. availability and yanked notices rebuilt from source membership
//!
//! In fix mode each pass repairs what it finds; a fix run over its own output
//! reports nothing new and changes nothing.

use crate::changelog::notices::{Availability, HOST_NAME, PlatformLink, yanked_notice};
use crate::changelog::{Changelog, Registry, TAG_PREFIX, VersionElements};
use crate::reconcile::sources::{ReleaseSources, SourceKind};
use chrono::NaiveDate;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  /// Non-blocking, but should be addressed
  Warning,
  /// Blocking until fixed
  Error,
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Severity::Warning => write!(f, "WARN"),
      Severity::Error => write!(f, "ERROR"),
    }
  }
}

/// What kind of drift was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IssueKind {
  /// Document date differs from the authoritative source
  DateMismatch {
    source: SourceKind,
    expected: NaiveDate,
    found: NaiveDate,
  },
  /// Source should carry the version (it is past the source's first release) but does not
  MissingFromSource { source: SourceKind },
  /// Source knows a version the document has no section for
  Orphan { source: SourceKind, date: NaiveDate },
  /// Notices no longer match source membership
  StaleNotice,
}

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
  pub version: String,
  pub severity: Severity,
  #[serde(flatten)]
  pub kind: IssueKind,
  pub message: String,
  /// Repaired in this run
  pub fixed: bool,
}

impl LintIssue {
  fn new(version: &Version, severity: Severity, kind: IssueKind, message: String) -> Self {
    Self {
      version: version.to_string(),
      severity,
      kind,
      message,
      fixed: false,
    }
  }
}

/// Outcome of a lint run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
  pub issues: Vec<LintIssue>,
  /// Number of issues repaired
  pub fixed: usize,
  /// Whether the document text changed
  pub changed: bool,
}

impl LintReport {
  /// True iff an error-level issue remains unresolved. Warnings never count.
  pub fn has_issues(&self) -> bool {
    self.issues.iter().any(|i| i.severity == Severity::Error && !i.fixed)
  }

  pub fn errors(&self) -> usize {
    self.issues.iter().filter(|i| i.severity == Severity::Error).count()
  }

  pub fn warnings(&self) -> usize {
    self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
  }

  fn push(&mut self, mut issue: LintIssue, repaired: bool) {
    if repaired {
      issue.fixed = true;
      self.fixed += 1;
      self.changed = true;
    }
    self.issues.push(issue);
  }
}

/// Project metadata needed to build links and notices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
  /// Registry package name, used when a record has no `source_name`
  pub package: String,
  pub repo_url: String,
  pub registry: Registry,
  /// Version being developed; never reported as an orphan
  pub current_version: Option<Version>,
}

/// Reconcile `changelog` against `sources`, repairing it in place when `fix` is set
pub fn lint(changelog: &mut Changelog, sources: &ReleaseSources, options: &LintOptions, fix: bool) -> LintReport {
  let mut report = LintReport::default();

  for kind in SourceKind::ALL {
    if !sources.is_available(kind) {
      debug!(source = %kind, "source unavailable, skipping");
    }
  }

  check_releases(changelog, sources, fix, &mut report);
  check_orphans(changelog, sources, options, fix, &mut report);
  check_notices(changelog, sources, options, fix, &mut report);

  info!(
    errors = report.errors(),
    warnings = report.warnings(),
    fixed = report.fixed,
    "lint finished"
  );
  report
}

/// Released versions in document order, first occurrence only
fn released_versions(changelog: &Changelog) -> Vec<(Version, NaiveDate)> {
  let mut seen = BTreeSet::new();
  changelog
    .extract_all_releases()
    .into_iter()
    .filter(|(version, _)| seen.insert(version.clone()))
    .collect()
}

fn check_releases(changelog: &mut Changelog, sources: &ReleaseSources, fix: bool, report: &mut LintReport) {
  for (version, found) in released_versions(changelog) {
    for kind in SourceKind::ALL {
      if let Some(boundary) = sources.boundary(kind)
        && &version >= boundary
        && !sources.contains(kind, &version)
      {
        report.push(
          LintIssue::new(
            &version,
            Severity::Warning,
            IssueKind::MissingFromSource { source: kind },
            format!("{} is missing from the {} (first release there: {})", version, kind, boundary),
          ),
          false,
        );
      }
    }

    let Some((source, expected)) = sources.authoritative_date(&version) else {
      continue;
    };

    for kind in SourceKind::ALL {
      if let Some(other) = sources.date_of(kind, &version)
        && other != expected
      {
        debug!(%version, source = %kind, date = %other, %expected, "source disagrees with authoritative date");
      }
    }

    if expected != found {
      let repaired = fix && changelog.set_release_date(&version, expected);
      if repaired {
        info!(%version, %found, %expected, "corrected release date");
      }
      report.push(
        LintIssue::new(
          &version,
          Severity::Error,
          IssueKind::DateMismatch { source, expected, found },
          format!("{} is dated {} but the {} says {}", version, found, source, expected),
        ),
        repaired,
      );
    }
  }
}

fn check_orphans(
  changelog: &mut Changelog,
  sources: &ReleaseSources,
  options: &LintOptions,
  fix: bool,
  report: &mut LintReport,
) {
  let known = sources.all_versions();
  let headings = changelog.extract_all_version_headings();
  let in_development: BTreeSet<&Version> = changelog
    .unreleased()
    .map(|s| &s.heading.version)
    .into_iter()
    .chain(options.current_version.as_ref())
    .collect();

  let orphans: Vec<Version> = known
    .iter()
    .filter(|v| !headings.contains(*v) && !in_development.contains(v))
    .cloned()
    .collect();

  // Ascending, so each insert can link against the one before it
  for version in orphans {
    let Some((source, date)) = sources.authoritative_date(&version) else {
      continue;
    };
    let repaired = fix && changelog.insert_orphan_section(&version, date, &options.repo_url, &known);
    report.push(
      LintIssue::new(
        &version,
        Severity::Error,
        IssueKind::Orphan { source, date },
        format!("{} was released on {} ({}) but has no changelog entry", version, date, source),
      ),
      repaired,
    );
  }
}

fn check_notices(
  changelog: &mut Changelog,
  sources: &ReleaseSources,
  options: &LintOptions,
  fix: bool,
  report: &mut LintReport,
) {
  let platforms_known = sources.is_available(SourceKind::Registry) || sources.is_available(SourceKind::Host);

  for (version, _) in released_versions(changelog) {
    let Some(current) = changelog.decompose_released(&version) else {
      continue;
    };

    let mut expected = current.clone();
    expected.development_warning = None;
    if platforms_known {
      let previous = current
        .availability_note
        .as_deref()
        .map(Availability::parse)
        .unwrap_or_default();
      expected.availability_note = availability(&version, sources, options, &previous).render(&version);
    }
    if sources.is_available(SourceKind::Registry) {
      expected.yanked_notice = yanked(&version, sources, options);
    }

    if expected == current {
      continue;
    }

    let repaired = fix && changelog.replace_released(&expected);
    if repaired {
      info!(%version, "rebuilt release notices");
    }
    report.push(
      LintIssue::new(
        &version,
        Severity::Warning,
        IssueKind::StaleNotice,
        stale_message(&current, &expected),
      ),
      repaired,
    );
  }
}

/// Where `version` is, is not, or first was available.
///
/// Platforms without records keep whatever `previous` says about them.
fn availability(
  version: &Version,
  sources: &ReleaseSources,
  options: &LintOptions,
  previous: &Availability,
) -> Availability {
  let mut availability = Availability::default();
  let registry_name = options.registry.display_name();

  match sources.boundary(SourceKind::Registry) {
    Some(boundary) => match sources.registry.get(version) {
      // Withdrawn releases get the caution notice instead
      Some(release) if release.yanked => {}
      Some(release) => {
        let package = release.source_name.as_deref().unwrap_or(&options.package);
        let link = PlatformLink::new(registry_name, options.registry.release_url(package, version));
        if version == boundary {
          availability.first_on.push(link);
        } else {
          availability.available_on.push(link);
        }
      }
      None if version > boundary => availability.missing_from.push(registry_name.to_string()),
      None => {}
    },
    None => availability.append(previous.filtered(|name| name == registry_name)),
  }

  match sources.boundary(SourceKind::Host) {
    Some(boundary) => {
      if sources.host.contains_key(version) {
        let link = PlatformLink::new(HOST_NAME, host_release_url(&options.repo_url, version));
        if version == boundary {
          availability.first_on.push(link);
        } else {
          availability.available_on.push(link);
        }
      } else if version > boundary {
        availability.missing_from.push(HOST_NAME.to_string());
      }
    }
    None => availability.append(previous.filtered(|name| name == HOST_NAME)),
  }

  // Platforms no source covers
  availability.append(previous.filtered(|name| name != registry_name && name != HOST_NAME));

  availability
}

fn yanked(version: &Version, sources: &ReleaseSources, options: &LintOptions) -> Option<String> {
  let release = sources.registry.get(version).filter(|r| r.yanked)?;
  let package = release.source_name.as_deref().unwrap_or(&options.package);
  Some(yanked_notice(
    version,
    options.registry,
    &options.registry.release_url(package, version),
  ))
}

/// Release page on the hosting platform
pub fn host_release_url(repo_url: &str, version: &Version) -> String {
  format!("{}/releases/tag/{}{}", repo_url, TAG_PREFIX, version)
}

fn stale_message(current: &VersionElements, expected: &VersionElements) -> String {
  let mut parts = Vec::new();
  if current.development_warning.is_some() {
    parts.push("development warning on a released version");
  }
  if current.availability_note != expected.availability_note {
    parts.push("availability note");
  }
  if current.yanked_notice != expected.yanked_notice {
    parts.push("yanked notice");
  }
  format!("{} has outdated notices: {}", current.version, parts.join(", "))
}
