//! Reconciliation against release records through the library API

use anyhow::Result;
use changelog_rail::changelog::{GitRef, Registry};
use changelog_rail::reconcile::{IssueKind, parse_table};
use changelog_rail::{Changelog, LintOptions, ReleaseSources, lint};
use semver::Version;

const DOC: &str = "# Changelog

## [1.1.0 (2026-02-10)](https://github.com/org/repo/compare/v1.0.0...v1.1.0)

- Second.

## [1.0.0 (2024-08-20)](https://github.com/org/repo/compare/v0.9.0...v1.0.0)

- First.
";

fn options() -> LintOptions {
  LintOptions {
    package: "pkg".to_string(),
    repo_url: "https://github.com/org/repo".to_string(),
    registry: Registry::Pypi,
    current_version: None,
  }
}

#[test]
fn test_registry_date_mismatch_fixed_and_stable() -> Result<()> {
  let sources = ReleaseSources {
    registry: parse_table(r#"{"1.1.0": {"date": "2026-02-09"}, "1.0.0": {"date": "2024-08-20"}}"#)?,
    ..Default::default()
  };
  let mut changelog = Changelog::parse(DOC);

  let check = lint(&mut changelog.clone(), &sources, &options(), false);
  assert!(check.has_issues());
  assert!(
    check
      .issues
      .iter()
      .any(|i| i.version == "1.1.0" && matches!(i.kind, IssueKind::DateMismatch { .. }))
  );

  let fixed = lint(&mut changelog, &sources, &options(), true);
  assert!(!fixed.has_issues());
  assert!(changelog.render().contains("## [1.1.0 (2026-02-09)]"));

  let once = changelog.render();
  let again = lint(&mut changelog, &sources, &options(), true);
  assert!(!again.changed);
  assert!(!again.has_issues());
  assert_eq!(changelog.render(), once);
  Ok(())
}

#[test]
fn test_tag_orphan_inserted_between_releases() -> Result<()> {
  let sources = ReleaseSources {
    tags: parse_table(
      r#"{"v1.1.0": {"date": "2026-02-10"}, "v1.0.5": {"date": "2026-01-15"}, "v1.0.0": {"date": "2024-08-20"}}"#,
    )?,
    ..Default::default()
  };
  let mut changelog = Changelog::parse(DOC);

  let report = lint(&mut changelog, &sources, &options(), true);
  assert!(report.changed);

  let rendered = changelog.render();
  assert!(rendered.contains("## [1.0.5 (2026-01-15)](https://github.com/org/repo/compare/v1.0.0...v1.0.5)"));
  assert!(rendered.contains("## [1.1.0 (2026-02-10)](https://github.com/org/repo/compare/v1.0.5...v1.1.0)"));

  // Adjacent released sections stay linked
  for pair in changelog.sections().windows(2) {
    assert_eq!(pair[0].heading.compare.from, GitRef::Tag(pair[1].heading.version.clone()));
  }
  Ok(())
}

#[test]
fn test_orphans_are_sources_minus_document() -> Result<()> {
  let mut changelog = Changelog::parse(DOC);
  changelog.advance_to_draft(&Version::new(1, 1, 0), "main");

  let sources = ReleaseSources {
    registry: parse_table(r#"{"1.0.0": {"date": "2024-08-20"}, "1.1.0": {"date": "2026-02-10"}}"#)?,
    host: parse_table(r#"{"1.0.2": {"date": "2025-01-01"}}"#)?,
    tags: parse_table(r#"{"1.0.3": {"date": "2025-02-01"}, "1.2.0": {"date": "2026-03-01"}}"#)?,
  };
  let options = LintOptions {
    current_version: Some(Version::new(1, 2, 0)),
    ..options()
  };

  let report = lint(&mut changelog, &sources, &options, false);
  let orphans: Vec<&str> = report
    .issues
    .iter()
    .filter(|i| matches!(i.kind, IssueKind::Orphan { .. }))
    .map(|i| i.version.as_str())
    .collect();
  assert_eq!(orphans, vec!["1.0.2", "1.0.3"]);
  assert!(report.has_issues());
  Ok(())
}

#[test]
fn test_clean_document_has_no_issues() -> Result<()> {
  let sources = ReleaseSources {
    tags: parse_table(r#"{"1.1.0": {"date": "2026-02-10"}, "1.0.0": {"date": "2024-08-20"}}"#)?,
    ..Default::default()
  };
  let mut changelog = Changelog::parse(DOC);

  let report = lint(&mut changelog, &sources, &options(), false);
  assert!(report.issues.is_empty());
  assert!(!report.has_issues());
  Ok(())
}
