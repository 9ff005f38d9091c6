//! Integration tests for the changelog-rail binary

use crate::helpers::{REPO, TestProject, run_changelog_rail, run_raw, stdout};
use anyhow::Result;

const RELEASED: &str = "# Changelog

## [1.1.0 (2026-02-10)](https://github.com/org/repo/compare/v1.0.0...v1.1.0)

- Second.

## [1.0.0 (2024-08-20)](https://github.com/org/repo/compare/v0.9.0...v1.0.0)

- First.
";

const DRAFTED: &str = "# Changelog

## [1.2.3 (unreleased)](https://github.com/org/repo/compare/v1.2.2...main)

> [!WARNING]
> This version is **not released yet** and is under active development.

- Add `--dry-run`.

## [1.2.2 (2026-01-03)](https://github.com/org/repo/compare/v1.2.1...v1.2.2)

- Fix crash.
";

#[test]
fn test_draft_uses_configured_version() -> Result<()> {
  let project = TestProject::with_config("current_version = \"1.1.0\"\n")?;
  project.write_file("CHANGELOG.md", RELEASED)?;

  let output = run_changelog_rail(&project.path, &["draft"])?;
  assert!(stdout(&output).contains("Opened unreleased section"));

  let changelog = project.changelog()?;
  assert!(changelog.starts_with(
    "# Changelog\n\n## [1.1.0 (unreleased)](https://github.com/org/repo/compare/v1.1.0...main)\n\n> [!WARNING]\n"
  ));

  // Second run is a no-op
  let output = run_changelog_rail(&project.path, &["draft"])?;
  assert!(stdout(&output).contains("Nothing to do"));
  assert_eq!(project.changelog()?, changelog);
  Ok(())
}

#[test]
fn test_draft_without_version_fails() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("CHANGELOG.md", RELEASED)?;

  let output = run_raw(&project.path, &["draft"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("current_version"));
  assert_eq!(project.changelog()?, RELEASED);
  Ok(())
}

#[test]
fn test_freeze_with_explicit_date() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("CHANGELOG.md", DRAFTED)?;

  run_changelog_rail(
    &project.path,
    &["freeze", "--version", "1.2.3", "--date", "2026-02-14"],
  )?;

  let changelog = project.changelog()?;
  assert!(changelog.contains(
    "## [1.2.3 (2026-02-14)](https://github.com/org/repo/compare/v1.2.2...v1.2.3)\n\n- Add `--dry-run`.\n"
  ));
  assert!(!changelog.contains("not released yet"));
  Ok(())
}

#[test]
fn test_freeze_rejects_bad_date() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("CHANGELOG.md", DRAFTED)?;

  let output = run_raw(
    &project.path,
    &["freeze", "--version", "1.2.3", "--date", "14/02/2026"],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid date"));
  assert_eq!(project.changelog()?, DRAFTED);
  Ok(())
}

#[test]
fn test_releases_json() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("CHANGELOG.md", DRAFTED)?;

  let output = run_changelog_rail(&project.path, &["releases", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  assert_eq!(json.as_array().map(|a| a.len()), Some(1));
  assert_eq!(json[0]["version"], "1.2.2");
  assert_eq!(json[0]["date"], "2026-01-03");
  Ok(())
}

#[test]
fn test_show_json_and_missing_version() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("CHANGELOG.md", DRAFTED)?;

  let output = run_changelog_rail(&project.path, &["show", "1.2.3", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;
  assert_eq!(json["version"], "1.2.3");
  assert!(json["date"].is_null());
  assert_eq!(json["compare_to"], "main");
  assert_eq!(json["changes"], "- Add `--dry-run`.");
  assert!(json["development_warning"].is_string());

  let output = run_raw(&project.path, &["show", "9.9.9"])?;
  assert_eq!(output.status.code(), Some(1));
  Ok(())
}

#[test]
fn test_insert_takes_repository_from_document() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("CHANGELOG.md", RELEASED)?;

  run_changelog_rail(&project.path, &["insert", "1.0.5", "--date", "2026-01-15"])?;

  let changelog = project.changelog()?;
  assert!(changelog.contains(&format!(
    "## [1.0.5 (2026-01-15)]({}/compare/v1.0.0...v1.0.5)",
    REPO
  )));
  assert!(changelog.contains(&format!("## [1.1.0 (2026-02-10)]({}/compare/v1.0.5...v1.1.0)", REPO)));
  Ok(())
}

#[test]
fn test_lint_check_then_fix() -> Result<()> {
  let project = TestProject::with_config("")?;
  project.write_file("CHANGELOG.md", RELEASED)?;
  project.write_file(
    "tags.json",
    r#"{"v1.1.0": {"date": "2026-02-09"}, "v1.0.5": {"date": "2026-01-15"}, "v1.0.0": {"date": "2024-08-20"}}"#,
  )?;

  let output = run_raw(&project.path, &["lint", "--tags", "tags.json"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stdout(&output).contains("error(s)"));
  assert_eq!(project.changelog()?, RELEASED);

  let output = run_changelog_rail(&project.path, &["lint", "--tags", "tags.json", "--fix"])?;
  assert!(stdout(&output).contains("Fixed 2 issue(s)"));

  let changelog = project.changelog()?;
  assert!(changelog.contains("## [1.1.0 (2026-02-09)](https://github.com/org/repo/compare/v1.0.5...v1.1.0)"));
  assert!(changelog.contains("## [1.0.5 (2026-01-15)](https://github.com/org/repo/compare/v1.0.0...v1.0.5)"));

  let output = run_changelog_rail(&project.path, &["lint", "--tags", "tags.json"])?;
  assert!(stdout(&output).contains("matches all release records"));
  Ok(())
}

#[test]
fn test_lint_json_report() -> Result<()> {
  let project = TestProject::with_config("")?;
  project.write_file("CHANGELOG.md", RELEASED)?;
  project.write_file(
    "registry.json",
    r#"{"1.0.0": {"date": "2024-08-20"}, "1.1.0": {"date": "2026-02-10", "yanked": true}}"#,
  )?;

  // Only notice warnings: exit status stays 0
  let output = run_changelog_rail(&project.path, &["lint", "--registry", "registry.json", "--json"])?;
  let json: serde_json::Value = serde_json::from_str(&stdout(&output))?;

  let issues = json["issues"].as_array().cloned().unwrap_or_default();
  assert_eq!(issues.len(), 2);
  assert!(issues.iter().all(|i| i["kind"] == "stale-notice" && i["severity"] == "warning"));
  assert_eq!(json["changed"], false);
  Ok(())
}

#[test]
fn test_lint_rejects_bad_table() -> Result<()> {
  let project = TestProject::with_config("")?;
  project.write_file("CHANGELOG.md", RELEASED)?;
  project.write_file("tags.json", r#"{"latest": {"date": "2026-02-09"}}"#)?;

  let output = run_raw(&project.path, &["lint", "--tags", "tags.json"])?;
  assert_eq!(output.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Invalid version 'latest'"));
  assert!(stderr.contains("Invalid lookup table tags.json"));
  Ok(())
}

#[test]
fn test_custom_changelog_path() -> Result<()> {
  let project = TestProject::with_config("changelog = \"docs/CHANGES.md\"\ncurrent_version = \"1.1.0\"\n")?;
  project.write_file("docs/CHANGES.md", RELEASED)?;

  run_changelog_rail(&project.path, &["draft"])?;
  assert!(project.read_file("docs/CHANGES.md")?.contains("## [1.1.0 (unreleased)]"));

  project.write_file("other.md", DRAFTED)?;
  let output = run_changelog_rail(&project.path, &["--changelog", "other.md", "releases"])?;
  assert!(stdout(&output).contains("1.2.2"));
  Ok(())
}
