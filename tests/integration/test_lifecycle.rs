//! Release lifecycle through the library API

use anyhow::Result;
use changelog_rail::changelog::{GitRef, ReleaseLabel, parse_date};
use changelog_rail::{Changelog, VersionElements, compose};
use semver::Version;

const HISTORY: &str = "# Changelog

Notable changes to this project.

## [1.2.1 (unreleased)](https://github.com/org/repo/compare/v1.2.0...main)

> [!WARNING]
> This version is **not released yet** and is under active development.

- Add `--dry-run`.

## [1.2.0 (2026-01-03)](https://github.com/org/repo/compare/v1.1.0...v1.2.0)

> [!NOTE]
> `1.2.0` is available on [PyPI](https://pypi.org/project/pkg/1.2.0/).

- Fix crash on empty input.

## [1.1.0 (2025-11-20)](https://github.com/org/repo/commits/v1.1.0)

- First public release.
";

#[test]
fn test_empty_document_stays_empty() {
  let mut changelog = Changelog::parse("");
  assert!(!changelog.advance_to_draft(&Version::new(1, 1, 1), "main"));
  assert_eq!(changelog.render(), "# Changelog\n");
}

#[test]
fn test_existing_draft_is_left_alone() {
  let mut changelog = Changelog::parse(HISTORY);
  changelog.advance_to_draft(&Version::new(1, 2, 1), "main");
  let once = changelog.render();
  changelog.advance_to_draft(&Version::new(1, 2, 1), "main");

  assert_eq!(changelog.render(), once);
  assert_eq!(once, HISTORY);
}

#[test]
fn test_full_release_cycle() -> Result<()> {
  let mut changelog = Changelog::parse(HISTORY);

  // Ship 1.2.1
  assert!(changelog.freeze(&Version::new(1, 2, 1), parse_date("2026-02-14")?, "main"));
  let shipped = changelog.decompose(&Version::new(1, 2, 1)).unwrap();
  assert_eq!(shipped.label, ReleaseLabel::Released(parse_date("2026-02-14")?));
  assert_eq!(shipped.compare.to, GitRef::Tag(Version::new(1, 2, 1)));
  assert_eq!(shipped.development_warning, None);
  assert_eq!(shipped.changes, "- Add `--dry-run`.");

  // Open 1.2.2
  assert!(changelog.advance_to_draft(&Version::new(1, 2, 1), "main"));
  let draft = changelog.unreleased().unwrap();
  assert_eq!(draft.heading.compare.from, GitRef::Tag(Version::new(1, 2, 1)));
  assert!(draft.heading.compare.to.is_branch("main"));

  let releases: Vec<String> = changelog
    .extract_all_releases()
    .iter()
    .map(|(v, d)| format!("{} {}", v, d))
    .collect();
  assert_eq!(releases, vec!["1.2.1 2026-02-14", "1.2.0 2026-01-03", "1.1.0 2025-11-20"]);

  // Header survives every transition
  assert!(changelog.render().starts_with("# Changelog\n\nNotable changes to this project.\n\n## [1.2.1 (unreleased)]"));
  Ok(())
}

#[test]
fn test_rendering_is_stable_across_parse() {
  let changelog = Changelog::parse(HISTORY);
  let rendered = changelog.render();
  assert_eq!(Changelog::parse(&rendered).render(), rendered);
}

#[test]
fn test_decompose_compose_round_trip() {
  let changelog = Changelog::parse(HISTORY);
  for section in changelog.sections() {
    let elements = VersionElements::from_section(section);
    let text = compose(&elements);
    assert_eq!(VersionElements::decompose(&text), Some(elements));
  }
}

#[test]
fn test_replace_section_keeps_neighbours() -> Result<()> {
  let mut changelog = Changelog::parse(HISTORY);
  let replacement =
    "## [1.2.0 (2026-01-03)](https://github.com/org/repo/compare/v1.1.0...v1.2.0)\n\n- Fix crash on empty input.\n- Faster startup.\n";

  assert!(changelog.replace_section(&Version::new(1, 2, 0), replacement)?);

  let rendered = changelog.render();
  assert!(rendered.contains("- Faster startup."));
  assert!(!rendered.contains("is available on"));
  assert!(rendered.contains("## [1.2.1 (unreleased)]"));
  assert!(rendered.contains("## [1.1.0 (2025-11-20)]"));
  Ok(())
}
