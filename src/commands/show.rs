//! Show command implementation

use changelog_rail::changelog::{ReleaseLabel, parse_version};
use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::{ChangelogError, ChangelogResult};
use serde::Serialize;

/// JSON view of a decomposed section
#[derive(Serialize)]
struct SectionView {
  version: String,
  /// ISO date, or null while unreleased
  date: Option<String>,
  compare_from: String,
  compare_to: String,
  compare_url: String,
  development_warning: Option<String>,
  availability_note: Option<String>,
  yanked_notice: Option<String>,
  changes: String,
}

/// Run the show command
pub fn run_show(ctx: &ChangelogContext, version: &str, json: bool) -> ChangelogResult<()> {
  let version = parse_version(version)?;
  let changelog = ctx.load_changelog()?;
  let elements = changelog.decompose(&version).ok_or_else(|| {
    ChangelogError::with_help(
      format!("No section for version {} in {}", version, ctx.changelog_path.display()),
      "Run `changelog-rail releases` to list the versions the changelog knows about",
    )
  })?;

  if json {
    let view = SectionView {
      version: elements.version.to_string(),
      date: elements.label.date().map(|d| d.to_string()),
      compare_from: elements.compare.from.to_string(),
      compare_to: elements.compare.to.to_string(),
      compare_url: elements.compare.url(),
      development_warning: elements.development_warning.clone(),
      availability_note: elements.availability_note.clone(),
      yanked_notice: elements.yanked_notice.clone(),
      changes: elements.changes.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    return Ok(());
  }

  match elements.label {
    ReleaseLabel::Unreleased => println!("🚧 {} (unreleased)", elements.version),
    ReleaseLabel::Released(date) => println!("📦 {} (released {})", elements.version, date),
  }
  println!("   Compare: {}", elements.compare.url());
  println!();

  let notices = [
    ("Development warning", &elements.development_warning),
    ("Availability", &elements.availability_note),
    ("Yanked", &elements.yanked_notice),
  ];
  for (title, notice) in notices {
    if let Some(text) = notice {
      println!("  {}:", title);
      for line in text.lines() {
        println!("    {}", line);
      }
      println!();
    }
  }

  if elements.changes.is_empty() {
    println!("  (no changes recorded)");
  } else {
    println!("  Changes:");
    for line in elements.changes.lines() {
      println!("    {}", line);
    }
  }
  Ok(())
}
