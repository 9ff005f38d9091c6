//! Releases command implementation

use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::ChangelogResult;
use serde::Serialize;

#[derive(Serialize)]
struct ReleaseEntry {
  version: String,
  date: String,
}

/// Run the releases command
pub fn run_releases(ctx: &ChangelogContext, json: bool) -> ChangelogResult<()> {
  let changelog = ctx.load_changelog()?;
  let releases: Vec<ReleaseEntry> = changelog
    .extract_all_releases()
    .into_iter()
    .map(|(version, date)| ReleaseEntry {
      version: version.to_string(),
      date: date.to_string(),
    })
    .collect();

  if json {
    println!("{}", serde_json::to_string_pretty(&releases)?);
    return Ok(());
  }

  if releases.is_empty() {
    println!("⚠️  No released versions in {}", ctx.changelog_path.display());
    return Ok(());
  }

  println!("📦 {} release(s)", releases.len());
  println!();
  for release in &releases {
    println!("  {:<16} {}", release.version, release.date);
  }
  if let Some(draft) = changelog.unreleased() {
    println!();
    println!("🚧 In development: {}", draft.heading.version);
  }
  Ok(())
}
