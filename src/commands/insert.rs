//! Insert command implementation

use changelog_rail::changelog::{parse_date, parse_version};
use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::ChangelogResult;
use std::collections::BTreeSet;

/// Run the insert command
pub fn run_insert(ctx: &ChangelogContext, version: &str, date: &str) -> ChangelogResult<()> {
  let version = parse_version(version)?;
  let date = parse_date(date)?;

  let mut changelog = ctx.load_changelog()?;
  let repo_url = ctx.repo_url(&changelog)?;

  // The document's own releases are the only known versions here
  if !changelog.insert_orphan_section(&version, date, &repo_url, &BTreeSet::new()) {
    println!("✅ Nothing to do: {} already has a section", version);
    return Ok(());
  }

  ctx.write_changelog(&changelog)?;
  println!("➕ Inserted {} ({})", version, date);
  if let Some(elements) = changelog.decompose_released(&version) {
    println!("   Compare: {}", elements.compare.url());
  }
  Ok(())
}
