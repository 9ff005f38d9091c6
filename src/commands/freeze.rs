//! Freeze command implementation

use changelog_rail::changelog::parse_date;
use changelog_rail::core::context::ChangelogContext;
use changelog_rail::core::error::ChangelogResult;

/// Run the freeze command
pub fn run_freeze(
  ctx: &ChangelogContext,
  version: Option<String>,
  date: Option<String>,
  branch: Option<String>,
) -> ChangelogResult<()> {
  let current = ctx.version_or_current(version.as_deref())?;
  let date = match date {
    Some(date) => parse_date(&date)?,
    None => chrono::Local::now().date_naive(),
  };
  let branch = branch.unwrap_or_else(|| ctx.project().default_branch);

  let mut changelog = ctx.load_changelog()?;
  if !changelog.freeze(&current, date, &branch) {
    println!("✅ Nothing to do: no unreleased section to freeze");
    return Ok(());
  }

  ctx.write_changelog(&changelog)?;
  println!("🔒 Froze {} as released on {}", current, date);
  println!("   File: {}", ctx.changelog_path.display());
  Ok(())
}
