//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const REPO: &str = "https://github.com/org/repo";

/// A scratch project directory holding a changelog and optional config
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Create an empty project
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    Ok(Self { _root: root, path })
  }

  /// Create a project with a changelog.toml pointing at REPO
  pub fn with_config(extra: &str) -> Result<Self> {
    let project = Self::new()?;
    project.write_file(
      "changelog.toml",
      &format!(
        "[project]\npackage = \"pkg\"\nrepository = \"{}\"\n{}",
        REPO, extra
      ),
    )?;
    Ok(project)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&full, content).with_context(|| format!("Failed to write {}", full.display()))?;
    Ok(())
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  pub fn changelog(&self) -> Result<String> {
    self.read_file("CHANGELOG.md")
  }
}

/// Run changelog-rail and return its output, whatever the exit status
pub fn run_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  Command::new(env!("CARGO_BIN_EXE_changelog-rail"))
    .current_dir(cwd)
    .env_remove("RUST_LOG")
    .args(args)
    .output()
    .context("Failed to run changelog-rail")
}

/// Run changelog-rail and require success
pub fn run_changelog_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "changelog-rail command failed: changelog-rail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}
