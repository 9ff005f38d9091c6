//! CLI commands for changelog-rail
//!
//! ## Release lifecycle
//! - **draft**: open the unreleased section for the next version
//! - **freeze**: date the unreleased section and pin its compare range
//!
//! ## Inspection
//! - **show**: one section, decomposed into its parts
//! - **releases**: every released version with its date
//!
//! ## Repair
//! - **insert**: add a section for a release the changelog is missing
//! - **lint**: reconcile against registry, release host and tag records
//!
//! All commands accept `&ChangelogContext` so config and paths are resolved once.

pub mod draft;
pub mod freeze;
pub mod insert;
pub mod lint;
pub mod releases;
pub mod show;

pub use draft::run_draft;
pub use freeze::run_freeze;
pub use insert::run_insert;
pub use lint::{LintArgs, run_lint};
pub use releases::run_releases;
pub use show::run_show;
