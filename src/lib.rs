//! Keep a hand-curated Markdown changelog in sync with release reality
//!
//! - **changelog**: document model, lifecycle transitions and compare linkage
//! - **reconcile**: drift detection and repair against registry, host and tag records
//! - **core**: configuration, command context and error types

pub mod changelog;
pub mod core;
pub mod reconcile;

pub use crate::core::error::{ChangelogError, ChangelogResult};
pub use changelog::{Changelog, VersionElements, compose};
pub use reconcile::{LintOptions, LintReport, ReleaseSources, lint};
