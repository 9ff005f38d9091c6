//! Reconciliation against external release records
//!
//! The registry, the release host and version-control tags each publish their
//! own view of which versions exist and when they shipped. This module compares
//! a [`Changelog`](crate::changelog::Changelog) against those views and repairs
//! the document when asked.

pub mod lint;
pub mod sources;

pub use lint::{IssueKind, LintIssue, LintOptions, LintReport, Severity, host_release_url, lint};
pub use sources::{HostRelease, RegistryRelease, ReleaseSources, SourceKind, TagRelease, parse_table};
