//! Analysis engine: commit classification and next-version resolution

pub mod commit_analyzer;
pub mod version_resolver;

pub use commit_analyzer::{AnalyzerSettings, CommitAnalysis, CommitAnalyzer};
pub use version_resolver::{ResolvedVersion, VersionRequest, VersionResolver};
