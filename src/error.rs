use thiserror::Error;

use crate::domain::BumpKind;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: '{version}' cannot be bumped as {bump}")]
    UnparsableVersion { version: String, bump: BumpKind },

    #[error("Provider failure: {0}")]
    Provider(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Output serialization failed: {0}")]
    Output(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a provider error with context
    pub fn provider(msg: impl Into<String>) -> Self {
        ReleaseError::Provider(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        ReleaseError::Template(msg.into())
    }

    /// Create a version error for a version string that cannot be bumped
    pub fn unparsable_version(version: impl Into<String>, bump: BumpKind) -> Self {
        ReleaseError::UnparsableVersion {
            version: version.into(),
            bump,
        }
    }
}
