//! Source-control collaborators
//!
//! The release engine only talks to history and publishing through the traits in
//! this module, so it can run against a real repository or a scripted one.
//!
//! - [HistoryProvider]: commit ranges
//! - [ReleaseHistory]: paginated release listing
//! - [ReleasePublisher]: tag creation and release publication
//!
//! The concrete implementations are:
//!
//! - [repository::Git2Repository] and [repository::LocalPublisher], backed by the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! ```rust
//! # use git_release::git::{HistoryProvider, ReleaseHistory};
//! # use git_release::domain::find_first_release;
//! # fn example<R: HistoryProvider + ReleaseHistory>(repo: &R) -> git_release::Result<()> {
//! let commits = repo.compare_range(Some("v1.0.0"), "HEAD")?;
//! let latest = find_first_release(repo.release_pages(), |r| r.has_prefix("v"))?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::{Git2Repository, LocalPublisher};

use crate::domain::{RawCommit, ReleasePages};
use crate::error::Result;

/// Fetches commit ranges from the source-control host
pub trait HistoryProvider {
    /// Commits reachable from `head` but not from `base`, oldest first.
    ///
    /// `base = None` returns every commit reachable from `head`.
    fn compare_range(&self, base: Option<&str>, head: &str) -> Result<Vec<RawCommit>>;
}

/// Lists releases, newest first, one page at a time
pub trait ReleaseHistory {
    /// Start a fresh walk over the release pages.
    ///
    /// Pages are produced lazily and in provider order; every call restarts
    /// from the first page.
    fn release_pages(&self) -> ReleasePages<'_>;
}

/// A release ready to be published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDraft {
    pub tag: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// Publishes tags and releases
pub trait ReleasePublisher {
    /// Create `tag` on the released revision.
    fn create_tag(&self, tag: &str) -> Result<()>;

    /// Publish the release description.
    fn publish_release(&self, release: &ReleaseDraft) -> Result<()>;
}
