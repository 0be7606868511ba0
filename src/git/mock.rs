use crate::domain::{RawCommit, ReleasePage, ReleasePages, ReleaseRecord};
use crate::error::{ReleaseError, Result};
use crate::git::{HistoryProvider, ReleaseDraft, ReleaseHistory, ReleasePublisher};
use std::cell::{Cell, RefCell};

/// Mock repository for testing without a real history provider
#[derive(Default)]
pub struct MockRepository {
    commits: Vec<RawCommit>,
    pages: Vec<ReleasePage>,
    failing_page: Option<usize>,
    pages_fetched: Cell<usize>,
    ranges: RefCell<Vec<(Option<String>, String)>>,
    tags: RefCell<Vec<String>>,
    releases: RefCell<Vec<ReleaseDraft>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit returned by every range comparison
    pub fn add_commit(&mut self, commit: RawCommit) {
        self.commits.push(commit);
    }

    /// Append a page of releases
    pub fn add_release_page(&mut self, page: Vec<ReleaseRecord>) {
        self.pages.push(page);
    }

    /// Make the page at `index` fail when fetched
    pub fn fail_page(&mut self, index: usize) {
        self.failing_page = Some(index);
    }

    /// Total number of pages pulled across all walks
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched.get()
    }

    /// Ranges requested through [`HistoryProvider::compare_range`]
    pub fn requested_ranges(&self) -> Vec<(Option<String>, String)> {
        self.ranges.borrow().clone()
    }

    /// Tags created through the publisher
    pub fn created_tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    /// Releases published through the publisher
    pub fn published_releases(&self) -> Vec<ReleaseDraft> {
        self.releases.borrow().clone()
    }
}

impl HistoryProvider for MockRepository {
    fn compare_range(&self, base: Option<&str>, head: &str) -> Result<Vec<RawCommit>> {
        self.ranges
            .borrow_mut()
            .push((base.map(str::to_string), head.to_string()));
        Ok(self.commits.clone())
    }
}

impl ReleaseHistory for MockRepository {
    fn release_pages(&self) -> ReleasePages<'_> {
        Box::new(self.pages.iter().enumerate().map(move |(index, page)| {
            self.pages_fetched.set(self.pages_fetched.get() + 1);
            if self.failing_page == Some(index) {
                return Err(ReleaseError::provider(format!(
                    "release page {} unavailable",
                    index + 1
                )));
            }
            Ok(page.clone())
        }))
    }
}

impl ReleasePublisher for MockRepository {
    fn create_tag(&self, tag: &str) -> Result<()> {
        self.tags.borrow_mut().push(tag.to_string());
        Ok(())
    }

    fn publish_release(&self, release: &ReleaseDraft) -> Result<()> {
        self.releases.borrow_mut().push(release.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_commits() {
        let mut repo = MockRepository::new();
        repo.add_commit(RawCommit::new("abc123", "feat: one", "u", None));

        let commits = repo.compare_range(Some("v1.0.0"), "HEAD").unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(
            repo.requested_ranges(),
            vec![(Some("v1.0.0".to_string()), "HEAD".to_string())]
        );
    }

    #[test]
    fn test_mock_release_pages_are_restartable() {
        let mut repo = MockRepository::new();
        repo.add_release_page(vec![ReleaseRecord::new("v1.0.0", false, false)]);
        repo.add_release_page(vec![ReleaseRecord::new("v0.9.0", false, false)]);

        assert_eq!(repo.release_pages().count(), 2);
        let first = repo.release_pages().next().unwrap().unwrap();
        assert_eq!(first[0].tag_name, "v1.0.0");
        assert_eq!(repo.pages_fetched(), 3);
    }

    #[test]
    fn test_mock_failing_page() {
        let mut repo = MockRepository::new();
        repo.add_release_page(vec![]);
        repo.add_release_page(vec![]);
        repo.fail_page(1);

        let results: Vec<_> = repo.release_pages().collect();
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_mock_publisher_records() {
        let repo = MockRepository::default();
        repo.create_tag("v1.0.0").unwrap();
        repo.publish_release(&ReleaseDraft {
            tag: "v1.0.0".to_string(),
            name: "1.0.0".to_string(),
            body: "body".to_string(),
            draft: true,
            prerelease: false,
        })
        .unwrap();
        assert_eq!(repo.created_tags(), vec!["v1.0.0"]);
        assert_eq!(repo.published_releases().len(), 1);
    }
}
