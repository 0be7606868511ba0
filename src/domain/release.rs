use crate::error::Result;

/// Release record as listed by the history provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub tag_name: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseRecord {
    pub fn new(tag_name: impl Into<String>, draft: bool, prerelease: bool) -> Self {
        ReleaseRecord {
            tag_name: tag_name.into(),
            draft,
            prerelease,
        }
    }

    /// Published releases are neither drafts nor pre-releases.
    pub fn is_published(&self) -> bool {
        !self.draft && !self.prerelease
    }

    pub fn has_prefix(&self, tag_prefix: &str) -> bool {
        self.tag_name.starts_with(tag_prefix)
    }
}

/// One page of the release listing
pub type ReleasePage = Vec<ReleaseRecord>;

/// Lazy sequence of release pages in provider order
pub type ReleasePages<'a> = Box<dyn Iterator<Item = Result<ReleasePage>> + 'a>;

/// Return the first release, walking pages in the order given, that satisfies `predicate`.
///
/// Stops pulling pages as soon as a match is found; when nothing matches every page is
/// consumed before returning `None`. A failing page aborts the walk.
pub fn find_first_release<I, P>(pages: I, mut predicate: P) -> Result<Option<ReleaseRecord>>
where
    I: IntoIterator<Item = Result<ReleasePage>>,
    P: FnMut(&ReleaseRecord) -> bool,
{
    for page in pages {
        if let Some(release) = page?.into_iter().find(|release| predicate(release)) {
            return Ok(Some(release));
        }
    }
    Ok(None)
}
