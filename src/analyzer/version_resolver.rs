use crate::domain::release::find_first_release;
use crate::domain::version::{increment, parse_version, BASELINE_VERSION};
use crate::domain::BumpKind;
use crate::error::Result;
use crate::git::ReleaseHistory;
use semver::Version;
use tracing::{debug, info, instrument, warn};

/// Inputs of one version resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionRequest {
    pub tag_prefix: String,
    pub requested: BumpKind,
    /// Most recent published tag under the prefix, when known
    pub published_tag: Option<String>,
    pub bump_protection: bool,
}

/// Outcome of a version resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Most recent tag under the prefix, regardless of publication state
    pub previous_tag: Option<String>,
    pub previous_version: String,
    pub new_tag: String,
    pub new_version: String,
    /// Bump actually applied after protection
    pub release_type: BumpKind,
    pub requested: BumpKind,
}

impl ResolvedVersion {
    pub fn was_downgraded(&self) -> bool {
        self.requested != self.release_type
    }
}

/// Resolves the next version from the release history
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionResolver;

impl VersionResolver {
    pub fn new() -> Self {
        VersionResolver
    }

    /// Most recent published (non-draft, non-prerelease) release tag under `tag_prefix`.
    ///
    /// Every page is walked before concluding there is none.
    #[instrument(skip(self, history))]
    pub fn retrieve_last_released_version<H: ReleaseHistory + ?Sized>(
        &self,
        history: &H,
        tag_prefix: &str,
    ) -> Result<Option<String>> {
        let release = find_first_release(history.release_pages(), |release| {
            release.is_published() && release.has_prefix(tag_prefix)
        })?;

        let tag = release.map(|r| r.tag_name);
        debug!(tag = ?tag, "last released version");
        Ok(tag)
    }

    /// First tag under `tag_prefix` in provider order, published or not
    pub fn retrieve_last_tag<H: ReleaseHistory + ?Sized>(
        &self,
        history: &H,
        tag_prefix: &str,
    ) -> Result<Option<String>> {
        let release = find_first_release(history.release_pages(), |release| {
            release.has_prefix(tag_prefix)
        })?;
        Ok(release.map(|r| r.tag_name))
    }

    /// Compute the next tag for `request`
    #[instrument(skip(self, history), fields(prefix = %request.tag_prefix, requested = %request.requested))]
    pub fn resolve<H: ReleaseHistory + ?Sized>(
        &self,
        history: &H,
        request: &VersionRequest,
    ) -> Result<ResolvedVersion> {
        let previous_tag = self.retrieve_last_tag(history, &request.tag_prefix)?;
        let previous_version = previous_tag
            .as_deref()
            .map(|tag| strip_prefix(tag, &request.tag_prefix).to_string())
            .unwrap_or_else(|| BASELINE_VERSION.to_string());

        let last = parse_version(&previous_version, request.requested)?;
        let release_type = self.effective_bump(&last, request);
        let next = increment(&last, release_type)?;

        let new_version = next.to_string();
        let new_tag = format!("{}{}", request.tag_prefix, new_version);
        info!(
            previous = %previous_version,
            next = %new_version,
            release_type = %release_type,
            "resolved version"
        );

        Ok(ResolvedVersion {
            previous_tag,
            previous_version,
            new_tag,
            new_version,
            release_type,
            requested: request.requested,
        })
    }

    /// Apply bump protection to the requested kind
    fn effective_bump(&self, last: &Version, request: &VersionRequest) -> BumpKind {
        let requested = request.requested;
        if requested == BumpKind::Prerelease || !request.bump_protection {
            return requested;
        }

        let published = match request.published_tag.as_deref() {
            Some(tag) => strip_prefix(tag, &request.tag_prefix),
            None => return requested,
        };
        let published = match Version::parse(published) {
            Ok(version) => version,
            Err(e) => {
                warn!(published, error = %e, "published version not parsable, bump protection skipped");
                return requested;
            }
        };

        let already_bumped = match requested {
            BumpKind::Major => last.major != published.major,
            BumpKind::Minor => last.major != published.major || last.minor != published.minor,
            BumpKind::Patch | BumpKind::Prerelease => false,
        };

        if already_bumped {
            info!(
                %requested,
                last = %last,
                published = %published,
                "bump already consumed since last published release, downgrading to patch"
            );
            BumpKind::Patch
        } else {
            requested
        }
    }
}

/// Tag with `prefix` removed; tags without the prefix are returned unchanged
pub fn strip_prefix<'a>(tag: &'a str, prefix: &str) -> &'a str {
    tag.strip_prefix(prefix).unwrap_or(tag)
}
