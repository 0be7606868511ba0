use crate::domain::{CommitAuthor, RawCommit, ReleasePage, ReleasePages, ReleaseRecord};
use crate::error::{ReleaseError, Result};
use crate::git::{HistoryProvider, ReleaseDraft, ReleaseHistory, ReleasePublisher};
use git2::{ObjectType, Oid, Repository as Git2Repo, Sort};
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Number of releases per page when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// Wrapper around git2::Repository implementing the provider traits
pub struct Git2Repository {
    repo: Git2Repo,
    web_url: String,
    page_size: usize,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repo::discover(path).map_err(|e| {
            ReleaseError::provider(format!(
                "Not in a git repository ({}): {}",
                path.display(),
                e
            ))
        })?;
        info!(path = %path.display(), "opened git repository");

        Ok(Git2Repository {
            repo,
            web_url: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Browsable repository root (e.g. `https://github.com/owner/repo`) used for commit permalinks
    pub fn with_web_url(mut self, web_url: impl Into<String>) -> Self {
        self.web_url = web_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set how many releases each listing page holds
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resolve a revision (branch, tag, sha, `HEAD`) to a commit id
    pub fn resolve_commit(&self, revision: &str) -> Result<Oid> {
        self.repo
            .revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|e| ReleaseError::provider(format!("Cannot resolve '{}': {}", revision, e)))
    }

    /// Extract `(owner, repo)` from a GitHub remote URL
    pub fn remote_slug(&self, remote: &str) -> Option<(String, String)> {
        let remote = self.repo.find_remote(remote).ok()?;
        parse_github_slug(remote.url()?)
    }

    fn raw_commit(&self, oid: Oid) -> Result<RawCommit> {
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| ReleaseError::provider(format!("Cannot read commit {}: {}", oid, e)))?;
        let sha = oid.to_string();

        let author = commit
            .author()
            .name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| CommitAuthor {
                login: name.to_string(),
                html_url: format!("https://github.com/{}", name.replace(' ', "")),
            });

        Ok(RawCommit {
            author,
            html_url: format!("{}/commit/{}", self.web_url, sha),
            message: commit.message().unwrap_or("").to_string(),
            sha,
        })
    }

    /// All tags as release records, newest first
    fn tag_releases(&self) -> Result<Vec<ReleaseRecord>> {
        let names = self
            .repo
            .tag_names(None)
            .map_err(|e| ReleaseError::provider(format!("Cannot list tags: {}", e)))?;

        let mut dated: Vec<(i64, String)> = Vec::new();
        for name in names.iter().flatten() {
            match self.tag_time(name) {
                Some(time) => dated.push((time, name.to_string())),
                None => debug!(tag = name, "skipping tag without a commit target"),
            }
        }

        dated.sort_by(|(time_a, name_a), (time_b, name_b)| {
            time_b
                .cmp(time_a)
                .then_with(|| compare_tag_versions(name_b, name_a))
        });

        Ok(dated
            .into_iter()
            .map(|(_, name)| {
                let prerelease = tag_version(&name).is_some_and(|v| !v.pre.is_empty());
                ReleaseRecord::new(name, false, prerelease)
            })
            .collect())
    }

    /// Tagger time for annotated tags, commit time otherwise
    fn tag_time(&self, name: &str) -> Option<i64> {
        let reference = self.repo.find_reference(&format!("refs/tags/{}", name)).ok()?;
        if let Ok(tag) = reference.peel(ObjectType::Tag).and_then(|o| o.peel_to_tag()) {
            if let Some(tagger) = tag.tagger() {
                return Some(tagger.when().seconds());
            }
        }
        let commit = reference.peel_to_commit().ok()?;
        Some(commit.time().seconds())
    }
}

impl HistoryProvider for Git2Repository {
    #[instrument(skip(self))]
    fn compare_range(&self, base: Option<&str>, head: &str) -> Result<Vec<RawCommit>> {
        let head_oid = self.resolve_commit(head)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(head_oid)?;
        if let Some(base) = base {
            revwalk.hide(self.resolve_commit(base)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| ReleaseError::provider(format!("Revision walk failed: {}", e)))?;
            commits.push(self.raw_commit(oid)?);
        }

        debug!(count = commits.len(), "compared range");
        Ok(commits)
    }
}

impl ReleaseHistory for Git2Repository {
    fn release_pages(&self) -> ReleasePages<'_> {
        match self.tag_releases() {
            Ok(records) => {
                let pages: Vec<Result<ReleasePage>> = records
                    .chunks(self.page_size)
                    .map(|chunk| Ok(chunk.to_vec()))
                    .collect();
                Box::new(pages.into_iter())
            }
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }
}

/// Publishes to the local repository: tags HEAD and writes the release description
pub struct LocalPublisher<'a> {
    repo: &'a Git2Repository,
    head: String,
    push_remote: Option<String>,
    output: Option<PathBuf>,
}

impl<'a> LocalPublisher<'a> {
    pub fn new(repo: &'a Git2Repository, head: impl Into<String>) -> Self {
        LocalPublisher {
            repo,
            head: head.into(),
            push_remote: None,
            output: None,
        }
    }

    /// Push created tags to `remote`
    pub fn with_push_remote(mut self, remote: impl Into<String>) -> Self {
        self.push_remote = Some(remote.into());
        self
    }

    /// Write the release description to `path` instead of stdout
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    fn push_tag(&self, remote_name: &str, tag: &str) -> Result<()> {
        let mut remote = self
            .repo
            .repo
            .find_remote(remote_name)
            .map_err(|e| ReleaseError::provider(format!("Cannot find remote '{}': {}", remote_name, e)))?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                    return git2::Cred::userpass_plaintext("x-access-token", &token);
                }
            }
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")) {
                    return Ok(cred);
                }
            }
            git2::Cred::default()
        });
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            ))),
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote
            .push(&[format!("refs/tags/{}", tag).as_str()], Some(&mut push_options))
            .map_err(|e| ReleaseError::provider(format!("Failed to push tag '{}': {}", tag, e)))?;

        info!(tag, remote = remote_name, "pushed tag");
        Ok(())
    }
}

impl ReleasePublisher for LocalPublisher<'_> {
    #[instrument(skip(self))]
    fn create_tag(&self, tag: &str) -> Result<()> {
        let oid = self.repo.resolve_commit(&self.head)?;
        let object = self.repo.repo.find_object(oid, None)?;
        self.repo.repo.tag_lightweight(tag, &object, false)?;
        info!(tag, target = %oid, "created tag");

        if let Some(remote) = &self.push_remote {
            self.push_tag(remote, tag)?;
        }
        Ok(())
    }

    fn publish_release(&self, release: &ReleaseDraft) -> Result<()> {
        match &self.output {
            Some(path) => {
                fs::write(path, &release.body)?;
                info!(path = %path.display(), tag = %release.tag, "wrote release description");
            }
            None => {
                if release.draft {
                    warn!(tag = %release.tag, "draft release printed to stdout");
                }
                println!("{}", release.body);
            }
        }
        Ok(())
    }
}

/// Parse `owner/repo` out of an https or ssh GitHub remote URL
pub fn parse_github_slug(url: &str) -> Option<(String, String)> {
    let re = regex::Regex::new(r"github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?/?$").ok()?;
    let captures = re.captures(url.trim())?;
    Some((
        captures.get(1)?.as_str().to_string(),
        captures.get(2)?.as_str().to_string(),
    ))
}

/// Semantic version part of a tag: after the last `@` for app tags, else without a leading `v`
fn tag_version(tag: &str) -> Option<semver::Version> {
    let version = match tag.rsplit_once('@') {
        Some((_, version)) => version,
        None => tag.strip_prefix('v').unwrap_or(tag),
    };
    semver::Version::parse(version).ok()
}

fn compare_tag_versions(a: &str, b: &str) -> Ordering {
    match (tag_version(a), tag_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}
