//! Bump kinds and the semantic-version increment rules, including `rc.N` pre-releases.

use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use std::fmt;
use std::str::FromStr;

/// Identifier used for release-candidate pre-releases (e.g. `1.2.1-rc.0`)
pub const RELEASE_CANDIDATE_ID: &str = "rc";

/// Version baseline used when no tag exists under the prefix
pub const BASELINE_VERSION: &str = "0.0.0";

/// Kind of version bump to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpKind {
    Major,
    Minor,
    #[default]
    Patch,
    Prerelease,
}

impl BumpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::Prerelease => "prerelease",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpKind {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            "prerelease" => Ok(BumpKind::Prerelease),
            other => Err(ReleaseError::config(format!(
                "Unknown bump kind: '{}'",
                other
            ))),
        }
    }
}

/// Parse a version string, reporting the requested bump kind on failure.
pub fn parse_version(version: &str, bump: BumpKind) -> Result<Version> {
    Version::parse(version.trim()).map_err(|_| ReleaseError::unparsable_version(version, bump))
}

/// Increment a version according to the bump kind.
///
/// Follows the usual semantic-version increment rules:
/// - **Major**: `1.2.3` -> `2.0.0`, while `2.0.0-rc.1` -> `2.0.0`
/// - **Minor**: `1.2.3` -> `1.3.0`, while `1.3.0-rc.1` -> `1.3.0`
/// - **Patch**: `1.2.3` -> `1.2.4`, while `1.2.4-rc.1` -> `1.2.4`
/// - **Prerelease**: `1.2.0` -> `1.2.1-rc.0`, `1.2.1-rc.0` -> `1.2.1-rc.1`
///
/// Build metadata is always dropped.
pub fn increment(version: &Version, bump: BumpKind) -> Result<Version> {
    let mut next = version.clone();
    next.build = BuildMetadata::EMPTY;
    let was_prerelease = !version.pre.is_empty();

    match bump {
        BumpKind::Major => {
            if !(was_prerelease && version.minor == 0 && version.patch == 0) {
                next.major += 1;
            }
            next.minor = 0;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Minor => {
            if !(was_prerelease && version.patch == 0) {
                next.minor += 1;
            }
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Patch => {
            if !was_prerelease {
                next.patch += 1;
            }
            next.pre = Prerelease::EMPTY;
        }
        BumpKind::Prerelease => {
            let identifiers = if was_prerelease {
                next_candidate(version.pre.as_str())
            } else {
                next.patch += 1;
                format!("{}.0", RELEASE_CANDIDATE_ID)
            };
            next.pre = Prerelease::new(&identifiers)
                .map_err(|_| ReleaseError::unparsable_version(version.to_string(), bump))?;
        }
    }

    Ok(next)
}

/// Advance an existing pre-release string to the next release candidate.
fn next_candidate(pre: &str) -> String {
    let mut parts: Vec<String> = pre.split('.').map(str::to_string).collect();

    if parts.first().map(String::as_str) != Some(RELEASE_CANDIDATE_ID) {
        return format!("{}.0", RELEASE_CANDIDATE_ID);
    }

    match parts.iter().rposition(|p| p.parse::<u64>().is_ok()) {
        Some(idx) => {
            let counter = parts[idx].parse::<u64>().unwrap_or(0);
            parts[idx] = (counter + 1).to_string();
        }
        None => parts.push("0".to_string()),
    }

    parts.join(".")
}
