use crate::analyzer::{CommitAnalysis, ResolvedVersion};
use crate::domain::BumpKind;
use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the user but never abort the run.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The compared range holds no commits
    NoCommitsInRange { base: Option<String>, head: String },
    /// No tag exists under the prefix, the baseline version is used
    NoPriorTag { tag_prefix: String, baseline: String },
    /// No published release exists under the prefix, the whole history is analyzed
    NoPublishedRelease { tag_prefix: String },
    /// Bump protection replaced the requested bump
    BumpDowngraded {
        requested: BumpKind,
        effective: BumpKind,
    },
    /// Commits exist but none made it into the changelog
    EmptyChangelog { commits: usize },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoCommitsInRange { base, head } => match base {
                Some(base) => write!(f, "No commits between '{}' and '{}'", base, head),
                None => write!(f, "No commits reachable from '{}'", head),
            },
            BoundaryWarning::NoPriorTag {
                tag_prefix,
                baseline,
            } => write!(
                f,
                "No tag starting with '{}' found, starting from {}",
                tag_prefix, baseline
            ),
            BoundaryWarning::NoPublishedRelease { tag_prefix } => write!(
                f,
                "No published release starting with '{}', analyzing the whole history",
                tag_prefix
            ),
            BoundaryWarning::BumpDowngraded {
                requested,
                effective,
            } => write!(
                f,
                "Bump protection: {} bump already released, applying {} instead",
                requested, effective
            ),
            BoundaryWarning::EmptyChangelog { commits } => write!(
                f,
                "None of the {} commit(s) matched the changelog filters",
                commits
            ),
        }
    }
}

/// Collect the warnings raised by the analysis of a range
pub fn analysis_warnings(
    analysis: &CommitAnalysis,
    base: Option<&str>,
    head: &str,
) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();
    if analysis.raw_count == 0 {
        warnings.push(BoundaryWarning::NoCommitsInRange {
            base: base.map(str::to_string),
            head: head.to_string(),
        });
    } else if analysis.changelog.changes.is_empty() {
        warnings.push(BoundaryWarning::EmptyChangelog {
            commits: analysis.raw_count,
        });
    }
    warnings
}

/// Collect the warnings raised by a version resolution
pub fn version_warnings(resolved: &ResolvedVersion, tag_prefix: &str) -> Vec<BoundaryWarning> {
    let mut warnings = Vec::new();
    if resolved.previous_tag.is_none() {
        warnings.push(BoundaryWarning::NoPriorTag {
            tag_prefix: tag_prefix.to_string(),
            baseline: resolved.previous_version.clone(),
        });
    }
    if resolved.was_downgraded() {
        warnings.push(BoundaryWarning::BumpDowngraded {
            requested: resolved.requested,
            effective: resolved.release_type,
        });
    }
    warnings
}
