use crate::changelog::{Changelog, ChangelogRenderer};
use crate::domain::commit::expand;
use crate::domain::{BumpKind, CategorizedCommits, Classification, RawCommit, ReferenceExtractor, ReferenceSet};
use crate::error::Result;
use crate::git::HistoryProvider;
use tracing::{debug, info, instrument};

/// Settings for commit analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerSettings {
    pub task_prefix: String,
    /// When set, only commits containing `(<scope>):` are kept
    pub scope: Option<String>,
}

/// Everything derived from one pass over the raw commits of a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAnalysis {
    pub commits: CategorizedCommits,
    pub references: ReferenceSet,
    pub changelog: Changelog,
    /// Number of raw commits in the range
    pub raw_count: usize,
}

impl CommitAnalysis {
    /// Bump implied by the commits: major marker, then any feature, else patch.
    pub fn next_bump(&self) -> BumpKind {
        if self.references.implies_major_bump {
            BumpKind::Major
        } else if self.commits.has_features() {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }
}

/// Classifies raw commits and collects their references
pub struct CommitAnalyzer {
    settings: AnalyzerSettings,
    extractor: ReferenceExtractor,
    renderer: ChangelogRenderer,
}

impl CommitAnalyzer {
    pub fn new(settings: AnalyzerSettings) -> Result<Self> {
        let extractor = ReferenceExtractor::new(&settings.task_prefix)?;
        Ok(CommitAnalyzer {
            settings,
            extractor,
            renderer: ChangelogRenderer::new()?,
        })
    }

    /// Fetch the commits of `base..head` from the provider and analyze them
    #[instrument(skip(self, provider))]
    pub fn analyze_range<P: HistoryProvider + ?Sized>(
        &self,
        provider: &P,
        base: Option<&str>,
        head: &str,
    ) -> Result<CommitAnalysis> {
        let commits = provider.compare_range(base, head)?;
        info!(count = commits.len(), "fetched commits in range");
        Ok(self.analyze(&commits))
    }

    /// Analyze already fetched raw commits.
    ///
    /// References are extracted once per raw commit over its whole message, while
    /// classification runs per logical commit after squash expansion.
    pub fn analyze(&self, raw_commits: &[RawCommit]) -> CommitAnalysis {
        let mut commits = CategorizedCommits::new(self.settings.scope.clone());
        let mut references = ReferenceSet::default();

        for raw in raw_commits {
            self.extractor.scan(&raw.message, &mut references);

            for logical in expand(raw) {
                let outcome = commits.classify(logical);
                if outcome == Classification::Skipped {
                    debug!(sha = %raw.sha, "commit filtered out by scope");
                }
            }
        }

        let changelog = self.renderer.render(&commits);

        CommitAnalysis {
            commits,
            references,
            changelog,
            raw_count: raw_commits.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommitAuthor;

    const SHA: &str = "62ec8ea713fdf14e4abaef3d7d5138194dec49ce";

    fn raw(message: &str) -> RawCommit {
        RawCommit::new(
            SHA,
            message,
            "https://commiturl",
            Some(CommitAuthor {
                login: "darioblanco".to_string(),
                html_url: "https://authorurl".to_string(),
            }),
        )
    }

    fn analyzer(scope: Option<&str>) -> CommitAnalyzer {
        CommitAnalyzer::new(AnalyzerSettings {
            task_prefix: "JIRA-".to_string(),
            scope: scope.map(str::to_string),
        })
        .unwrap()
    }

    fn every_category() -> Vec<RawCommit> {
        [
            "feat:super feature",
            "fix: My fix",
            "perf: set additional performance steps",
            "docs(context): document everything",
            "style: awesome style",
            "refactor(context): one does not simply refactor",
            "test: Tests are good",
            "chore: somebody has to keep things going",
            "build: like chore but fancier",
            "ci: ok this is a CI change",
            "uncategorized commit",
        ]
        .iter()
        .map(|m| raw(m))
        .collect()
    }

    const SQUASH: &str = "[JIRA-2772] Title of my PR (#1716)\n\n\
* feat(auth): set login endpoint controller\n\n\
* test(auth): add integration test for login endpoint\n\n\
* fix(auth): set secure and http only options\n\n\
* perf(auth): add additional fake performance\n\n\
This is the body of the previous commit\n\n\
And this is the footer\n\n\
* (auth): Set values for staging and production\n\n\
* Address comment from PR\n\n\
This is the body of the previous commit\n\n\
* feat(auth): set expiration of the cookie to the amount of time of the token\n\n\
* fix(auth): remove joi validation since it does not accept localhost";

    #[test]
    fn test_every_category() {
        let analysis = analyzer(None).analyze(&every_category());
        assert_eq!(analysis.changelog.changes.len(), 11);
        assert_eq!(analysis.commits.uncategorized().len(), 1);
        assert!(analysis.references.tasks.is_empty());
        assert!(analysis.references.pull_requests.is_empty());
        assert_eq!(analysis.next_bump(), BumpKind::Minor);
        assert!(analysis
            .changelog
            .markdown
            .starts_with("- Uncategorized commit - [62ec8ea7]"));
    }

    #[test]
    fn test_required_scope() {
        let analysis = analyzer(Some("context")).analyze(&every_category());
        assert_eq!(analysis.changelog.changes, vec![SHA, SHA]);
        assert_eq!(analysis.next_bump(), BumpKind::Patch);
        let expected = "**:books: Documentation**\n\
- Document everything - [62ec8ea7](https://commiturl)([@darioblanco](https://authorurl))\n\
\n\
**:mountain: Refactors**\n\
- One does not simply refactor - [62ec8ea7](https://commiturl)([@darioblanco](https://authorurl))";
        assert_eq!(analysis.changelog.markdown, expected);
    }

    #[test]
    fn test_squash_with_scope_prs_and_tasks() {
        let analysis = analyzer(Some("auth")).analyze(&[raw(SQUASH)]);

        // Eight entries follow the title; "Address comment from PR" lacks the scope.
        assert_eq!(analysis.changelog.changes.len(), 7);
        assert!(analysis.changelog.changes.iter().all(|c| c == SHA));
        assert_eq!(analysis.references.tasks, vec!["JIRA-2772"]);
        assert_eq!(analysis.references.pull_requests, vec!["1716"]);
        assert_eq!(analysis.next_bump(), BumpKind::Minor);
        assert!(!analysis.changelog.markdown.contains("Title of my PR"));
        assert!(analysis
            .changelog
            .markdown
            .starts_with("- Set values for staging and production"));
    }

    #[test]
    fn test_squash_without_scope() {
        let message = "Title of my PR\n\n\
* set login endpoint controller\n\n\
* add integration test for login endpoint\n\n";
        let analysis = analyzer(None).analyze(&[raw(message)]);
        assert_eq!(analysis.changelog.changes, vec![SHA, SHA]);
        assert_eq!(analysis.commits.uncategorized().len(), 2);
        assert_eq!(
            analysis.changelog.markdown,
            "- Set login endpoint controller - [62ec8ea7](https://commiturl)([@darioblanco](https://authorurl))\n\
- Add integration test for login endpoint - [62ec8ea7](https://commiturl)([@darioblanco](https://authorurl))"
        );
    }

    #[test]
    fn test_references_counted_once_per_raw_commit() {
        // The PR appears once in the raw message though it expands to two commits.
        let message = "Merge stuff (#9)\n* feat: a\n* fix: b";
        let analysis = analyzer(None).analyze(&[raw(message)]);
        assert_eq!(analysis.references.pull_requests, vec!["9"]);
        assert_eq!(analysis.changelog.changes.len(), 2);
    }

    #[test]
    fn test_major_marker_found_in_any_commit() {
        let commits = vec![
            raw("feat: breaking api #MAJOR"),
            raw("fix: small thing"),
            raw("docs: more docs"),
        ];
        let analysis = analyzer(None).analyze(&commits);
        assert!(analysis.references.implies_major_bump);
        assert_eq!(analysis.next_bump(), BumpKind::Major);
    }

    #[test]
    fn test_major_marker_in_last_commit() {
        let commits = vec![raw("fix: small thing"), raw("chore: cleanup #MAJOR")];
        assert_eq!(analyzer(None).analyze(&commits).next_bump(), BumpKind::Major);
    }

    #[test]
    fn test_no_commits() {
        let analysis = analyzer(None).analyze(&[]);
        assert_eq!(analysis.changelog.markdown, "");
        assert_eq!(analysis.raw_count, 0);
        assert_eq!(analysis.next_bump(), BumpKind::Patch);
    }

    #[test]
    fn test_separate_analyses_do_not_share_state() {
        let analyzer = analyzer(None);
        let first = analyzer.analyze(&[raw("feat: one (#1) JIRA-1")]);
        let second = analyzer.analyze(&[raw("fix: two")]);
        assert_eq!(first.references.pull_requests, vec!["1"]);
        assert!(second.references.pull_requests.is_empty());
        assert!(second.references.tasks.is_empty());
        assert_eq!(second.changelog.changes.len(), 1);
    }
}
