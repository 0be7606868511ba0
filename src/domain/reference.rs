//! Pull-request, task and major-marker references found in raw commit messages.

use crate::error::Result;
use regex::Regex;

/// Default prefix of external task identifiers
pub const DEFAULT_TASK_PREFIX: &str = "JIRA-";

/// References aggregated over every raw commit of a range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    /// De-duplicated, in first-seen order
    pub tasks: Vec<String>,
    /// Duplicates are kept
    pub pull_requests: Vec<String>,
    pub implies_major_bump: bool,
}

impl ReferenceSet {
    fn add_task(&mut self, task: &str) {
        if !self.tasks.iter().any(|t| t == task) {
            self.tasks.push(task.to_string());
        }
    }

    /// Render task references as `[TASK](<base>/TASK)` joined by `", "`.
    pub fn tasks_markdown(&self, task_base_url: &str) -> String {
        let base = task_base_url.trim_end_matches('/');
        self.tasks
            .iter()
            .map(|task| format!("[{}]({}/{})", task, base, task))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render pull-request references as GitHub links joined by `", "`.
    pub fn pull_requests_markdown(&self, owner: &str, repo: &str) -> String {
        self.pull_requests
            .iter()
            .map(|pr| format!("[#{}](https://github.com/{}/{}/pull/{})", pr, owner, repo, pr))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Default task tracker location for an owner (`https://<owner>.atlassian.net/browse`)
pub fn default_task_base_url(owner: &str) -> String {
    format!("https://{}.atlassian.net/browse", owner)
}

/// Scans raw commit messages for references
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    pull_request: Regex,
    task: Regex,
    major_marker: Regex,
}

impl ReferenceExtractor {
    /// Create an extractor for task identifiers of the form `<task_prefix><digits>`.
    pub fn new(task_prefix: &str) -> Result<Self> {
        Ok(ReferenceExtractor {
            pull_request: Regex::new(r"\(#(\d+)\)")?,
            task: Regex::new(&format!(r"(?i){}\d+", regex::escape(task_prefix)))?,
            major_marker: Regex::new(r"(?imR)#MAJOR$")?,
        })
    }

    /// Scan one raw message and merge what it references into `references`.
    pub fn scan(&self, message: &str, references: &mut ReferenceSet) {
        for captures in self.pull_request.captures_iter(message) {
            if let Some(number) = captures.get(1) {
                references.pull_requests.push(number.as_str().to_string());
            }
        }

        for task in self.task.find_iter(message) {
            references.add_task(task.as_str());
        }

        if self.major_marker.is_match(message) {
            references.implies_major_bump = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(messages: &[&str]) -> ReferenceSet {
        let extractor = ReferenceExtractor::new(DEFAULT_TASK_PREFIX).unwrap();
        let mut references = ReferenceSet::default();
        for message in messages {
            extractor.scan(message, &mut references);
        }
        references
    }

    #[test]
    fn test_pull_request_reference() {
        let refs = scan_all(&["[JIRA-2772] Title of my PR (#1716)"]);
        assert_eq!(refs.pull_requests, vec!["1716"]);
    }

    #[test]
    fn test_bare_hash_is_not_a_pull_request() {
        let refs = scan_all(&["fix #12 without parentheses"]);
        assert!(refs.pull_requests.is_empty());
    }

    #[test]
    fn test_pull_requests_keep_duplicates() {
        let refs = scan_all(&["feat: a (#5)", "fix: b (#5)"]);
        assert_eq!(refs.pull_requests, vec!["5", "5"]);
    }

    #[test]
    fn test_tasks_are_deduplicated_in_order() {
        let refs = scan_all(&["JIRA-2 then JIRA-1", "again JIRA-2 and JIRA-3"]);
        assert_eq!(refs.tasks, vec!["JIRA-2", "JIRA-1", "JIRA-3"]);
    }

    #[test]
    fn test_task_prefix_is_case_insensitive() {
        let refs = scan_all(&["fixes jira-42"]);
        assert_eq!(refs.tasks, vec!["jira-42"]);
    }

    #[test]
    fn test_task_prefix_is_literal() {
        let extractor = ReferenceExtractor::new("T.").unwrap();
        let mut refs = ReferenceSet::default();
        extractor.scan("T.12 and TX12", &mut refs);
        assert_eq!(refs.tasks, vec!["T.12"]);
    }

    #[test]
    fn test_major_marker_at_end_of_line() {
        assert!(scan_all(&["feat: new api #MAJOR"]).implies_major_bump);
        assert!(scan_all(&["feat: new api #major\n\nbody"]).implies_major_bump);
        assert!(!scan_all(&["feat: #MAJOR is not last"]).implies_major_bump);
    }

    #[test]
    fn test_major_marker_before_crlf_line_ending() {
        assert!(scan_all(&["feat: new api #MAJOR\r\n\r\nbody"]).implies_major_bump);
        assert!(scan_all(&["feat: new api\r\n#MAJOR\r\n"]).implies_major_bump);
    }

    #[test]
    fn test_major_marker_in_any_commit_escalates() {
        // The marker in an earlier commit is not reset by later commits.
        let refs = scan_all(&["feat: x #MAJOR", "fix: y", "chore: z"]);
        assert!(refs.implies_major_bump);
    }

    #[test]
    fn test_markdown_rendering() {
        let refs = ReferenceSet {
            tasks: vec!["JIRA-1".to_string(), "JIRA-2".to_string()],
            pull_requests: vec!["1716".to_string()],
            implies_major_bump: false,
        };
        assert_eq!(
            refs.tasks_markdown(&default_task_base_url("theowner")),
            "[JIRA-1](https://theowner.atlassian.net/browse/JIRA-1), [JIRA-2](https://theowner.atlassian.net/browse/JIRA-2)"
        );
        assert_eq!(
            refs.tasks_markdown("http://my-task-url/"),
            "[JIRA-1](http://my-task-url/JIRA-1), [JIRA-2](http://my-task-url/JIRA-2)"
        );
        assert_eq!(
            refs.pull_requests_markdown("theowner", "therepo"),
            "[#1716](https://github.com/theowner/therepo/pull/1716)"
        );
    }

    #[test]
    fn test_empty_markdown() {
        let refs = ReferenceSet::default();
        assert_eq!(refs.tasks_markdown("http://x"), "");
        assert_eq!(refs.pull_requests_markdown("o", "r"), "");
    }
}
