//! Markdown changelog rendering for a categorized change set.

use crate::domain::{CategorizedCommits, LogicalCommit};
use crate::error::Result;
use regex::Regex;
use tracing::debug;

/// Rendered changelog plus the revision ids of every rendered bullet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    pub markdown: String,
    /// One entry per logical commit, in rendering order
    pub changes: Vec<String>,
}

/// Renders categorized commits as a Markdown change list
#[derive(Debug, Clone)]
pub struct ChangelogRenderer {
    conventional_prefix: Regex,
}

impl ChangelogRenderer {
    pub fn new() -> Result<Self> {
        Ok(ChangelogRenderer {
            conventional_prefix: Regex::new(r"^(\w+\([\w-]+\)|\w+|\([\w-]+\))!?:")?,
        })
    }

    /// Render uncategorized commits first, then every non-empty group in declaration order.
    pub fn render(&self, commits: &CategorizedCommits) -> Changelog {
        let mut markdown = String::new();
        let mut changes = Vec::new();

        for commit in commits.uncategorized() {
            self.push_bullet(commit, &mut markdown, &mut changes);
        }

        for group in commits.groups() {
            if group.commits.is_empty() {
                continue;
            }
            markdown.push('\n');
            markdown.push_str(group.category.title);
            markdown.push('\n');
            for commit in &group.commits {
                self.push_bullet(commit, &mut markdown, &mut changes);
            }
        }

        debug!(bullets = changes.len(), "rendered changelog");

        Changelog {
            markdown: markdown.trim().to_string(),
            changes,
        }
    }

    fn push_bullet(&self, commit: &LogicalCommit, markdown: &mut String, changes: &mut Vec<String>) {
        markdown.push_str(&self.format_commit(commit));
        markdown.push('\n');
        changes.push(commit.revision_id.clone());
    }

    /// Format one commit as
    /// `- <Text> - [<short sha>](<url>)([@<author>](<profile>))`.
    pub fn format_commit(&self, commit: &LogicalCommit) -> String {
        let short_sha: String = commit.revision_id.chars().take(8).collect();
        format!(
            "- {} - [{}]({})([@{}]({}))",
            self.display_text(&commit.message),
            short_sha,
            commit.source_url,
            commit.author_name,
            commit.author_profile_url
        )
    }

    /// First line of the message, without conventional prefix, capitalized.
    pub fn display_text(&self, message: &str) -> String {
        let title = message.lines().next().unwrap_or("");
        let text = if self.conventional_prefix.is_match(title) {
            title
                .split_once(':')
                .map(|(_, rest)| rest)
                .unwrap_or(title)
                .trim()
        } else {
            title.trim()
        };
        capitalize(text)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
