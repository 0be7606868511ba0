//! Conventional-commit categories and the classifier that buckets logical commits.

use super::commit::LogicalCommit;

/// A conventional-commit category: its message key and changelog section title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub key: &'static str,
    pub title: &'static str,
}

impl Category {
    /// A message matches when it starts with `key:` or `key(`.
    pub fn matches(&self, message: &str) -> bool {
        message
            .strip_prefix(self.key)
            .is_some_and(|rest| rest.starts_with(':') || rest.starts_with('('))
    }
}

/// Categories in declaration order; this order is the changelog section order.
pub static CATEGORIES: [Category; 10] = [
    // A new feature
    Category {
        key: "feat",
        title: "**:zap: Features**",
    },
    // A bug fix
    Category {
        key: "fix",
        title: "**:wrench: Fixes**",
    },
    Category {
        key: "perf",
        title: "**:runner: Performance**",
    },
    Category {
        key: "docs",
        title: "**:books: Documentation**",
    },
    // Lint and formatting only
    Category {
        key: "style",
        title: "**:nail_care: Style**",
    },
    Category {
        key: "refactor",
        title: "**:mountain: Refactors**",
    },
    Category {
        key: "test",
        title: "**:traffic_light: Tests**",
    },
    Category {
        key: "chore",
        title: "**:construction: Maintenance**",
    },
    Category {
        key: "build",
        title: "**:construction_worker: Build**",
    },
    // CI configuration and scripts
    Category {
        key: "ci",
        title: "**:runner: CI**",
    },
];

/// Key of the category whose presence implies a minor bump
pub const FEATURE_KEY: &str = "feat";

/// Find the first category, in declaration order, matching the message.
pub fn categorize(message: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.matches(message))
}

/// A category together with the commits classified into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: &'static Category,
    pub commits: Vec<LogicalCommit>,
}

/// Outcome of classifying a logical commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Categorized(&'static str),
    Uncategorized,
    /// Filtered out by the required scope
    Skipped,
}

/// Classified change set: fixed-order category groups plus the uncategorized bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedCommits {
    scope: Option<String>,
    groups: Vec<CategoryGroup>,
    uncategorized: Vec<LogicalCommit>,
}

impl CategorizedCommits {
    /// Create an empty change set, optionally restricted to commits carrying `(scope):`.
    pub fn new(scope: Option<String>) -> Self {
        let groups = CATEGORIES
            .iter()
            .map(|category| CategoryGroup {
                category,
                commits: Vec::new(),
            })
            .collect();

        CategorizedCommits {
            scope: scope.filter(|s| !s.is_empty()),
            groups,
            uncategorized: Vec::new(),
        }
    }

    /// Classify a commit and append it to its group.
    pub fn classify(&mut self, commit: LogicalCommit) -> Classification {
        if let Some(scope) = &self.scope {
            if !commit.message.contains(&format!("({}):", scope)) {
                return Classification::Skipped;
            }
        }

        let category = categorize(&commit.message);
        match category.and_then(|category| {
            self.groups
                .iter_mut()
                .find(|group| group.category.key == category.key)
        }) {
            Some(group) => {
                let key = group.category.key;
                group.commits.push(commit);
                Classification::Categorized(key)
            }
            None => {
                self.uncategorized.push(commit);
                Classification::Uncategorized
            }
        }
    }

    /// Groups in declaration order, including empty ones.
    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn group(&self, key: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|group| group.category.key == key)
    }

    pub fn uncategorized(&self) -> &[LogicalCommit] {
        &self.uncategorized
    }

    pub fn has_features(&self) -> bool {
        self.group(FEATURE_KEY)
            .is_some_and(|group| !group.commits.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.uncategorized.is_empty() && self.groups.iter().all(|g| g.commits.is_empty())
    }

    /// Total number of classified commits.
    pub fn len(&self) -> usize {
        self.uncategorized.len() + self.groups.iter().map(|g| g.commits.len()).sum::<usize>()
    }
}
