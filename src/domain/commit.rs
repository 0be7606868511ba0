/// Login used when the provider reports no author for a commit
pub const BOT_LOGIN: &str = "minddocbot";

/// Profile URL used when the provider reports no author for a commit
pub const BOT_PROFILE_URL: &str = "https://github.com/minddocbot";

/// Delimiter that introduces every entry of a squash-merge body
pub const SQUASH_DELIMITER: &str = "* ";

/// Author identity as reported by the history provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    pub login: String,
    pub html_url: String,
}

/// Commit record as returned by a history provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub author: Option<CommitAuthor>,
    pub html_url: String,
    pub message: String,
    pub sha: String,
}

impl RawCommit {
    pub fn new(
        sha: impl Into<String>,
        message: impl Into<String>,
        html_url: impl Into<String>,
        author: Option<CommitAuthor>,
    ) -> Self {
        RawCommit {
            author,
            html_url: html_url.into(),
            message: message.into(),
            sha: sha.into(),
        }
    }

    /// Whether the message is a squash-merge body holding several logical commits.
    pub fn is_squash(&self) -> bool {
        self.message.contains(&format!("\n{}", SQUASH_DELIMITER))
    }
}

/// One classifiable unit of change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalCommit {
    pub author_name: String,
    pub author_profile_url: String,
    pub source_url: String,
    /// Always a single line
    pub message: String,
    /// Hash of the enclosing raw commit
    pub revision_id: String,
}

impl LogicalCommit {
    /// Normalize a raw commit, keeping only the first line of its message.
    ///
    /// Missing author data falls back to the bot identity.
    pub fn from_raw(raw: &RawCommit) -> Self {
        Self::with_message(raw, &raw.message)
    }

    /// Build a logical commit that inherits the identity of `raw` but carries `message`.
    pub fn with_message(raw: &RawCommit, message: &str) -> Self {
        let (author_name, author_profile_url) = match &raw.author {
            Some(author) => (author.login.clone(), author.html_url.clone()),
            None => (BOT_LOGIN.to_string(), BOT_PROFILE_URL.to_string()),
        };

        LogicalCommit {
            author_name,
            author_profile_url,
            source_url: raw.html_url.clone(),
            message: first_line(message).to_string(),
            revision_id: raw.sha.clone(),
        }
    }
}

/// Return the first line of a message, trimmed.
pub fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("").trim()
}

/// Expand a raw commit into its logical commits.
///
/// Squash bodies are split on [`SQUASH_DELIMITER`]: the first segment is the squash
/// title and is dropped, every following non-empty segment becomes its own commit.
/// Any other commit yields exactly one logical commit.
pub fn expand(raw: &RawCommit) -> Vec<LogicalCommit> {
    if !raw.is_squash() {
        return vec![LogicalCommit::from_raw(raw)];
    }

    raw.message
        .split(SQUASH_DELIMITER)
        .skip(1)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| LogicalCommit::with_message(raw, segment))
        .collect()
}
