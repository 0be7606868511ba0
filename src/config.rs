use crate::domain::reference::{default_task_base_url, DEFAULT_TASK_PREFIX};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Placeholder replaced by each language tag in the release notes path
pub const LANGUAGE_TAG_PLACEHOLDER: &str = "{LANGUAGE_TAG}";

/// Represents the complete configuration for git-release.
///
/// Contains repository coordinates, commit parsing settings and release options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub commits: CommitsConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_head() -> String {
    "HEAD".to_string()
}

fn default_page_size() -> usize {
    30
}

fn default_task_prefix() -> String {
    DEFAULT_TASK_PREFIX.to_string()
}

fn default_template_path() -> String {
    "release-template.md".to_string()
}

/// Where the history comes from and how it is addressed on the web.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepositoryConfig {
    /// Repository owner; derived from `GITHUB_REPOSITORY` or the remote URL when unset
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Revision the release is cut from
    #[serde(default = "default_head")]
    pub head: String,

    /// Releases per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            owner: None,
            repo: None,
            remote: default_remote(),
            head: default_head(),
            page_size: default_page_size(),
        }
    }
}

/// Commit parsing settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitsConfig {
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,

    /// Defaults to `https://<owner>.atlassian.net/browse`
    #[serde(default)]
    pub task_base_url: Option<String>,

    /// Only commits with `(<scope>):` are kept; falls back to `release.app`
    #[serde(default)]
    pub scope: Option<String>,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        CommitsConfig {
            task_prefix: default_task_prefix(),
            task_base_url: None,
            scope: None,
        }
    }
}

/// Release options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// App name for monorepos; tags become `<app>@<version>`
    #[serde(default)]
    pub app: Option<String>,

    #[serde(default = "default_template_path")]
    pub template_path: String,

    #[serde(default)]
    pub draft: bool,

    /// Force a release-candidate bump
    #[serde(default)]
    pub prerelease: bool,

    #[serde(default)]
    pub bump_protection: bool,

    #[serde(default)]
    pub push_tag: bool,

    #[serde(default)]
    pub base_tag: Option<String>,

    #[serde(default)]
    pub release_tag: Option<String>,

    #[serde(default)]
    pub release_name: Option<String>,

    /// Path with a `{LANGUAGE_TAG}` placeholder
    #[serde(default)]
    pub release_notes_path: Option<String>,

    /// Comma separated, e.g. `en-US, de-DE`
    #[serde(default)]
    pub release_notes_language_tags: Option<String>,

    /// Release description is written here instead of stdout
    #[serde(default)]
    pub output_path: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            app: None,
            template_path: default_template_path(),
            draft: false,
            prerelease: false,
            bump_protection: false,
            push_tag: false,
            base_tag: None,
            release_tag: None,
            release_name: None,
            release_notes_path: None,
            release_notes_language_tags: None,
            output_path: None,
        }
    }
}

/// Values given on the command line; `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub app: Option<String>,
    pub template_path: Option<String>,
    pub task_prefix: Option<String>,
    pub task_base_url: Option<String>,
    pub scope: Option<String>,
    pub head: Option<String>,
    pub base_tag: Option<String>,
    pub release_tag: Option<String>,
    pub release_name: Option<String>,
    pub release_notes_path: Option<String>,
    pub release_notes_language_tags: Option<String>,
    pub output_path: Option<String>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
    pub bump_protection: Option<bool>,
    pub push_tag: Option<bool>,
}

/// Empty strings count as unset, the way CI inputs arrive
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Config {
    /// Apply command-line values over the loaded configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        fn set(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = non_empty(value) {
                *target = Some(value);
            }
        }

        set(&mut self.release.app, &overrides.app);
        set(&mut self.commits.task_base_url, &overrides.task_base_url);
        set(&mut self.commits.scope, &overrides.scope);
        set(&mut self.release.base_tag, &overrides.base_tag);
        set(&mut self.release.release_tag, &overrides.release_tag);
        set(&mut self.release.release_name, &overrides.release_name);
        set(&mut self.release.release_notes_path, &overrides.release_notes_path);
        set(
            &mut self.release.release_notes_language_tags,
            &overrides.release_notes_language_tags,
        );
        set(&mut self.release.output_path, &overrides.output_path);

        if let Some(path) = non_empty(&overrides.template_path) {
            self.release.template_path = path;
        }
        if let Some(prefix) = non_empty(&overrides.task_prefix) {
            self.commits.task_prefix = prefix;
        }
        if let Some(head) = non_empty(&overrides.head) {
            self.repository.head = head;
        }
        if let Some(draft) = overrides.draft {
            self.release.draft = draft;
        }
        if let Some(prerelease) = overrides.prerelease {
            self.release.prerelease = prerelease;
        }
        if let Some(protection) = overrides.bump_protection {
            self.release.bump_protection = protection;
        }
        if let Some(push) = overrides.push_tag {
            self.release.push_tag = push;
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.repository.page_size == 0 {
            return Err(ReleaseError::config("repository.page_size must be at least 1"));
        }
        if self.commits.task_prefix.trim().is_empty() {
            return Err(ReleaseError::config("commits.task_prefix must not be empty"));
        }
        if let Some(path) = non_empty(&self.release.release_notes_path) {
            if !path.contains(LANGUAGE_TAG_PLACEHOLDER) {
                return Err(ReleaseError::config(format!(
                    "release.release_notes_path must contain {}",
                    LANGUAGE_TAG_PLACEHOLDER
                )));
            }
            if non_empty(&self.release.release_notes_language_tags).is_none() {
                return Err(ReleaseError::config(
                    "release.release_notes_language_tags is required with release_notes_path",
                ));
            }
        }
        Ok(())
    }

    /// Configured app, ignoring blank values
    pub fn app(&self) -> Option<String> {
        non_empty(&self.release.app)
    }

    /// `<app>@` for monorepo apps, `v` otherwise
    pub fn tag_prefix(&self) -> String {
        match self.app() {
            Some(app) => format!("{}@", app),
            None => "v".to_string(),
        }
    }

    /// Required commit scope: the configured scope, else the app name
    pub fn scope(&self) -> Option<String> {
        non_empty(&self.commits.scope).or_else(|| self.app())
    }

    pub fn task_base_url(&self, owner: &str) -> String {
        non_empty(&self.commits.task_base_url)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| default_task_base_url(owner))
    }

    /// Fill in owner/repo from `GITHUB_REPOSITORY` or the remote slug when unset.
    ///
    /// Returns an error when neither source yields a value.
    pub fn resolve_slug(
        &mut self,
        github_repository: Option<&str>,
        remote_slug: Option<(String, String)>,
    ) -> Result<(String, String)> {
        if let (Some(owner), Some(repo)) = (
            non_empty(&self.repository.owner),
            non_empty(&self.repository.repo),
        ) {
            return Ok((owner, repo));
        }

        let derived = github_repository
            .and_then(parse_repository_slug)
            .or(remote_slug)
            .ok_or_else(|| {
                ReleaseError::config(
                    "Cannot determine repository owner/name: set [repository] owner and repo",
                )
            })?;

        let owner = non_empty(&self.repository.owner).unwrap_or(derived.0);
        let repo = non_empty(&self.repository.repo).unwrap_or(derived.1);
        self.repository.owner = Some(owner.clone());
        self.repository.repo = Some(repo.clone());
        Ok((owner, repo))
    }
}

/// Parse an `owner/repo` string
pub fn parse_repository_slug(value: &str) -> Option<(String, String)> {
    let (owner, repo) = value.trim().split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)
            .map_err(|e| ReleaseError::config(format!("Cannot read {}: {}", path, e)))?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.repository.remote, "origin");
        assert_eq!(config.repository.head, "HEAD");
        assert_eq!(config.repository.page_size, 30);
        assert_eq!(config.commits.task_prefix, "JIRA-");
        assert_eq!(config.tag_prefix(), "v");
        assert_eq!(config.scope(), None);
    }

    #[test]
    fn test_app_drives_prefix_and_scope() {
        let mut config = Config::default();
        config.release.app = Some("myapp".to_string());
        assert_eq!(config.tag_prefix(), "myapp@");
        assert_eq!(config.scope().as_deref(), Some("myapp"));

        config.commits.scope = Some("auth".to_string());
        assert_eq!(config.scope().as_deref(), Some("auth"));
    }

    #[test]
    fn test_blank_app_is_ignored() {
        let mut config = Config::default();
        config.release.app = Some("  ".to_string());
        assert_eq!(config.tag_prefix(), "v");
    }

    #[test]
    fn test_overrides_skip_empty_inputs() {
        let mut config = Config::default();
        config.release.app = Some("api".to_string());
        config.apply_overrides(&ConfigOverrides {
            app: Some(String::new()),
            task_prefix: Some("TASK-".to_string()),
            prerelease: Some(true),
            ..Default::default()
        });
        assert_eq!(config.release.app.as_deref(), Some("api"));
        assert_eq!(config.commits.task_prefix, "TASK-");
        assert!(config.release.prerelease);
    }

    #[test]
    fn test_task_base_url() {
        let mut config = Config::default();
        assert_eq!(
            config.task_base_url("acme"),
            "https://acme.atlassian.net/browse"
        );
        config.commits.task_base_url = Some("https://tasks.example.com/".to_string());
        assert_eq!(config.task_base_url("acme"), "https://tasks.example.com");
    }

    #[test]
    fn test_validate_release_notes() {
        let mut config = Config::default();
        config.release.release_notes_path = Some("notes.md".to_string());
        assert!(config.validate().is_err());

        config.release.release_notes_path = Some("notes/{LANGUAGE_TAG}.md".to_string());
        assert!(config.validate().is_err());

        config.release.release_notes_language_tags = Some("en-US".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_slug_precedence() {
        let mut config = Config::default();
        let slug = config
            .resolve_slug(
                Some("acme/widgets"),
                Some(("other".to_string(), "thing".to_string())),
            )
            .unwrap();
        assert_eq!(slug, ("acme".to_string(), "widgets".to_string()));

        let mut config = Config::default();
        let slug = config
            .resolve_slug(None, Some(("other".to_string(), "thing".to_string())))
            .unwrap();
        assert_eq!(slug, ("other".to_string(), "thing".to_string()));

        let mut config = Config::default();
        assert!(config.resolve_slug(None, None).is_err());
    }

    #[test]
    fn test_parse_repository_slug() {
        assert_eq!(
            parse_repository_slug("acme/widgets"),
            Some(("acme".to_string(), "widgets".to_string()))
        );
        assert_eq!(parse_repository_slug("acme"), None);
        assert_eq!(parse_repository_slug("a/b/c"), None);
    }
}
