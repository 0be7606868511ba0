//! Release name and release body rendering.
//!
//! Templates are plain Markdown files with `$APP`, `$VERSION`, `$CHANGES`,
//! `$TASKS`, `$PULL_REQUESTS` and `$RELEASE_NOTES` placeholders.

use crate::config::LANGUAGE_TAG_PLACEHOLDER;
use crate::error::{ReleaseError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Values substituted into a release template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    pub app: String,
    pub version: String,
    pub changes: String,
    pub tasks: String,
    pub pull_requests: String,
    /// Only substituted when present
    pub release_notes: Option<String>,
}

/// `<app>@<version>`, or just the version without an app
pub fn render_release_name(version: &str, app: Option<&str>) -> String {
    match app.filter(|a| !a.is_empty()) {
        Some(app) => format!("{}@{}", app, version).trim().to_string(),
        None => version.trim().to_string(),
    }
}

/// Replace every placeholder occurrence in `template`.
pub fn render_release_body(template: &str, ctx: &TemplateContext) -> String {
    let mut body = template
        .replace("$APP", &ctx.app)
        .replace("$VERSION", &ctx.version)
        .replace("$CHANGES", &ctx.changes)
        .replace("$TASKS", &ctx.tasks)
        .replace("$PULL_REQUESTS", &ctx.pull_requests);

    if let Some(notes) = &ctx.release_notes {
        body = body.replace("$RELEASE_NOTES", notes);
    }
    body
}

/// Read one notes file per language tag and join them as `<tag>\n<notes>\n` blocks.
pub fn create_release_notes(path_pattern: &str, language_tags: &str) -> Result<String> {
    let mut entries = Vec::new();
    for tag in language_tags.split(',').map(str::trim) {
        let path = path_pattern.replace(LANGUAGE_TAG_PLACEHOLDER, tag);
        let notes = fs::read_to_string(&path).map_err(|e| {
            ReleaseError::template(format!("Cannot read release notes {}: {}", path, e))
        })?;
        entries.push(format!("{}\n{}\n", tag, notes));
    }
    Ok(entries.join("\n"))
}

/// Locate a template: the path as given, else under `<root>/.github/`.
pub fn resolve_template_path(root: &Path, template_path: &str) -> Result<PathBuf> {
    let direct = root.join(template_path);
    if direct.is_file() {
        return Ok(direct);
    }

    let in_github = root.join(".github").join(template_path);
    if in_github.is_file() {
        return Ok(in_github);
    }

    Err(ReleaseError::template(format!(
        "Template '{}' not found (looked in {} and {})",
        template_path,
        direct.display(),
        in_github.display()
    )))
}

pub fn load_template(root: &Path, template_path: &str) -> Result<String> {
    let path = resolve_template_path(root, template_path)?;
    debug!(path = %path.display(), "loading release template");
    Ok(fs::read_to_string(path)?)
}
