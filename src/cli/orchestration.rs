//! Main release workflow orchestration
//!
//! Ties the commit analysis, version resolution and template rendering
//! together over the provider traits, so the same workflow runs against a
//! local repository or a mock.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::analyzer::version_resolver::strip_prefix;
use crate::analyzer::{
    AnalyzerSettings, CommitAnalysis, CommitAnalyzer, ResolvedVersion, VersionRequest,
    VersionResolver,
};
use crate::boundary::{self, BoundaryWarning};
use crate::cli::outputs::ActionOutputs;
use crate::config::Config;
use crate::domain::BumpKind;
use crate::error::Result;
use crate::git::{HistoryProvider, ReleaseDraft, ReleaseHistory, ReleasePublisher};
use crate::template::{self, TemplateContext};

/// Arguments for the release workflow that do not come from the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    pub owner: String,
    pub repo: String,

    /// Directory templates are resolved against
    pub root: PathBuf,

    /// Compute everything, create and publish nothing
    pub dry_run: bool,
}

/// Result of a release workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub outputs: ActionOutputs,
    pub release: ReleaseDraft,
    pub analysis: CommitAnalysis,
    /// `None` when the release tag was configured explicitly
    pub resolved: Option<ResolvedVersion>,
    pub warnings: Vec<BoundaryWarning>,
    /// Whether the release was published
    pub published: bool,
}

/// Main release workflow
///
/// 1. Determine the base tag (configured, or the last published release)
/// 2. Analyze the commits between the base tag and head
/// 3. Resolve the release tag (configured, or the next version)
/// 4. Render release name and body
/// 5. Create the tag when `push_tag` is set, then publish the release
#[instrument(skip_all, fields(owner = %args.owner, repo = %args.repo))]
pub fn run_release_workflow<R, P>(
    history: &R,
    publisher: &P,
    config: &Config,
    args: &ReleaseWorkflowArgs,
) -> Result<WorkflowResult>
where
    R: HistoryProvider + ReleaseHistory + ?Sized,
    P: ReleasePublisher + ?Sized,
{
    config.validate()?;

    let tag_prefix = config.tag_prefix();
    let resolver = VersionResolver::new();
    let mut warnings = Vec::new();

    let base_tag = match non_empty(&config.release.base_tag) {
        Some(tag) => Some(tag),
        None => {
            let published = resolver.retrieve_last_released_version(history, &tag_prefix)?;
            if published.is_none() {
                warnings.push(BoundaryWarning::NoPublishedRelease {
                    tag_prefix: tag_prefix.clone(),
                });
            }
            published
        }
    };

    let analyzer = CommitAnalyzer::new(AnalyzerSettings {
        task_prefix: config.commits.task_prefix.clone(),
        scope: config.scope(),
    })?;
    let head = config.repository.head.as_str();
    let analysis = analyzer.analyze_range(history, base_tag.as_deref(), head)?;
    warnings.extend(boundary::analysis_warnings(&analysis, base_tag.as_deref(), head));

    let change_type = analysis.next_bump();
    let requested = if config.release.prerelease {
        BumpKind::Prerelease
    } else {
        change_type
    };

    let (release_tag, resolved) = match non_empty(&config.release.release_tag) {
        Some(tag) => (tag, None),
        None => {
            let resolved = resolver.resolve(
                history,
                &VersionRequest {
                    tag_prefix: tag_prefix.clone(),
                    requested,
                    published_tag: base_tag.clone(),
                    bump_protection: config.release.bump_protection,
                },
            )?;
            warnings.extend(boundary::version_warnings(&resolved, &tag_prefix));
            (resolved.new_tag.clone(), Some(resolved))
        }
    };

    let release_version = strip_prefix(&release_tag, &tag_prefix).to_string();
    let app = config.app();
    let release_name = non_empty(&config.release.release_name)
        .unwrap_or_else(|| template::render_release_name(&release_version, app.as_deref()));

    let release_notes = match (
        non_empty(&config.release.release_notes_path),
        non_empty(&config.release.release_notes_language_tags),
    ) {
        (Some(path), Some(tags)) => Some(template::create_release_notes(&path, &tags)?),
        _ => None,
    };

    let context = TemplateContext {
        app: app.clone().unwrap_or_default(),
        version: release_version,
        changes: analysis.changelog.markdown.clone(),
        tasks: analysis
            .references
            .tasks_markdown(&config.task_base_url(&args.owner)),
        pull_requests: analysis
            .references
            .pull_requests_markdown(&args.owner, &args.repo),
        release_notes,
    };
    let body = template::render_release_body(
        &template::load_template(&args.root, &config.release.template_path)?,
        &context,
    );

    let release = ReleaseDraft {
        tag: release_tag.clone(),
        name: release_name.clone(),
        body,
        draft: config.release.draft,
        prerelease: config.release.prerelease,
    };

    if !args.dry_run {
        if config.release.push_tag {
            publisher.create_tag(&release.tag)?;
        }
        publisher.publish_release(&release)?;
        info!(tag = %release.tag, name = %release.name, "release published");
    }

    let outputs = ActionOutputs {
        base_tag: base_tag.unwrap_or_default(),
        changes: analysis.changelog.changes.clone(),
        tasks: analysis.references.tasks.clone(),
        pull_requests: analysis.references.pull_requests.clone(),
        change_type: change_type.to_string(),
        previous_tag: resolved
            .as_ref()
            .and_then(|r| r.previous_tag.clone())
            .unwrap_or_default(),
        previous_version: resolved
            .as_ref()
            .map(|r| r.previous_version.clone())
            .unwrap_or_default(),
        new_tag: resolved
            .as_ref()
            .map(|r| r.new_tag.clone())
            .unwrap_or_default(),
        new_version: resolved
            .as_ref()
            .map(|r| r.new_version.clone())
            .unwrap_or_default(),
        release_type: resolved
            .as_ref()
            .map(|r| r.release_type.to_string())
            .unwrap_or_default(),
        release_tag,
        release_name,
    };

    Ok(WorkflowResult {
        outputs,
        release,
        analysis,
        resolved,
        warnings,
        published: !args.dry_run,
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
