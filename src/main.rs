use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use git_release::cli::{run_release_workflow, ReleaseWorkflowArgs};
use git_release::config::{self, ConfigOverrides};
use git_release::git::{Git2Repository, LocalPublisher};
use git_release::ui;

/// Every option can also be given as a GitHub Actions input (`INPUT_<NAME>`).
#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Classify conventional commits, resolve the next version and publish a release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Repository directory", default_value = ".")]
    path: PathBuf,

    #[arg(long, env = "INPUT_APP", help = "App name; tags become <app>@<version>")]
    app: Option<String>,

    #[arg(long, env = "INPUT_TEMPLATE_PATH", help = "Release body template")]
    template_path: Option<String>,

    #[arg(long, env = "INPUT_TASK_PREFIX", help = "Prefix of task identifiers")]
    task_prefix: Option<String>,

    #[arg(long, env = "INPUT_TASK_BASE_URL", help = "Base URL of task links")]
    task_base_url: Option<String>,

    #[arg(long, env = "INPUT_SCOPE", help = "Only keep commits with this scope")]
    scope: Option<String>,

    #[arg(long, env = "INPUT_HEAD", help = "Revision to release")]
    head: Option<String>,

    #[arg(long, env = "INPUT_BASE_TAG", help = "Compare from this tag")]
    base_tag: Option<String>,

    #[arg(long, env = "INPUT_RELEASE_TAG", help = "Use this tag instead of the next version")]
    release_tag: Option<String>,

    #[arg(long, env = "INPUT_RELEASE_NAME", help = "Release name")]
    release_name: Option<String>,

    #[arg(long, env = "INPUT_RELEASE_NOTES_FILEPATH", help = "Release notes path with {LANGUAGE_TAG}")]
    release_notes_path: Option<String>,

    #[arg(long, env = "INPUT_RELEASE_NOTES_LANGUAGE_TAGS", help = "Comma separated language tags")]
    release_notes_language_tags: Option<String>,

    #[arg(long, env = "INPUT_OUTPUT_PATH", help = "Write the release body to this file")]
    output_path: Option<String>,

    #[arg(long, env = "INPUT_DRAFT", value_parser = BoolishValueParser::new(), num_args = 0..=1, default_missing_value = "true")]
    draft: Option<bool>,

    #[arg(long, env = "INPUT_PRERELEASE", value_parser = BoolishValueParser::new(), num_args = 0..=1, default_missing_value = "true")]
    prerelease: Option<bool>,

    #[arg(long, env = "INPUT_BUMP_PROTECTION", value_parser = BoolishValueParser::new(), num_args = 0..=1, default_missing_value = "true")]
    bump_protection: Option<bool>,

    #[arg(long, env = "INPUT_PUSH_TAG", value_parser = BoolishValueParser::new(), num_args = 0..=1, default_missing_value = "true")]
    push_tag: Option<bool>,

    #[arg(long, help = "Preview the release without creating a tag or publishing")]
    dry_run: bool,

    #[arg(long, env = "GITHUB_OUTPUT", help = "File receiving the action outputs")]
    output_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            app: self.app.clone(),
            template_path: self.template_path.clone(),
            task_prefix: self.task_prefix.clone(),
            task_base_url: self.task_base_url.clone(),
            scope: self.scope.clone(),
            head: self.head.clone(),
            base_tag: self.base_tag.clone(),
            release_tag: self.release_tag.clone(),
            release_name: self.release_name.clone(),
            release_notes_path: self.release_notes_path.clone(),
            release_notes_language_tags: self.release_notes_language_tags.clone(),
            output_path: self.output_path.clone(),
            draft: self.draft,
            prerelease: self.prerelease,
            bump_protection: self.bump_protection,
            push_tag: self.push_tag,
        }
    }
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Console logging controlled by RUST_LOG (default: warn), on stderr
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    config.apply_overrides(&args.overrides());

    let repo = Git2Repository::open(&args.path)?.with_page_size(config.repository.page_size);
    let remote_slug = repo.remote_slug(&config.repository.remote);
    let github_repository = std::env::var("GITHUB_REPOSITORY").ok();
    let (owner, name) = config.resolve_slug(github_repository.as_deref(), remote_slug)?;
    let repo = repo.with_web_url(format!("https://github.com/{}/{}", owner, name));

    let mut publisher = LocalPublisher::new(&repo, config.repository.head.clone());
    if config.release.push_tag {
        publisher = publisher.with_push_remote(config.repository.remote.clone());
    }
    if let Some(path) = &config.release.output_path {
        publisher = publisher.with_output(path);
    }

    ui::display_status(&format!("Preparing release for {}/{}", owner, name));

    let result = run_release_workflow(
        &repo,
        &publisher,
        &config,
        &ReleaseWorkflowArgs {
            owner,
            repo: name,
            root: args.path.clone(),
            dry_run: args.dry_run,
        },
    )?;

    for warning in &result.warnings {
        ui::display_boundary_warning(warning);
    }
    ui::display_analysis(&result.analysis);
    if let Some(resolved) = &result.resolved {
        ui::display_version_change(resolved);
    }

    if result.published {
        ui::display_success(&format!(
            "Released {} ({})",
            result.release.name, result.release.tag
        ));
    } else {
        ui::display_status(&format!("Dry run: would release {}", result.release.tag));
        println!("{}", result.release.body);
    }

    result
        .outputs
        .publish(args.output_file.as_deref())
        .context("Failed to write action outputs")?;

    Ok(())
}
