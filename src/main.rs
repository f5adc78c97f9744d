//! critiq — AI code review for GitHub Actions.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use critiq::config::Config;
use critiq::env::Env;
use critiq::github::{ChangedFile, GithubClient, GithubContext};
use critiq::models::{ReviewRequest, RunSummary};
use critiq::orchestrator;
use critiq::provider::rig::RigProvider;
use critiq::provider::ModelProvider;
use critiq::report;

use cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let args = Cli::parse();
    let env = Env::real();

    let mut config =
        Config::load(Some(Path::new(".")), &env).context("failed to load configuration")?;
    args.apply_to(&mut config);

    let github = GithubClient::new(
        GithubContext::from_env(&env).context("failed to resolve GitHub context")?,
    );
    let context = github.context().clone();

    // PR events list files through the pull request; push events through
    // the head commit.
    let changed = match (context.pr_number, context.sha.as_deref()) {
        (Some(pr), _) => github
            .list_changed_files(pr)
            .await
            .with_context(|| format!("failed to list files for PR #{pr}"))?,
        (None, Some(sha)) => github
            .list_commit_files(sha)
            .await
            .with_context(|| format!("failed to list files for commit {sha}"))?,
        (None, None) => bail!("neither PR_NUMBER nor GITHUB_SHA is set; nothing to review"),
    };

    let reviewable: Vec<ChangedFile> = changed
        .into_iter()
        .filter(ChangedFile::is_reviewable)
        .take(config.review.max_files)
        .collect();

    if reviewable.is_empty() {
        info!("no reviewable files in this change, exiting");
        return Ok(());
    }
    info!(count = reviewable.len(), "reviewing changed files");

    let git_ref = context.sha.as_deref().unwrap_or("HEAD");
    let mut filenames = Vec::with_capacity(reviewable.len());
    let mut requests = Vec::with_capacity(reviewable.len());
    for file in &reviewable {
        // A file we cannot fetch is still reviewable from its diff alone.
        let content = match github.fetch_file_content(&file.filename, git_ref).await {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %file.filename, error = %e, "could not fetch content, using diff only");
                String::new()
            }
        };
        filenames.push(file.filename.clone());
        requests.push(ReviewRequest::new(
            &file.filename,
            &content,
            file.patch.as_deref().unwrap_or_default(),
            config.review.review_type,
            config.review.language,
            config.review.max_issues_per_file,
        ));
    }

    let provider: Arc<dyn ModelProvider> = Arc::new(
        RigProvider::new(config.provider.clone()).context("failed to initialise LLM provider")?,
    );

    let mut reviews =
        orchestrator::review_files(provider, &config.provider.model, requests).await;

    report::filter_by_severity(&mut reviews, config.review.severity_filter);
    let summary = RunSummary::from_reviews(&reviews, config.review.review_type);
    let body = report::render(&filenames, &reviews, &summary);

    if args.dry_run {
        println!("{body}");
        return Ok(());
    }

    match (context.pr_number, context.sha.as_deref()) {
        (Some(pr), _) => github
            .post_pr_comment(pr, &body)
            .await
            .with_context(|| format!("failed to post review comment on PR #{pr}"))?,
        (None, Some(sha)) => github
            .post_commit_comment(sha, &body)
            .await
            .with_context(|| format!("failed to post review comment on commit {sha}"))?,
        (None, None) => unreachable!("already checked when listing files"),
    }

    info!(
        files = summary.total_files,
        issues = summary.total_issues,
        "review posted"
    );
    Ok(())
}
