//! `analyze` command: the full first-contribution pipeline

use anyhow::{bail, Result};
use console::style;

use super::{normalize_all, spinner, warn_if_anonymous};
use crate::config::{Config, SourceKind};
use crate::git::GitHistory;
use crate::github::GithubClient;
use crate::pipeline::{Pipeline, RunOptions};
use crate::reporters::ReportWriter;
use crate::sources::CommitHistorySource;

pub fn run(
    config: &Config,
    repositories: &[String],
    label: Option<String>,
    kind: SourceKind,
) -> Result<()> {
    let references = normalize_all(repositories)?;

    let client = GithubClient::new(&config.github);
    let git = GitHistory::new(Config::clone_cache_dir());
    let commits: &dyn CommitHistorySource = match kind {
        SourceKind::Api => &client,
        SourceKind::Local => &git,
    };
    if kind == SourceKind::Api || label.is_some() {
        warn_if_anonymous(&config.github);
    }
    if kind == SourceKind::Local && label.is_some() {
        tracing::warn!(
            "Local history identifies authors by git name while issue assignees are GitHub logins; \
             some matches may be missed"
        );
    }

    let bar = spinner(format!("Analyzing {} repositories", references.len()));
    let mut pipeline = Pipeline::new(commits, ReportWriter::new(&config.report.output_dir))
        .with_progress(|traversed, contributors| {
            bar.set_message(format!("{} commits, {} contributors", traversed, contributors))
        });
    if label.is_some() {
        pipeline = pipeline.with_issues(&client);
    }
    let outcomes = pipeline.run_many(&references, &RunOptions { label });
    drop(pipeline);
    bar.finish_and_clear();

    let mut failed = 0usize;
    for (reference, outcome) in &outcomes {
        match outcome {
            Ok(summary) => {
                println!(
                    "{} {}: {} contributors across {} commits",
                    style("✓").green(),
                    style(reference).bold(),
                    summary.contributions.len(),
                    summary.total_commits
                );
                if summary.missing_identity > 0 {
                    println!(
                        "  {} commits had no author identity",
                        style(summary.missing_identity).yellow()
                    );
                }
                if let (Some(issues), Some(matches)) = (&summary.issues, &summary.matches) {
                    println!(
                        "  {} tagged issues, {} first contributions matched",
                        issues.len(),
                        style(matches.len()).bold()
                    );
                }
                for path in &summary.reports {
                    println!("  Report: {}", style(path.display()).cyan());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), style(reference).bold(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} repositories failed", failed, outcomes.len());
    }
    Ok(())
}
