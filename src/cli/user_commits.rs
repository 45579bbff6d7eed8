//! `user-commits` command

use anyhow::Result;
use console::style;

use super::{spinner, warn_if_anonymous};
use crate::config::Config;
use crate::github::GithubClient;
use crate::locator::RepositoryReference;
use crate::models::CommitRecord;
use crate::reporters::{self, ReportKind, ReportWriter};

pub fn run(config: &Config, repository: &str, author: &str) -> Result<()> {
    let reference = RepositoryReference::normalize(repository)?;
    let client = GithubClient::new(&config.github);
    warn_if_anonymous(&config.github);

    let bar = spinner(format!("Listing commits of {} in {}", author, reference));
    let commits: crate::Result<Vec<CommitRecord>> = client
        .list_commits(&reference, Some(author))
        .and_then(|pages| pages.collect());
    bar.finish_and_clear();
    let commits = commits?;

    println!(
        "{} {} commits by {} in {}",
        style("✓").green(),
        commits.len(),
        style(author).bold(),
        reference
    );
    for (i, commit) in commits.iter().enumerate() {
        println!(
            "  {:>4}. {} {}",
            i + 1,
            commit.url.as_deref().unwrap_or(commit.hash.as_str()),
            style(commit.summary()).dim()
        );
    }

    let path = ReportWriter::new(&config.report.output_dir).write(
        ReportKind::UserCommits,
        &reference,
        &commits,
        &reporters::user_commit_columns(),
    )?;
    println!("  Report: {}", style(path.display()).cyan());
    Ok(())
}
