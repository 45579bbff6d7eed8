//! `tagged-issues` command

use anyhow::Result;
use console::style;

use super::{spinner, warn_if_anonymous};
use crate::config::Config;
use crate::github::GithubClient;
use crate::locator::RepositoryReference;
use crate::models::IssueState;
use crate::reporters::{self, ReportKind, ReportWriter};
use crate::sources::LabeledIssueSource;

pub fn run(config: &Config, repository: &str, label: &str) -> Result<()> {
    let reference = RepositoryReference::normalize(repository)?;
    let client = GithubClient::new(&config.github);
    warn_if_anonymous(&config.github);

    let bar = spinner(format!("Fetching '{}' issues of {}", label, reference));
    let issues = client.fetch_by_label(&reference, label);
    bar.finish_and_clear();
    let issues = issues?;

    let path = ReportWriter::new(&config.report.output_dir).write(
        ReportKind::TaggedIssues,
        &reference,
        &issues,
        &reporters::tagged_issue_columns(),
    )?;

    let open = issues.iter().filter(|i| i.state == IssueState::Open).count();
    let assigned = issues.iter().filter(|i| !i.assignees.is_empty()).count();
    println!(
        "{} {} issues labeled '{}' ({} open, {} closed, {} assigned) -> {}",
        style("✓").green(),
        issues.len(),
        label,
        open,
        issues.len() - open,
        assigned,
        style(path.display()).cyan()
    );
    Ok(())
}
