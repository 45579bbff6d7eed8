//! First-contribution mining pipeline
//!
//! Orchestrates one run per repository:
//! 1. Stream commits oldest-first from the history source
//! 2. Extract the first commit of every contributor
//! 3. Write the first-commit report
//! 4. If a label is given: fetch labeled issues, write the tagged-issue
//!    report, cross-reference and write the match report
//!
//! Each report is persisted before the next stage starts, so a failure in a
//! later stage (unknown label, network timeout) never touches a report that
//! was already written.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::extract::{self, ExtractionSummary};
use crate::locator::RepositoryReference;
use crate::matcher;
use crate::models::{ContributorFirstCommit, LabeledIssue, MatchResult, MissingField};
use crate::reporters::{self, ReportKind, ReportWriter};
use crate::sources::{CommitHistorySource, LabeledIssueSource};

/// Per-run parameters supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Entry-level label to cross-reference; `None` skips the issue stages
    pub label: Option<String>,
}

impl RunOptions {
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

/// Outcome of one repository run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reference: RepositoryReference,
    pub total_commits: usize,
    pub contributions: Vec<ContributorFirstCommit>,
    pub missing_identity: usize,
    pub missing_url: usize,
    pub issues: Option<Vec<LabeledIssue>>,
    pub matches: Option<Vec<MatchResult>>,
    /// Reports written, in the order they were persisted
    pub reports: Vec<PathBuf>,
}

type Progress<'a> = Box<dyn Fn(usize, usize) + 'a>;

/// Full mining pipeline.
pub struct Pipeline<'a> {
    commits: &'a dyn CommitHistorySource,
    issues: Option<&'a dyn LabeledIssueSource>,
    writer: ReportWriter,
    progress: Option<Progress<'a>>,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline writing reports through `writer`.
    pub fn new(commits: &'a dyn CommitHistorySource, writer: ReportWriter) -> Self {
        Self {
            commits,
            issues: None,
            writer,
            progress: None,
        }
    }

    /// Enable the labeled-issue stages.
    pub fn with_issues(mut self, issues: &'a dyn LabeledIssueSource) -> Self {
        self.issues = Some(issues);
        self
    }

    /// Call `progress(traversed, contributors)` after every commit.
    pub fn with_progress(mut self, progress: impl Fn(usize, usize) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Run the pipeline for one repository.
    pub fn run(&self, reference: &RepositoryReference, options: &RunOptions) -> Result<RunSummary> {
        info!("Mining first contributions for {}", reference);

        let stream = self.commits.fetch(reference)?;
        let ExtractionSummary {
            contributions,
            total_commits,
            warnings,
        } = match &self.progress {
            Some(progress) => extract::extract_stream_with(stream, |n, c| progress(n, c))?,
            None => extract::extract_stream(stream)?,
        };

        let mut summary = RunSummary {
            reference: reference.clone(),
            total_commits,
            missing_identity: warnings.iter().filter(|w| w.field == MissingField::Identity).count(),
            missing_url: warnings.iter().filter(|w| w.field == MissingField::Url).count(),
            contributions,
            issues: None,
            matches: None,
            reports: Vec::new(),
        };
        info!(
            "{}: {} contributors across {} commits",
            reference,
            summary.contributions.len(),
            summary.total_commits
        );

        let first_commits = self.writer.write(
            ReportKind::FirstCommit,
            reference,
            &summary.contributions,
            &reporters::first_commit_columns(),
        )?;
        summary.reports.push(first_commits);

        let Some(label) = options.label.as_deref() else {
            return Ok(summary);
        };
        let Some(source) = self.issues else {
            warn!("No issue source configured; skipping label '{}'", label);
            return Ok(summary);
        };

        if let Err(e) = self.run_issue_stages(source, reference, label, &mut summary) {
            warn!(
                "Labeled-issue stage failed for {}; keeping {}",
                reference,
                summary
                    .reports
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            return Err(e);
        }

        Ok(summary)
    }

    fn run_issue_stages(
        &self,
        source: &dyn LabeledIssueSource,
        reference: &RepositoryReference,
        label: &str,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let issues = source.fetch_by_label(reference, label)?;
        let path = self.writer.write(
            ReportKind::TaggedIssues,
            reference,
            &issues,
            &reporters::tagged_issue_columns(),
        )?;
        summary.reports.push(path);

        let matches = matcher::cross_reference(&summary.contributions, &issues);
        debug!("{} first contributions matched '{}' issues", matches.len(), label);
        let path = self.writer.write(
            ReportKind::FirstIssueMatches,
            reference,
            &matches,
            &reporters::match_columns(),
        )?;
        summary.reports.push(path);

        summary.issues = Some(issues);
        summary.matches = Some(matches);
        Ok(())
    }

    /// Run the pipeline for each repository in turn.
    ///
    /// A failure aborts only the repository it happened in; the following
    /// repositories still run and earlier reports stay on disk.
    pub fn run_many(
        &self,
        references: &[RepositoryReference],
        options: &RunOptions,
    ) -> Vec<(RepositoryReference, Result<RunSummary>)> {
        references
            .iter()
            .map(|reference| {
                let outcome = self.run(reference, options);
                if let Err(e) = &outcome {
                    match e {
                        Error::NetworkTimeout { .. } => {
                            warn!("Aborting {} after a network timeout: {}", reference, e)
                        }
                        _ => warn!("Aborting {}: {}", reference, e),
                    }
                }
                (reference.clone(), outcome)
            })
            .collect()
    }
}
