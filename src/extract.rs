//! First-contribution extraction
//!
//! A single forward pass over an oldest-first commit sequence. The first
//! commit seen for an identity becomes that contributor's record; later
//! commits by the same identity and commits without an identity are skipped.

use crate::error::Result;
use crate::models::{CommitRecord, ContributorFirstCommit, MissingField, MissingFieldWarning};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Result of extracting first contributions from a commit stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// First commit per contributor, in first-seen order
    pub contributions: Vec<ContributorFirstCommit>,
    /// Commits traversed, including identity-less ones
    pub total_commits: usize,
    pub warnings: Vec<MissingFieldWarning>,
}

impl ExtractionSummary {
    pub fn missing(&self, field: MissingField) -> usize {
        self.warnings.iter().filter(|w| w.field == field).count()
    }
}

/// Incremental extractor; feed commits in chronological order.
#[derive(Debug, Default)]
pub struct FirstContributionExtractor {
    seen: HashSet<String>,
    summary: ExtractionSummary,
}

impl FirstContributionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one commit. Returns true when it became a first contribution.
    pub fn observe(&mut self, commit: CommitRecord) -> bool {
        self.summary.total_commits += 1;

        if commit.url.is_none() {
            self.warn_missing(&commit.hash, MissingField::Url);
        }

        let Some(identity) = commit.author.clone() else {
            self.warn_missing(&commit.hash, MissingField::Identity);
            return false;
        };

        if !self.seen.insert(identity.clone()) {
            return false;
        }

        debug!("First commit by {}: {}", identity, commit.hash);
        self.summary.contributions.push(ContributorFirstCommit {
            contributor: identity,
            commit,
        });
        true
    }

    fn warn_missing(&mut self, hash: &str, field: MissingField) {
        debug!("Commit {} has no {}", hash, field);
        self.summary.warnings.push(MissingFieldWarning {
            hash: hash.to_string(),
            field,
        });
    }

    pub fn contributor_count(&self) -> usize {
        self.seen.len()
    }

    pub fn finish(self) -> ExtractionSummary {
        let summary = self.summary;
        if let Some(message) = identity_warning(&summary) {
            warn!("{}", message);
        }
        let no_url = summary.missing(MissingField::Url);
        if no_url > 0 {
            // Local history never carries URLs
            debug!("{} of {} commits lack a URL", no_url, summary.total_commits);
        }
        summary
    }
}

/// Aggregate warning for commits that could not be attributed, if any.
fn identity_warning(summary: &ExtractionSummary) -> Option<String> {
    let no_identity = summary.missing(MissingField::Identity);
    (no_identity > 0).then(|| {
        format!(
            "{} of {} commits lack an author identity and were skipped",
            no_identity, summary.total_commits
        )
    })
}

/// Extract first contributions from an in-memory commit sequence.
pub fn extract<I>(commits: I) -> Vec<ContributorFirstCommit>
where
    I: IntoIterator<Item = CommitRecord>,
{
    let mut extractor = FirstContributionExtractor::new();
    for commit in commits {
        extractor.observe(commit);
    }
    extractor.summary.contributions
}

/// Drain a fallible commit stream, stopping at the first error.
pub fn extract_stream<I>(commits: I) -> Result<ExtractionSummary>
where
    I: IntoIterator<Item = Result<CommitRecord>>,
{
    extract_stream_with(commits, |_, _| {})
}

/// Like [`extract_stream`], calling `progress(traversed, contributors)` after each commit.
pub fn extract_stream_with<I, F>(commits: I, mut progress: F) -> Result<ExtractionSummary>
where
    I: IntoIterator<Item = Result<CommitRecord>>,
    F: FnMut(usize, usize),
{
    let mut extractor = FirstContributionExtractor::new();
    for commit in commits {
        extractor.observe(commit?);
        progress(extractor.summary.total_commits, extractor.contributor_count());
    }
    Ok(extractor.finish())
}
