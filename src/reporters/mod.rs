//! CSV reporters for mining results
//!
//! Report kinds:
//! - `first_commit` - first commit of every contributor
//! - `tagged_issues` - issues carrying the entry-level label
//! - `first_issue_matches` - first contributions whose author was assigned a tagged issue
//! - `user_commits` - every commit of a single author
//!
//! Files are named `results_<kind>_<repository-name>.csv`, UTF-8, with
//! minimal quoting.

mod columns;
mod writer;

pub use columns::{
    first_commit_columns, match_columns, tagged_issue_columns, user_commit_columns,
    ASSIGNEE_SEPARATOR,
};
pub use writer::{Column, ReportWriter};

use crate::locator::RepositoryReference;

/// Supported report kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    FirstCommit,
    TaggedIssues,
    FirstIssueMatches,
    UserCommits,
}

impl ReportKind {
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::FirstCommit => "first_commit",
            ReportKind::TaggedIssues => "tagged_issues",
            ReportKind::FirstIssueMatches => "first_issue_matches",
            ReportKind::UserCommits => "user_commits",
        }
    }

    pub fn file_name(&self, reference: &RepositoryReference) -> String {
        format!("results_{}_{}.csv", self.slug(), reference.local_name())
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
