//! Column layouts of each report kind

use super::Column;
use crate::models::{CommitRecord, ContributorFirstCommit, LabeledIssue, MatchResult};

/// Separator between assignee logins inside one field.
pub const ASSIGNEE_SEPARATOR: &str = ", ";

fn url_or_empty(url: &Option<String>) -> String {
    url.clone().unwrap_or_default()
}

fn assignees(issue: &LabeledIssue) -> String {
    issue
        .assignees
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(ASSIGNEE_SEPARATOR)
}

pub fn first_commit_columns() -> Vec<Column<ContributorFirstCommit>> {
    vec![
        Column::new("First Commit Hash (SHA)", |c: &ContributorFirstCommit| {
            c.commit.hash.clone()
        }),
        Column::new("Commit Message", |c: &ContributorFirstCommit| {
            c.commit.message.clone()
        }),
        Column::new("Author", |c: &ContributorFirstCommit| c.contributor.clone()),
        Column::new("Link to Commit", |c: &ContributorFirstCommit| {
            url_or_empty(&c.commit.url)
        }),
    ]
}

pub fn tagged_issue_columns() -> Vec<Column<LabeledIssue>> {
    vec![
        Column::new("Issue Description", |i: &LabeledIssue| i.title.clone()),
        Column::new("Assignees to the Issue", assignees),
        Column::new("Link", |i: &LabeledIssue| i.url.clone()),
    ]
}

pub fn match_columns() -> Vec<Column<MatchResult>> {
    vec![
        Column::new("Author", |m: &MatchResult| m.contribution.contributor.clone()),
        Column::new("First Commit Hash (SHA)", |m: &MatchResult| {
            m.contribution.commit.hash.clone()
        }),
        Column::new("Link to Commit", |m: &MatchResult| {
            url_or_empty(&m.contribution.commit.url)
        }),
        Column::new("Issue Description", |m: &MatchResult| m.issue.title.clone()),
        Column::new("Link", |m: &MatchResult| m.issue.url.clone()),
    ]
}

pub fn user_commit_columns() -> Vec<Column<CommitRecord>> {
    vec![
        Column::new("Commit Hash (SHA)", |c: &CommitRecord| c.hash.clone()),
        Column::new("Commit Message", |c: &CommitRecord| c.message.clone()),
        Column::new("Author", |c: &CommitRecord| c.author.clone().unwrap_or_default()),
        Column::new("Link to Commit", |c: &CommitRecord| url_or_empty(&c.url)),
    ]
}
