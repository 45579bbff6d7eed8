//! Core data models for goodfirst
//!
//! Every stage produces these as plain values and hands them to the next
//! stage read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single commit as seen by a history source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    /// Full commit message
    pub message: String,
    /// Author identity; `None` when the account was deleted
    pub author: Option<String>,
    /// Authored timestamp
    pub timestamp: DateTime<Utc>,
    /// Web URL of the commit, when the source can provide one
    pub url: Option<String>,
}

impl CommitRecord {
    pub fn new(hash: impl Into<String>, author: Option<&str>) -> Self {
        Self {
            hash: hash.into(),
            message: String::new(),
            author: author.map(str::to_string),
            timestamp: DateTime::<Utc>::default(),
            url: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// The earliest commit of one contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorFirstCommit {
    pub contributor: String,
    pub commit: CommitRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl std::fmt::Display for IssueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// An issue carrying the requested label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LabeledIssue {
    pub number: u64,
    pub title: String,
    /// Assignee logins, possibly empty
    pub assignees: BTreeSet<String>,
    pub url: String,
    pub state: IssueState,
}

impl LabeledIssue {
    pub fn is_assigned_to(&self, identity: &str) -> bool {
        self.assignees.contains(identity)
    }
}

/// A first contribution whose author was assigned to a labeled issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub contribution: ContributorFirstCommit,
    pub issue: LabeledIssue,
}

/// Optional commit field that a source could not provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingField {
    Identity,
    Url,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::Identity => write!(f, "author identity"),
            MissingField::Url => write!(f, "commit URL"),
        }
    }
}

/// Non-fatal notice that a commit lacked an optional field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFieldWarning {
    pub hash: String,
    pub field: MissingField,
}
