//! Source traits for commit history and labeled issues
//!
//! The pipeline only talks to these traits, so either the GitHub API or a
//! local git walk can stand behind the commit stage.

use crate::error::Result;
use crate::git::GitHistory;
use crate::github::GithubClient;
use crate::locator::RepositoryReference;
use crate::models::{CommitRecord, LabeledIssue};

/// Lazy, finite, one-shot sequence of commits, oldest first.
pub type CommitStream<'a> = Box<dyn Iterator<Item = Result<CommitRecord>> + 'a>;

/// Ordered commits for a repository.
pub trait CommitHistorySource {
    /// Commits of one repository, oldest first.
    fn fetch<'a>(&'a self, reference: &RepositoryReference) -> Result<CommitStream<'a>>;

    /// Commits of several repositories, one stream per reference in order.
    fn fetch_many<'a>(
        &'a self,
        references: &'a [RepositoryReference],
    ) -> Box<dyn Iterator<Item = (&'a RepositoryReference, Result<CommitStream<'a>>)> + 'a> {
        Box::new(references.iter().map(move |reference| (reference, self.fetch(reference))))
    }
}

/// Issues carrying a given label.
pub trait LabeledIssueSource {
    /// Fails with [`crate::Error::UnknownLabel`] when the label does not exist.
    fn fetch_by_label(
        &self,
        reference: &RepositoryReference,
        label: &str,
    ) -> Result<Vec<LabeledIssue>>;
}

impl CommitHistorySource for GithubClient {
    fn fetch<'a>(&'a self, reference: &RepositoryReference) -> Result<CommitStream<'a>> {
        Ok(Box::new(self.list_commits(reference, None)?))
    }
}

impl LabeledIssueSource for GithubClient {
    fn fetch_by_label(
        &self,
        reference: &RepositoryReference,
        label: &str,
    ) -> Result<Vec<LabeledIssue>> {
        let resolved = self.get_label(reference, label)?;
        self.list_issues(reference, &resolved.name)
    }
}

impl CommitHistorySource for GitHistory {
    fn fetch<'a>(&'a self, reference: &RepositoryReference) -> Result<CommitStream<'a>> {
        Ok(Box::new(self.commits(reference)?))
    }
}

/// In-memory commits and issues for exercising the pipeline without I/O.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct MemorySource {
    pub commits: Vec<CommitRecord>,
    pub issues: Vec<LabeledIssue>,
    /// Labels that exist; an empty list accepts every label
    pub labels: Vec<String>,
}

#[cfg(test)]
impl CommitHistorySource for MemorySource {
    fn fetch<'a>(&'a self, _reference: &RepositoryReference) -> Result<CommitStream<'a>> {
        Ok(Box::new(self.commits.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
impl LabeledIssueSource for MemorySource {
    fn fetch_by_label(
        &self,
        reference: &RepositoryReference,
        label: &str,
    ) -> Result<Vec<LabeledIssue>> {
        if !self.labels.is_empty() && !self.labels.iter().any(|l| l == label) {
            return Err(crate::Error::UnknownLabel {
                label: label.to_string(),
                repository: reference.canonical().to_string(),
            });
        }
        Ok(self.issues.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_many_iterates_fetch() {
        let source = MemorySource {
            commits: vec![CommitRecord::new("h1", Some("A")), CommitRecord::new("h2", None)],
            ..Default::default()
        };
        let references = vec![
            RepositoryReference::normalize("o/one").unwrap(),
            RepositoryReference::normalize("o/two").unwrap(),
        ];

        let names: Vec<(String, usize)> = source
            .fetch_many(&references)
            .map(|(reference, stream)| {
                (reference.local_name().to_string(), stream.unwrap().count())
            })
            .collect();
        assert_eq!(names, [("one".to_string(), 2), ("two".to_string(), 2)]);
    }

    #[test]
    fn test_memory_source_unknown_label() {
        let source = MemorySource {
            labels: vec!["good first issue".to_string()],
            ..Default::default()
        };
        let reference = RepositoryReference::normalize("o/r").unwrap();
        assert!(source.fetch_by_label(&reference, "good first issue").is_ok());
        assert!(matches!(
            source.fetch_by_label(&reference, "help wanted"),
            Err(crate::Error::UnknownLabel { .. })
        ));
    }
}
