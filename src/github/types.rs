//! GitHub REST v3 response types and `Link` header pagination

use crate::models::{CommitRecord, IssueState, LabeledIssue};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSignature {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiGitCommit {
    #[serde(default)]
    pub message: String,
    pub author: Option<ApiSignature>,
}

/// Entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Deserialize)]
pub struct ApiCommit {
    pub sha: String,
    pub html_url: Option<String>,
    pub commit: ApiGitCommit,
    /// `null` when the author's account no longer exists
    pub author: Option<ApiUser>,
}

impl ApiCommit {
    pub fn into_record(self) -> CommitRecord {
        let timestamp = self
            .commit
            .author
            .as_ref()
            .and_then(|sig| sig.date)
            .unwrap_or_default();

        CommitRecord {
            hash: self.sha,
            message: self.commit.message,
            author: self.author.map(|user| user.login),
            timestamp,
            url: self.html_url.filter(|url| !url.is_empty()),
        }
    }
}

/// Response of `GET /repos/{owner}/{repo}/labels/{name}`
#[derive(Debug, Deserialize)]
pub struct ApiLabel {
    pub name: String,
}

/// Entry of `GET /repos/{owner}/{repo}/issues`
#[derive(Debug, Deserialize)]
pub struct ApiIssue {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub state: IssueState,
    #[serde(default)]
    pub assignees: Vec<ApiUser>,
    /// Present when the entry is a pull request
    pub pull_request: Option<serde_json::Value>,
}

impl ApiIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn into_issue(self) -> LabeledIssue {
        LabeledIssue {
            number: self.number,
            title: self.title,
            assignees: self.assignees.into_iter().map(|user| user.login).collect(),
            url: self.html_url,
            state: self.state,
        }
    }
}

/// Relations parsed from a `Link` response header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl Links {
    /// Parse `<url>; rel="next", <url>; rel="last"`.
    pub fn parse(header: &str) -> Self {
        let mut links = Links::default();

        for part in header.split(',') {
            let mut pieces = part.split(';');
            let Some(target) = pieces.next() else {
                continue;
            };
            let target = target.trim();
            let Some(url) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) else {
                continue;
            };

            for param in pieces {
                let Some(rel) = param.trim().strip_prefix("rel=") else {
                    continue;
                };
                for rel in rel.trim_matches('"').split_whitespace() {
                    let slot = match rel {
                        "next" => &mut links.next,
                        "prev" => &mut links.prev,
                        "first" => &mut links.first,
                        "last" => &mut links.last,
                        _ => continue,
                    };
                    *slot = Some(url.to_string());
                }
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_github_link_header() {
        let header = r#"<https://api.github.com/repositories/1/commits?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/commits?per_page=100&page=7>; rel="last""#;
        let links = Links::parse(header);
        assert_eq!(
            links.next.as_deref(),
            Some("https://api.github.com/repositories/1/commits?per_page=100&page=2")
        );
        assert_eq!(
            links.last.as_deref(),
            Some("https://api.github.com/repositories/1/commits?per_page=100&page=7")
        );
        assert!(links.prev.is_none());
        assert!(links.first.is_none());
    }

    #[test]
    fn test_parse_last_page_links() {
        let header = r#"<https://x/c?page=6>; rel="prev", <https://x/c?page=1>; rel="first""#;
        let links = Links::parse(header);
        assert_eq!(links.prev.as_deref(), Some("https://x/c?page=6"));
        assert_eq!(links.first.as_deref(), Some("https://x/c?page=1"));
        assert!(links.next.is_none());
        assert!(links.last.is_none());
    }

    #[test]
    fn test_parse_garbage_yields_nothing() {
        assert_eq!(Links::parse(""), Links::default());
        assert_eq!(Links::parse("not a link"), Links::default());
    }

    #[test]
    fn test_commit_with_deleted_author() {
        let json = r#"{
            "sha": "abc123",
            "html_url": "https://github.com/o/r/commit/abc123",
            "commit": {
                "message": "Initial commit",
                "author": {"name": "Ghost", "email": "g@example.com", "date": "2019-05-01T10:00:00Z"}
            },
            "author": null
        }"#;
        let record = serde_json::from_str::<ApiCommit>(json).unwrap().into_record();
        assert_eq!(record.hash, "abc123");
        assert_eq!(record.author, None);
        assert_eq!(record.url.as_deref(), Some("https://github.com/o/r/commit/abc123"));
        assert_eq!(record.timestamp.to_rfc3339(), "2019-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_commit_author_is_login() {
        let json = r#"{
            "sha": "def456",
            "html_url": null,
            "commit": {"message": "Fix", "author": {"name": "Alice Doe", "date": "2020-01-01T00:00:00Z"}},
            "author": {"login": "alice"}
        }"#;
        let record = serde_json::from_str::<ApiCommit>(json).unwrap().into_record();
        assert_eq!(record.author.as_deref(), Some("alice"));
        assert_eq!(record.url, None);
    }

    #[test]
    fn test_issue_conversion() {
        let json = r#"{
            "number": 42,
            "title": "Improve docs",
            "html_url": "https://github.com/o/r/issues/42",
            "state": "closed",
            "assignees": [{"login": "alice"}, {"login": "bob"}]
        }"#;
        let issue: ApiIssue = serde_json::from_str(json).unwrap();
        assert!(!issue.is_pull_request());
        let issue = issue.into_issue();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.state, IssueState::Closed);
        assert!(issue.is_assigned_to("alice"));
        assert!(issue.is_assigned_to("bob"));
    }

    #[test]
    fn test_pull_request_entry_detected() {
        let json = r#"{"number": 7, "title": "PR", "state": "open", "assignees": [], "pull_request": {"url": "x"}}"#;
        let issue: ApiIssue = serde_json::from_str(json).unwrap();
        assert!(issue.is_pull_request());
    }
}
