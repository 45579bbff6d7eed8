//! Blocking GitHub REST client
//!
//! Covers just the three endpoints the pipeline needs. Uses ureq (sync HTTP),
//! so there is no async runtime; each page request blocks until it completes
//! or the agent's global timeout fires.

use super::types::{ApiCommit, ApiIssue, ApiLabel, Links};
use crate::config::GithubConfig;
use crate::error::{Error, Result};
use crate::locator::RepositoryReference;
use crate::models::{CommitRecord, LabeledIssue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("goodfirst/", env!("CARGO_PKG_VERSION"));

/// GitHub API client authenticated with an optional bearer token.
pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
    per_page: u32,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are mapped to Error::Api below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Self {
        Self {
            agent: make_agent(Duration::from_secs(config.timeout_secs.max(1))),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            per_page: config.per_page.clamp(1, 100),
        }
    }

    /// Build `{api_url}/repos/{owner}/{repo}/{segments...}` with each segment escaped.
    fn repo_url(&self, reference: &RepositoryReference, segments: &[&str]) -> Result<Url> {
        let (owner, repo) = reference.github_slug()?;
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| Error::Http(format!("invalid API URL '{}': {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Http(format!("API URL '{}' cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", owner, repo])
            .extend(segments);
        Ok(url)
    }

    /// GET one page and decode it, returning the pagination links alongside.
    fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<(T, Links)> {
        let mut request = self
            .agent
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request.call().map_err(|e| transport_error(url, e))?;

        let status = response.status().as_u16();
        let links = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .map(Links::parse)
            .unwrap_or_default();

        if status >= 400 {
            let message = response.into_body().read_to_string().unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        let body = response
            .into_body()
            .read_json::<T>()
            .map_err(|e| body_error(url, e))?;

        Ok((body, links))
    }

    /// List commits, oldest first.
    ///
    /// The API pages newest-first, so the returned [`CommitPages`] iterator
    /// jumps to the `rel="last"` page and walks `rel="prev"` links back to the
    /// first page, yielding each page in reverse.
    pub fn list_commits(
        &self,
        reference: &RepositoryReference,
        author: Option<&str>,
    ) -> Result<CommitPages<'_>> {
        let mut url = self.repo_url(reference, &["commits"])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", &self.per_page.to_string());
            if let Some(author) = author {
                query.append_pair("author", author);
            }
        }

        debug!("Listing commits for {} via {}", reference, url);
        Ok(CommitPages {
            client: self,
            pending: Some(url.to_string()),
            probing: true,
            first_page: Vec::new(),
            buffer: Vec::new(),
            done: false,
        })
    }

    /// Resolve a label by exact name. A 404 becomes [`Error::UnknownLabel`].
    pub fn get_label(&self, reference: &RepositoryReference, label: &str) -> Result<ApiLabel> {
        let url = self.repo_url(reference, &["labels", label])?;
        match self.get_page::<ApiLabel>(url.as_str()) {
            Ok((label, _)) => Ok(label),
            Err(Error::Api { status: 404, .. }) => Err(Error::UnknownLabel {
                label: label.to_string(),
                repository: reference.canonical().to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// List issues carrying `label` in every state, following `rel="next"`.
    ///
    /// The issues endpoint also returns pull requests; those are skipped.
    pub fn list_issues(
        &self,
        reference: &RepositoryReference,
        label: &str,
    ) -> Result<Vec<LabeledIssue>> {
        let mut url = self.repo_url(reference, &["issues"])?;
        url.query_pairs_mut()
            .append_pair("labels", label)
            // The API only returns open issues unless asked otherwise
            .append_pair("state", "all")
            .append_pair("per_page", &self.per_page.to_string());

        let mut issues = Vec::new();
        let mut skipped_pulls = 0usize;
        let mut next = Some(url.to_string());

        while let Some(page_url) = next.take() {
            let (page, links) = self.get_page::<Vec<ApiIssue>>(&page_url)?;
            debug!("Fetched {} issues from {}", page.len(), page_url);
            for issue in page {
                if issue.is_pull_request() {
                    skipped_pulls += 1;
                    continue;
                }
                issues.push(issue.into_issue());
            }
            next = links.next;
        }

        info!(
            "Found {} issues labeled '{}' in {} ({} pull requests skipped)",
            issues.len(),
            label,
            reference,
            skipped_pulls
        );
        Ok(issues)
    }
}

fn is_timeout(error: &ureq::Error) -> bool {
    match error {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(e) => e.kind() == std::io::ErrorKind::TimedOut,
        _ => false,
    }
}

fn transport_error(url: &str, error: ureq::Error) -> Error {
    if is_timeout(&error) {
        return Error::NetworkTimeout {
            url: url.to_string(),
        };
    }
    Error::Http(error.to_string())
}

/// Errors while reading a response body: deadline hits stay timeouts, the rest
/// is a decode failure.
fn body_error(url: &str, error: ureq::Error) -> Error {
    if is_timeout(&error) {
        return Error::NetworkTimeout {
            url: url.to_string(),
        };
    }
    Error::Decode(error.to_string())
}

/// Lazy, one-shot, oldest-first walk over the commit pages of a repository.
pub struct CommitPages<'a> {
    client: &'a GithubClient,
    /// Next page to request
    pending: Option<String>,
    /// True until the first page has been requested
    probing: bool,
    /// Newest page, kept from the probe and yielded last
    first_page: Vec<CommitRecord>,
    /// Current page, newest-first; popped from the back
    buffer: Vec<CommitRecord>,
    done: bool,
}

impl CommitPages<'_> {
    fn advance(&mut self) -> Result<()> {
        let Some(url) = self.pending.take() else {
            self.done = true;
            return Ok(());
        };

        let (page, links) = self.client.get_page::<Vec<ApiCommit>>(&url)?;
        let mut records: Vec<CommitRecord> = page.into_iter().map(ApiCommit::into_record).collect();
        debug!("Fetched {} commits from {}", records.len(), url);

        if std::mem::take(&mut self.probing) {
            if let Some(last) = links.last {
                debug!("Commit history spans multiple pages, starting at {}", last);
                self.first_page = records;
                self.pending = Some(last);
                return Ok(());
            }
        }

        if links.prev.is_some() && links.prev == links.first && !self.first_page.is_empty() {
            // The previous page is the probed one; append it instead of fetching it again
            let mut buffer = std::mem::take(&mut self.first_page);
            buffer.append(&mut records);
            self.buffer = buffer;
            self.pending = None;
        } else {
            self.buffer = records;
            self.pending = links.prev;
        }
        Ok(())
    }
}

impl Iterator for CommitPages<'_> {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(commit) = self.buffer.pop() {
                return Some(Ok(commit));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
