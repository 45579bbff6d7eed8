//! Local commit history using libgit2
//!
//! Walks a repository oldest-first with the git2 crate (Rust bindings to
//! libgit2). Remote references are cloned once into a cache directory and
//! fetched on later runs.

use crate::error::Result;
use crate::locator::RepositoryReference;
use crate::models::CommitRecord;
use chrono::{DateTime, TimeZone, Utc};
use git2::{Oid, Repository, Sort};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Commit history source backed by a local or cached git repository.
pub struct GitHistory {
    clone_root: PathBuf,
}

impl GitHistory {
    /// Create a history source that clones remote references under `clone_root`.
    pub fn new(clone_root: impl Into<PathBuf>) -> Self {
        Self {
            clone_root: clone_root.into(),
        }
    }

    /// Directory a remote reference is cloned into.
    pub fn clone_dir(&self, reference: &RepositoryReference) -> PathBuf {
        let dir_name: String = reference
            .canonical()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') { c } else { '_' })
            .collect();
        self.clone_root.join(dir_name)
    }

    /// Open the repository, cloning or fetching it first when it is remote.
    fn open(&self, reference: &RepositoryReference) -> Result<(Repository, Tip)> {
        if reference.is_local_path() {
            let repo = Repository::discover(reference.raw())?;
            debug!("Opened git repository at {:?}", repo.path());
            return Ok((repo, Tip::Head));
        }

        let dest = self.clone_dir(reference);
        if let Ok(repo) = Repository::open(&dest) {
            info!("Fetching {} into existing clone {}", reference, dest.display());
            {
                let mut remote = repo.find_remote("origin")?;
                remote.fetch(&[] as &[&str], None, None)?;
            }
            return Ok((repo, Tip::OriginHead));
        }

        let url = clone_url(reference);
        info!("Cloning {} into {}", url, dest.display());
        std::fs::create_dir_all(&self.clone_root)?;
        Ok((Repository::clone(&url, &dest)?, Tip::OriginHead))
    }

    /// All commits reachable from the repository tip, oldest first.
    ///
    /// A local checkout is walked from its own `HEAD`; a cached clone from
    /// `origin/HEAD`.
    pub fn commits(&self, reference: &RepositoryReference) -> Result<LocalCommits> {
        let (repo, tip) = self.open(reference)?;
        let oids = walk_oldest_first(&repo, tip)?;

        debug!("Revwalk of {} found {} commits", reference, oids.len());
        Ok(LocalCommits {
            repo,
            oids: oids.into_iter(),
        })
    }
}

/// Where the revwalk starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tip {
    /// The checkout's own `HEAD`, including unpushed commits
    Head,
    /// `origin/HEAD`, falling back to `HEAD` when the remote has none
    OriginHead,
}

fn walk_oldest_first(repo: &Repository, tip: Tip) -> Result<Vec<Oid>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
    match (tip, remote_head(repo)) {
        (Tip::OriginHead, Some(oid)) => revwalk.push(oid)?,
        _ => revwalk.push_head()?,
    }
    Ok(revwalk.collect::<std::result::Result<Vec<Oid>, _>>()?)
}

/// `origin/HEAD` of a cached clone, which stays current after a fetch.
fn remote_head(repo: &Repository) -> Option<Oid> {
    repo.find_reference("refs/remotes/origin/HEAD")
        .and_then(|r| r.resolve())
        .ok()
        .and_then(|r| r.target())
}

/// Bare `owner/name` references are assumed to live on GitHub.
fn clone_url(reference: &RepositoryReference) -> String {
    let raw = reference.raw();
    if raw.contains("://") || raw.contains('@') {
        raw.to_string()
    } else {
        format!("https://github.com/{}.git", reference.canonical())
    }
}

/// Lazy walk over commit objects; the oid list is resolved up front.
pub struct LocalCommits {
    repo: Repository,
    oids: std::vec::IntoIter<Oid>,
}

impl Iterator for LocalCommits {
    type Item = Result<CommitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.oids.next()?;
        Some(
            self.repo
                .find_commit(oid)
                .map(|commit| to_record(&commit))
                .map_err(Into::into),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.oids.size_hint()
    }
}

fn to_record(commit: &git2::Commit) -> CommitRecord {
    let author = commit.author();
    let name = author.name().map(str::trim).filter(|n| !n.is_empty());
    if author.name().is_none() {
        warn!("Commit {} has a non UTF-8 author name", commit.id());
    }

    CommitRecord {
        hash: commit.id().to_string(),
        message: commit.message().unwrap_or("").to_string(),
        author: name.map(str::to_string),
        timestamp: git_time(&author.when()),
        url: None,
    }
}

fn git_time(time: &git2::Time) -> DateTime<Utc> {
    Utc.timestamp_opt(time.seconds(), 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};
    use std::path::Path;
    use tempfile::tempdir;

    /// Build a repo with one commit per `(author, message, seconds)` entry.
    fn create_test_repo(commits: &[(&str, &str, i64)]) -> anyhow::Result<tempfile::TempDir> {
        let dir = tempdir()?;
        let repo = Repository::init(dir.path())?;

        let mut parent: Option<Oid> = None;
        for (i, (author, message, seconds)) in commits.iter().enumerate() {
            let file = format!("file{}.txt", i);
            std::fs::write(dir.path().join(&file), message)?;
            let mut index = repo.index()?;
            index.add_path(Path::new(&file))?;
            index.write()?;
            let tree = repo.find_tree(index.write_tree()?)?;

            let sig = Signature::new(author, "dev@example.com", &Time::new(*seconds, 0))?;
            let parents = match parent {
                Some(oid) => vec![repo.find_commit(oid)?],
                None => vec![],
            };
            let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
            parent = Some(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)?);
        }

        Ok(dir)
    }

    #[test]
    fn test_commits_are_oldest_first() -> anyhow::Result<()> {
        let dir = create_test_repo(&[
            ("Alice", "Initial commit", 1_000),
            ("Bob", "Add parser", 2_000),
            ("Alice", "Fix parser", 3_000),
        ])?;
        let reference = RepositoryReference::normalize(dir.path().to_str().unwrap())?;
        assert!(reference.is_local_path());

        let history = GitHistory::new(dir.path().join("clones"));
        let records: Vec<CommitRecord> = history.commits(&reference)?.collect::<Result<_>>()?;

        let messages: Vec<&str> = records.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, ["Initial commit", "Add parser", "Fix parser"]);
        assert_eq!(records[1].author.as_deref(), Some("Bob"));
        assert_eq!(records[0].timestamp.timestamp(), 1_000);
        assert!(records.iter().all(|c| c.url.is_none()));
        Ok(())
    }

    /// Point `origin/HEAD` at the oldest commit, leaving local `HEAD` ahead.
    fn lag_origin_head(repo: &Repository) -> anyhow::Result<Oid> {
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;
        revwalk.push_head()?;
        let oldest = revwalk.next().expect("at least one commit")?;
        repo.reference("refs/remotes/origin/main", oldest, true, "test")?;
        repo.reference_symbolic(
            "refs/remotes/origin/HEAD",
            "refs/remotes/origin/main",
            true,
            "test",
        )?;
        Ok(oldest)
    }

    #[test]
    fn test_local_checkout_walks_unpushed_commits() -> anyhow::Result<()> {
        let dir = create_test_repo(&[
            ("alice", "Initial commit", 1_000),
            ("bob", "Unpushed work", 2_000),
        ])?;
        lag_origin_head(&Repository::open(dir.path())?)?;

        let reference = RepositoryReference::normalize(dir.path().to_str().unwrap())?;
        let history = GitHistory::new(dir.path().join("clones"));
        let authors: Vec<Option<String>> = history
            .commits(&reference)?
            .map(|c| c.map(|c| c.author))
            .collect::<Result<_>>()?;

        assert_eq!(authors, [Some("alice".to_string()), Some("bob".to_string())]);
        Ok(())
    }

    #[test]
    fn test_cached_clone_walks_origin_head() -> anyhow::Result<()> {
        let dir = create_test_repo(&[
            ("alice", "Initial commit", 1_000),
            ("bob", "Local only", 2_000),
        ])?;
        let repo = Repository::open(dir.path())?;
        let oldest = lag_origin_head(&repo)?;

        assert_eq!(walk_oldest_first(&repo, Tip::OriginHead)?, [oldest]);
        assert_eq!(walk_oldest_first(&repo, Tip::Head)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_origin_head_falls_back_to_head() -> anyhow::Result<()> {
        let dir = create_test_repo(&[
            ("alice", "Initial commit", 1_000),
            ("bob", "Second", 2_000),
        ])?;
        let repo = Repository::open(dir.path())?;
        assert_eq!(walk_oldest_first(&repo, Tip::OriginHead)?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_clone_dir_is_flat() {
        let history = GitHistory::new("/cache");
        let reference =
            RepositoryReference::normalize("https://github.com/owner/repo.git").unwrap();
        assert_eq!(history.clone_dir(&reference), PathBuf::from("/cache/owner_repo"));
        assert_eq!(clone_url(&reference), "https://github.com/owner/repo.git");

        let bare = RepositoryReference::normalize("owner/repo").unwrap();
        assert_eq!(clone_url(&bare), "https://github.com/owner/repo.git");
    }
}
