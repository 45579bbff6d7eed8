//! Local git history
//!
//! Provides an oldest-first commit walk over a repository on disk, or over a
//! cached clone of a remote reference.
//!
//! # Example
//!
//! ```no_run
//! use goodfirst::git::GitHistory;
//! use goodfirst::locator::RepositoryReference;
//!
//! let reference = RepositoryReference::normalize("https://github.com/getify/You-Dont-Know-JS").unwrap();
//! let history = GitHistory::new("/tmp/goodfirst-clones");
//! for commit in history.commits(&reference).unwrap() {
//!     let commit = commit.unwrap();
//!     println!("{} {:?}", commit.hash, commit.author);
//! }
//! ```

pub mod history;

pub use history::{GitHistory, LocalCommits};
