//! goodfirst - first-contribution mining for GitHub repositories
//!
//! Walks a repository's commit history, keeps the first commit of every
//! contributor, cross-references those contributors with the assignees of
//! issues carrying an entry-level label (e.g. "good first issue"), and writes
//! the results to CSV files for manual research analysis.
//!
//! # Example
//!
//! ```no_run
//! use goodfirst::config::GithubConfig;
//! use goodfirst::extract::extract_stream;
//! use goodfirst::github::GithubClient;
//! use goodfirst::locator::RepositoryReference;
//! use goodfirst::reporters::{first_commit_columns, ReportKind, ReportWriter};
//! use goodfirst::sources::CommitHistorySource;
//!
//! let reference = RepositoryReference::normalize("https://github.com/owner/repo.git")?;
//! let client = GithubClient::new(&GithubConfig::default());
//! let summary = extract_stream(client.fetch(&reference)?)?;
//!
//! let writer = ReportWriter::new(".");
//! writer.write(
//!     ReportKind::FirstCommit,
//!     &reference,
//!     &summary.contributions,
//!     &first_commit_columns(),
//! )?;
//! # Ok::<(), goodfirst::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod git;
pub mod github;
pub mod locator;
pub mod matcher;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod sources;

pub use error::{Error, Result};
