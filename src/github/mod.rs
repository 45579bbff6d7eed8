//! GitHub REST API access
//!
//! Reads the token from configuration (usually the `GITHUB_TOKEN` env var);
//! the client itself never looks up credentials.

mod client;
pub mod types;

pub use client::{CommitPages, GithubClient};
pub use types::Links;
