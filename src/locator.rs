//! Repository reference normalization
//!
//! Every stage that needs an API identifier or a filesystem-safe name takes a
//! [`RepositoryReference`], so the boundary arithmetic below is the only
//! place a raw reference is ever trimmed.
//!
//! Accepted forms:
//!
//! - `https://github.com/owner/name.git` (any `scheme://host/`)
//! - `git@github.com:owner/name.git`
//! - `github.com/owner/name`
//! - `owner/name`
//! - a local path such as `/home/me/src/name`

use crate::error::{Error, Result};
use std::path::Path;

/// Suffix marker of a clonable repository URL.
pub const REPOSITORY_SUFFIX: &str = ".git";

/// A normalized repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    raw: String,
    canonical: String,
    local_name: String,
}

impl RepositoryReference {
    /// Normalize a caller-supplied reference.
    ///
    /// Fails with [`Error::MalformedReference`] when the reference has no `/`
    /// separator or when nothing remains between the last separator and the
    /// `.git` suffix.
    pub fn normalize(reference: &str) -> Result<Self> {
        let trimmed = reference.trim().trim_end_matches('/');

        let last_separator = trimmed
            .rfind('/')
            .ok_or_else(|| Error::malformed(reference, "no path separator"))?;

        let suffix_start = if trimmed.ends_with(REPOSITORY_SUFFIX) {
            trimmed.len() - REPOSITORY_SUFFIX.len()
        } else {
            trimmed.len()
        };

        if suffix_start <= last_separator + 1 {
            return Err(Error::malformed(reference, "repository name is empty"));
        }

        let canonical = strip_transport(&trimmed[..suffix_start]);
        if canonical.is_empty() {
            return Err(Error::malformed(reference, "missing repository path"));
        }

        Ok(Self {
            raw: reference.trim().to_string(),
            canonical: canonical.to_string(),
            local_name: filesystem_safe(&trimmed[last_separator + 1..suffix_start]),
        })
    }

    /// The reference exactly as the caller supplied it (whitespace trimmed).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Host-qualified identifier without transport prefix or suffix, e.g. `owner/name`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Bare repository name used in output file names.
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Split the canonical identifier into GitHub's `(owner, repo)` pair.
    pub fn github_slug(&self) -> Result<(&str, &str)> {
        match self.canonical.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok((owner, name))
            }
            _ => Err(Error::malformed(
                &self.raw,
                format!("'{}' is not an owner/name repository", self.canonical),
            )),
        }
    }

    /// Whether the raw reference names an existing local directory.
    pub fn is_local_path(&self) -> bool {
        Path::new(&self.raw).is_dir()
    }
}

impl std::fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

/// Remove `scheme://host/`, `user@host:` or a leading `host.tld/` segment.
fn strip_transport(stem: &str) -> &str {
    if let Some(idx) = stem.find("://") {
        let rest = &stem[idx + 3..];
        return match rest.find('/') {
            Some(slash) => &rest[slash + 1..],
            None => "",
        };
    }

    if let Some((user_host, path)) = stem.split_once(':') {
        if user_host.contains('@') && !user_host.contains('/') {
            return path.trim_start_matches('/');
        }
    }

    // github.com/owner/name, but not ../dir/name
    if let Some((host, path)) = stem.split_once('/') {
        if host.contains('.') && !host.starts_with('.') && path.contains('/') {
            return path;
        }
    }

    stem
}

fn filesystem_safe(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(reference: &str) -> RepositoryReference {
        RepositoryReference::normalize(reference).expect("valid reference")
    }

    #[test]
    fn test_https_url_with_suffix() {
        let r = normalized("https://github.com/owner/repo.git");
        assert_eq!(r.canonical(), "owner/repo");
        assert_eq!(r.local_name(), "repo");
        assert_eq!(r.github_slug().unwrap(), ("owner", "repo"));
    }

    #[test]
    fn test_any_scheme_and_host() {
        for (input, canonical, name) in [
            ("http://example.org/a/b.git", "a/b", "b"),
            ("ssh://git.internal/team/tool", "team/tool", "tool"),
            ("https://github.com/microsoft/DeepSpeed.git", "microsoft/DeepSpeed", "DeepSpeed"),
        ] {
            let r = normalized(input);
            assert_eq!(r.canonical(), canonical, "{input}");
            assert_eq!(r.local_name(), name, "{input}");
        }
    }

    #[test]
    fn test_url_without_suffix_uses_reference_end() {
        let r = normalized("https://github.com/getify/You-Dont-Know-JS");
        assert_eq!(r.canonical(), "getify/You-Dont-Know-JS");
        assert_eq!(r.local_name(), "You-Dont-Know-JS");
    }

    #[test]
    fn test_trailing_slash_is_ignored() {
        let r = normalized("https://github.com/owner/repo/");
        assert_eq!(r.canonical(), "owner/repo");
        assert_eq!(r.local_name(), "repo");
    }

    #[test]
    fn test_scp_like_reference() {
        let r = normalized("git@github.com:owner/repo.git");
        assert_eq!(r.canonical(), "owner/repo");
        assert_eq!(r.local_name(), "repo");
    }

    #[test]
    fn test_host_qualified_and_bare_forms() {
        assert_eq!(
            normalized("github.com/xamarin/Xamarin.Forms").canonical(),
            "xamarin/Xamarin.Forms"
        );
        assert_eq!(normalized("xamarin/Xamarin.Forms").canonical(), "xamarin/Xamarin.Forms");
        assert_eq!(normalized("xamarin/Xamarin.Forms").local_name(), "Xamarin.Forms");
    }

    #[test]
    fn test_suffix_only_stripped_at_end() {
        // ".git" inside the name is part of the name
        let r = normalized("https://github.com/owner/site.github.io");
        assert_eq!(r.canonical(), "owner/site.github.io");
        assert_eq!(r.local_name(), "site.github.io");
    }

    #[test]
    fn test_relative_paths_keep_leading_dots() {
        let r = normalized("../checkouts/repo");
        assert_eq!(r.canonical(), "../checkouts/repo");
        assert_eq!(r.local_name(), "repo");
        assert!(r.github_slug().is_err());
    }

    #[test]
    fn test_local_name_is_filesystem_safe() {
        let r = normalized("owner/we ird:name");
        assert_eq!(r.local_name(), "we_ird_name");
    }

    #[test]
    fn test_missing_separator_is_malformed() {
        for input in ["repo", "repo.git", "", "   "] {
            let err = RepositoryReference::normalize(input).unwrap_err();
            assert!(matches!(err, Error::MalformedReference { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn test_empty_name_is_malformed() {
        assert!(matches!(
            RepositoryReference::normalize("owner/.git"),
            Err(Error::MalformedReference { .. })
        ));
        assert!(matches!(
            RepositoryReference::normalize("https://github.com"),
            Err(Error::MalformedReference { .. })
        ));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(normalized("https://github.com/o/r.git").to_string(), "o/r");
    }
}
