//! Configuration for goodfirst
//!
//! Settings are resolved with the following priority (highest last):
//! 1. Built-in defaults
//! 2. User config (`~/.config/goodfirst/config.toml`)
//! 3. Project config (`./goodfirst.toml`, or the file given with `--config`)
//! 4. Environment variables (`GITHUB_TOKEN`, `GOODFIRST_API_URL`)
//! 5. CLI flags (applied by the caller)
//!
//! # Configuration Format
//!
//! ```toml
//! [github]
//! # token = "ghp_..."            # prefer the GITHUB_TOKEN env var
//! api_url = "https://api.github.com"
//! timeout_secs = 60
//! per_page = 100
//!
//! [defaults]
//! label = "good first issue"
//! source = "api"                 # "api" or "local"
//!
//! [report]
//! output_dir = "."
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "goodfirst.toml";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_LABEL: &str = "good first issue";

/// Where commit history comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// GitHub REST API (commit authors are logins)
    #[default]
    Api,
    /// Local or cloned git repository (commit authors are names)
    Local,
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api" | "github" | "remote" => Ok(SourceKind::Api),
            "local" | "git" => Ok(SourceKind::Local),
            _ => Err(anyhow::anyhow!("Unknown source '{}'. Valid sources: api, local", s)),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Api => write!(f, "api"),
            SourceKind::Local => write!(f, "local"),
        }
    }
}

/// GitHub API settings.
#[derive(Clone, Serialize)]
pub struct GithubConfig {
    /// Bearer token; never logged or written to reports
    pub token: Option<String>,
    pub api_url: String,
    /// Global deadline for a single request
    pub timeout_secs: u64,
    pub per_page: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 60,
            per_page: 100,
        }
    }
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("per_page", &self.per_page)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DefaultsConfig {
    pub label: String,
    pub source: SourceKind,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            source: SourceKind::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Config {
    pub github: GithubConfig,
    pub defaults: DefaultsConfig,
    pub report: ReportConfig,
}

/// On-disk layout; every field optional so files can be partial.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub github: GithubSection,
    #[serde(default)]
    pub defaults: DefaultsSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct GithubSection {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DefaultsSection {
    pub label: Option<String>,
    pub source: Option<SourceKind>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportSection {
    pub output_dir: Option<PathBuf>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

impl Config {
    /// Load config from all sources.
    ///
    /// An explicit `--config` path must exist; the user and project files are
    /// optional. A broken user config is skipped with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            match ConfigFile::read(&path) {
                Ok(file) => {
                    debug!("Loaded user config from {}", path.display());
                    config.merge(file);
                }
                Err(e) => warn!("Ignoring user config: {:#}", e),
            }
        }

        let project = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(PathBuf::from(PROJECT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        if let Some(path) = project {
            config.merge(ConfigFile::read(&path)?);
            debug!("Loaded project config from {}", path.display());
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("goodfirst").join("config.toml"))
    }

    /// Directory holding clones of remote repositories for the local source.
    pub fn clone_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("goodfirst")
            .join("clones")
    }

    /// Merge a config file into this one (file takes priority)
    pub fn merge(&mut self, file: ConfigFile) {
        if file.github.token.is_some() {
            self.github.token = file.github.token;
        }
        if let Some(api_url) = file.github.api_url {
            self.github.api_url = api_url;
        }
        if let Some(timeout) = file.github.timeout_secs {
            self.github.timeout_secs = timeout;
        }
        if let Some(per_page) = file.github.per_page {
            self.github.per_page = per_page.clamp(1, 100);
        }
        if let Some(label) = file.defaults.label {
            self.defaults.label = label;
        }
        if let Some(source) = file.defaults.source {
            self.defaults.source = source;
        }
        if let Some(dir) = file.report.output_dir {
            self.report.output_dir = dir;
        }
    }

    /// Environment variables override everything except CLI flags.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.github.token = Some(token);
        }
        if let Some(url) = lookup("GOODFIRST_API_URL").filter(|u| !u.is_empty()) {
            self.github.api_url = url;
        }
    }

    /// Render the effective config as TOML with the token redacted.
    pub fn to_redacted_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if shown.github.token.is_some() {
            shown.github.token = Some("<redacted>".to_string());
        }
        Ok(toml::to_string_pretty(&shown)?)
    }

    /// Create the user config directory with an example config file.
    pub fn init_user_config() -> Result<PathBuf> {
        let config_path = Self::user_config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if !config_path.exists() {
            std::fs::write(&config_path, EXAMPLE_CONFIG)?;
        }

        Ok(config_path)
    }
}

const EXAMPLE_CONFIG: &str = r#"# goodfirst user configuration

[github]
# Prefer exporting GITHUB_TOKEN instead of storing the token here.
# token = "ghp_..."
# api_url = "https://api.github.com"
# timeout_secs = 60
# per_page = 100

[defaults]
# label = "good first issue"
# source = "api"

[report]
# output_dir = "."
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_url, DEFAULT_API_URL);
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.defaults.label, "good first issue");
        assert_eq!(config.defaults.source, SourceKind::Api);
        assert_eq!(config.report.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let file = ConfigFile::parse(
            r#"
[github]
timeout_secs = 5
per_page = 500

[defaults]
source = "local"
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.merge(file);
        assert_eq!(config.github.timeout_secs, 5);
        assert_eq!(config.github.per_page, 100, "per_page is capped at the API maximum");
        assert_eq!(config.github.api_url, DEFAULT_API_URL);
        assert_eq!(config.defaults.source, SourceKind::Local);
        assert_eq!(config.defaults.label, DEFAULT_LABEL);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.merge(ConfigFile::parse("[github]\ntoken = \"from-file\"\n").unwrap());
        config.apply_env(|key| match key {
            "GITHUB_TOKEN" => Some("from-env".to_string()),
            _ => None,
        });
        assert_eq!(config.github.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_empty_env_token_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some(String::new()));
        assert!(config.github.token.is_none());
        assert_eq!(config.github.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_token_never_shown() {
        let mut config = Config::default();
        config.github.token = Some("secret-token".to_string());
        assert!(!format!("{:?}", config).contains("secret-token"));
        let shown = config.to_redacted_toml().unwrap();
        assert!(!shown.contains("secret-token"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn test_source_kind_parsing() {
        assert_eq!(SourceKind::from_str("API").unwrap(), SourceKind::Api);
        assert_eq!(SourceKind::from_str("local").unwrap(), SourceKind::Local);
        assert!(SourceKind::from_str("svn").is_err());
    }
}
