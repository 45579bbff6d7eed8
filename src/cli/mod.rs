//! CLI command definitions and handlers

mod analyze;
mod first_commits;
mod tagged_issues;
mod user_commits;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{Config, GithubConfig, SourceKind};
use crate::git::GitHistory;
use crate::github::GithubClient;
use crate::locator::RepositoryReference;
use crate::sources::CommitHistorySource;

/// goodfirst - first contributions vs. good first issues
#[derive(Parser, Debug)]
#[command(name = "goodfirst")]
#[command(
    version,
    about = "Mine first contributions and good-first-issue data from GitHub repositories",
    long_about = "goodfirst walks a repository's commit history, keeps the first commit of \
every contributor, and cross-references those contributors with the assignees of issues \
carrying an entry-level label such as \"good first issue\". Results are written to \
results_<kind>_<repository>.csv files for manual analysis.",
    after_help = "\
Examples:
  goodfirst analyze https://github.com/microsoft/DeepSpeed.git
  goodfirst analyze owner/a owner/b --label \"good first issue\"
  goodfirst first-commits https://github.com/getify/You-Dont-Know-JS --source local
  goodfirst tagged-issues owner/repo --label \"help wanted\"
  goodfirst user-commits xamarin/Xamarin.Forms --author VincentDondain

Set GITHUB_TOKEN to raise the API rate limit."
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Project config file (default: ./goodfirst.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory reports are written to (default: current directory)
    #[arg(long, short = 'o', global = true)]
    pub output_dir: Option<PathBuf>,

    /// GitHub access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: first commits, tagged issues and their matches
    Analyze {
        /// Repository URLs, owner/name pairs or local paths
        #[arg(required = true)]
        repositories: Vec<String>,

        /// Entry-level label to cross-reference (default: "good first issue")
        #[arg(long, short = 'l')]
        label: Option<String>,

        /// Commit history source: api or local
        #[arg(long, value_parser = ["api", "local"])]
        source: Option<String>,

        /// Only write the first-commit report
        #[arg(long)]
        no_issues: bool,
    },

    /// Write the first commit of every contributor
    FirstCommits {
        /// Repository URLs, owner/name pairs or local paths
        #[arg(required = true)]
        repositories: Vec<String>,

        /// Commit history source: api or local
        #[arg(long, value_parser = ["api", "local"])]
        source: Option<String>,
    },

    /// Write every issue (open or closed) carrying a label
    TaggedIssues {
        /// Repository URL or owner/name pair
        repository: String,

        /// Label to look up (default: "good first issue")
        #[arg(long, short = 'l')]
        label: Option<String>,
    },

    /// List every commit of one author
    UserCommits {
        /// Repository URL or owner/name pair
        repository: String,

        /// GitHub login (or email) of the author
        #[arg(long, short = 'a')]
        author: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create the user config file with example settings
    Init,
    /// Show the effective config (token redacted) and its paths
    Show,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Analyze {
            repositories,
            label,
            source,
            no_issues,
        } => {
            let label = (!no_issues)
                .then(|| label.unwrap_or_else(|| config.defaults.label.clone()));
            analyze::run(&config, &repositories, label, source_kind(source.as_deref(), &config)?)
        }

        Commands::FirstCommits {
            repositories,
            source,
        } => first_commits::run(&config, &repositories, source_kind(source.as_deref(), &config)?),

        Commands::TaggedIssues { repository, label } => {
            let label = label.unwrap_or_else(|| config.defaults.label.clone());
            tagged_issues::run(&config, &repository, &label)
        }

        Commands::UserCommits { repository, author } => {
            user_commits::run(&config, &repository, &author)
        }

        Commands::Config { action } => run_config_action(action, &config),
    }
}

/// Resolve config files and env, then apply CLI flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.output_dir {
        config.report.output_dir = dir.clone();
    }
    if let Some(token) = cli.token.as_ref().filter(|t| !t.is_empty()) {
        config.github.token = Some(token.clone());
    }
    Ok(config)
}

fn source_kind(flag: Option<&str>, config: &Config) -> Result<SourceKind> {
    match flag {
        Some(s) => SourceKind::from_str(s),
        None => Ok(config.defaults.source),
    }
}

/// Normalize every reference before any network call or report is made.
fn normalize_all(raw: &[String]) -> Result<Vec<RepositoryReference>> {
    raw.iter()
        .map(|r| RepositoryReference::normalize(r).map_err(anyhow::Error::from))
        .collect()
}

/// Build the commit history source for `kind`.
fn history_source(kind: SourceKind, config: &Config) -> Box<dyn CommitHistorySource> {
    match kind {
        SourceKind::Api => Box::new(GithubClient::new(&config.github)),
        SourceKind::Local => Box::new(GitHistory::new(Config::clone_cache_dir())),
    }
}

fn warn_if_anonymous(github: &GithubConfig) {
    if github.token.is_none() {
        tracing::warn!(
            "No GitHub token configured; unauthenticated requests are limited to 60 per hour"
        );
    }
}

/// Create spinner progress style
fn create_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(create_spinner_style());
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn run_config_action(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = Config::init_user_config().context("Failed to create user config")?;
            println!("{} Config file: {}", style("✓").green(), style(path.display()).cyan());
            Ok(())
        }
        ConfigAction::Show => {
            println!("{}", style("Config paths").bold());
            match Config::user_config_path() {
                Some(path) => println!("  User:    {}", style(path.display()).dim()),
                None => println!("  User:    {}", style("(no config directory)").dim()),
            }
            println!("  Project: {}", style(crate::config::PROJECT_CONFIG_FILE).dim());
            println!("  Clones:  {}", style(Config::clone_cache_dir().display()).dim());
            println!();
            print!("{}", config.to_redacted_toml()?);
            Ok(())
        }
    }
}
