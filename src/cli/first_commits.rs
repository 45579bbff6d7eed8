//! `first-commits` command

use anyhow::{bail, Result};
use console::style;

use super::{history_source, normalize_all, spinner, warn_if_anonymous};
use crate::config::{Config, SourceKind};
use crate::extract;
use crate::reporters::{self, ReportKind, ReportWriter};

pub fn run(config: &Config, repositories: &[String], kind: SourceKind) -> Result<()> {
    let references = normalize_all(repositories)?;
    let writer = ReportWriter::new(&config.report.output_dir);
    let source = history_source(kind, config);
    if kind == SourceKind::Api {
        warn_if_anonymous(&config.github);
    }

    let mut failed = 0usize;
    for (reference, stream) in source.fetch_many(&references) {
        let bar = spinner(format!("Walking {} ({})", reference, kind));
        let outcome = stream
            .and_then(|commits| {
                extract::extract_stream_with(commits, |traversed, contributors| {
                    bar.set_message(format!(
                        "{}: {} commits, {} contributors",
                        reference, traversed, contributors
                    ))
                })
            })
            .and_then(|summary| {
                let path = writer.write(
                    ReportKind::FirstCommit,
                    reference,
                    &summary.contributions,
                    &reporters::first_commit_columns(),
                )?;
                Ok((summary, path))
            });
        bar.finish_and_clear();

        match outcome {
            Ok((summary, path)) => println!(
                "{} {} {} contributors across {} commits -> {}",
                style("✓").green(),
                style(reference).bold(),
                summary.contributions.len(),
                summary.total_commits,
                style(path.display()).cyan()
            ),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), style(reference).bold(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} repositories failed", failed, references.len());
    }
    Ok(())
}
