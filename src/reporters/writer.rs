//! CSV report writer
//!
//! Rows go to a temp file next to the destination, which is renamed over the
//! destination only once every row is flushed. A failed run therefore leaves
//! any earlier report with the same name untouched.

use super::ReportKind;
use crate::error::{Error, Result};
use crate::locator::RepositoryReference;
use std::io::Write;
use std::fs::Permissions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One report column: a header and a projection from the record type.
pub struct Column<T> {
    pub header: &'static str,
    pub project: fn(&T) -> String,
}

impl<T> Column<T> {
    pub const fn new(header: &'static str, project: fn(&T) -> String) -> Self {
        Self { header, project }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

/// Writes `results_<kind>_<name>.csv` files into one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Destination of a report, whether or not it exists yet.
    pub fn report_path(&self, kind: ReportKind, reference: &RepositoryReference) -> PathBuf {
        self.output_dir.join(kind.file_name(reference))
    }

    /// Write a complete report, replacing any previous file of the same name.
    ///
    /// The header row is always written, even for an empty record set.
    pub fn write<T>(
        &self,
        kind: ReportKind,
        reference: &RepositoryReference,
        records: &[T],
        columns: &[Column<T>],
    ) -> Result<PathBuf> {
        if !self.output_dir.is_dir() {
            return Err(Error::InvalidReportPath {
                path: self.output_dir.clone(),
                reason: "output directory does not exist".to_string(),
            });
        }

        let path = self.report_path(kind, reference);
        let mut temp = tempfile::Builder::new()
            .prefix(".results_")
            .suffix(".csv.partial")
            .tempfile_in(&self.output_dir)?;

        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b',')
                .quote(b'"')
                .quote_style(csv::QuoteStyle::Necessary)
                .from_writer(temp.as_file_mut());

            writer.write_record(columns.iter().map(|c| c.header))?;
            for record in records {
                writer.write_record(columns.iter().map(|c| (c.project)(record)))?;
            }
            writer.flush()?;
        }
        temp.as_file_mut().flush()?;
        if let Some(permissions) = report_permissions(&path)? {
            temp.as_file().set_permissions(permissions)?;
        }
        temp.as_file().sync_all()?;

        debug!("Persisting {} rows to {}", records.len(), path.display());
        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        info!("Wrote {} {} rows to {}", records.len(), kind, path.display());
        Ok(path)
    }
}

/// Mode the persisted report gets: that of the file it replaces, otherwise
/// `0644`. The temp file alone would be owner-only.
fn report_permissions(destination: &Path) -> Result<Option<Permissions>> {
    match std::fs::metadata(destination) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(default_permissions()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
