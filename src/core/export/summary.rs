//! Export summary and reporting
//!
//! One [`ExportSummary`] per export run, logged when the run finishes and
//! printed by the CLI.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Which export path produced the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Client-side PDF of the visible page
    Snapshot,
    /// Server-side spreadsheet of the whole filtered set
    Spreadsheet,
    /// Server-side contract PDF for one order
    Contract,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Snapshot => f.write_str("snapshot"),
            ExportKind::Spreadsheet => f.write_str("spreadsheet"),
            ExportKind::Contract => f.write_str("contract"),
        }
    }
}

/// Result of one export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub kind: ExportKind,

    /// Orders that went into the artifact
    pub order_count: usize,

    /// Where the artifact was written; `None` when nothing was written
    pub path: Option<PathBuf>,

    /// Size of the written artifact
    pub bytes: usize,

    /// Page count, for snapshots
    pub pages: Option<usize>,

    pub duration: Duration,

    /// Why nothing was written, when that happened
    pub error: Option<String>,
}

impl ExportSummary {
    /// Summary for an export that has not written anything yet
    pub fn new(kind: ExportKind, order_count: usize) -> Self {
        Self {
            kind,
            order_count,
            path: None,
            bytes: 0,
            pages: None,
            duration: Duration::from_secs(0),
            error: None,
        }
    }

    /// Record the written artifact
    pub fn written(mut self, path: PathBuf, bytes: usize) -> Self {
        self.path = Some(path);
        self.bytes = bytes;
        self
    }

    pub fn with_pages(mut self, pages: usize) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record why the export produced nothing
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// A file was written
    pub fn is_successful(&self) -> bool {
        self.path.is_some() && self.error.is_none()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        match (&self.path, &self.error) {
            (Some(path), None) => tracing::info!(
                kind = %self.kind,
                orders = self.order_count,
                path = %path.display(),
                bytes = self.bytes,
                pages = ?self.pages,
                duration_ms = self.duration.as_millis() as u64,
                "Export completed"
            ),
            _ => tracing::warn!(
                kind = %self.kind,
                orders = self.order_count,
                error = self.error.as_deref().unwrap_or("nothing written"),
                duration_ms = self.duration.as_millis() as u64,
                "Export produced no file"
            ),
        }
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.error) {
            (Some(path), None) => {
                write!(
                    f,
                    "{} written to {} ({} orders, {} bytes",
                    self.kind,
                    path.display(),
                    self.order_count,
                    self.bytes
                )?;
                if let Some(pages) = self.pages {
                    write!(f, ", {pages} pages")?;
                }
                write!(f, ")")
            }
            (_, Some(error)) => write!(f, "{} export failed: {error}", self.kind),
            (None, None) => write!(f, "{} export produced no file", self.kind),
        }
    }
}
