//! Export command implementation
//!
//! This module implements the `export` command:
//!
//! - `export snapshot` renders the visible page to a multi-page PDF locally
//! - `export spreadsheet` asks the service for a spreadsheet of every order
//!   matching the filters, across all pages

use super::{exit_code_for, load_valid_config, open_console, FilterArgs};
use crate::core::export::ExportSummary;
use crate::domain::Result;
use clap::{Args, Subcommand};
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(subcommand)]
    pub target: ExportTarget,
}

/// What to export
#[derive(Subcommand, Debug)]
pub enum ExportTarget {
    /// PDF snapshot of the visible page
    Snapshot(FilterArgs),

    /// Spreadsheet of every filtered order
    Spreadsheet(FilterArgs),
}

impl ExportTarget {
    fn filters(&self) -> &FilterArgs {
        match self {
            ExportTarget::Snapshot(f) | ExportTarget::Spreadsheet(f) => f,
        }
    }
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let config = match load_valid_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let console = match open_console(&config, &mut cancel).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        if let Err(e) = self.target.filters().apply(&console) {
            eprintln!("❌ {e}");
            return Ok(exit_code_for(&e));
        }

        println!("🚀 Starting export...");
        let result = match &self.target {
            ExportTarget::Snapshot(_) => console.export_snapshot().await,
            ExportTarget::Spreadsheet(_) => console.export_spreadsheet().await,
        };

        Ok(report(result))
    }
}

/// Print the outcome of an export and return its exit code
pub(crate) fn report(result: Result<ExportSummary>) -> i32 {
    match result {
        Ok(summary) => {
            println!("✅ {summary}");
            println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
            0
        }
        Err(e) => {
            println!("⚠️  Nothing exported: {e}");
            exit_code_for(&e)
        }
    }
}
