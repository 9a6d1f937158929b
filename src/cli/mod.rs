//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for orderdesk using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// orderdesk - order console for the course-sales service
#[derive(Parser, Debug)]
#[command(name = "orderdesk")]
#[command(version, about, long_about = None)]
#[command(author = "orderdesk contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "orderdesk.toml", env = "ORDERDESK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ORDERDESK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List orders, filtered and paginated
    Orders(commands::orders::OrdersArgs),

    /// List courses with their successful purchase counts, or update or
    /// delete one
    Courses(commands::courses::CoursesArgs),

    /// Export a PDF snapshot or a spreadsheet
    Export(commands::export::ExportArgs),

    /// Download the contract PDF for a paid order
    Contract(commands::contract::ContractArgs),

    /// Manage the stored session token
    Session(commands::session::SessionArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
