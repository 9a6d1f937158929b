//! CLI command implementations
//!
//! This module contains all CLI command implementations.
//!
//! Exit codes shared by every command:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Nothing exported or changed (rejected or failed export or course change, empty selection) |
//! | 2 | Configuration error |
//! | 3 | Authorization failure |
//! | 4 | Connection failure |
//! | 5 | Fatal error |
//! | 130 | Interrupted |

pub mod contract;
pub mod courses;
pub mod export;
pub mod init;
pub mod orders;
pub mod session;
pub mod validate;

use crate::config::{load_config, DeskConfig};
use crate::core::filter::{DateRange, FilterCriteria};
use crate::core::view::{LoadOutcome, OrderConsole};
use crate::domain::{DeskError, OrderStatus, PaymentType};
use chrono::NaiveDate;
use clap::Args;
use tokio::sync::watch;

/// Exit code for an interrupted command (standard Unix convention)
pub const EXIT_INTERRUPTED: i32 = 130;

/// Map a crate error to the process exit code
pub fn exit_code_for(error: &DeskError) -> i32 {
    if error.is_unauthorized() {
        return 3;
    }
    if error.is_connection_failure() {
        return 4;
    }
    match error {
        DeskError::Configuration(_) => 2,
        DeskError::Validation(_)
        | DeskError::Ineligible(_)
        | DeskError::InvalidResponseFormat { .. }
        | DeskError::Export(_)
        | DeskError::CourseChange { .. } => 1,
        _ => 5,
    }
}

/// Filter and pagination flags shared by the order-listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Order status (UNPAID, INVOICED, PAID, CANCELLED)
    #[arg(long)]
    pub status: Option<String>,

    /// Payment provider (PAYME, CLICK, UZUM)
    #[arg(long)]
    pub payment_type: Option<String>,

    /// First creation day to include (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE", requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last creation day to include (YYYY-MM-DD, UTC)
    #[arg(long, value_name = "DATE", requires = "from")]
    pub to: Option<NaiveDate>,

    /// Exact course title
    #[arg(long)]
    pub course: Option<String>,

    /// Page to show (1-based)
    #[arg(long)]
    pub page: Option<usize>,

    /// Orders per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl FilterArgs {
    /// Build filter criteria from the flags
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Validation`] when the date range is inverted.
    pub fn criteria(&self) -> crate::domain::Result<FilterCriteria> {
        let mut criteria = FilterCriteria::any();
        if let Some(status) = &self.status {
            criteria = criteria.with_status(OrderStatus::parse(status));
        }
        if let Some(payment_type) = &self.payment_type {
            criteria = criteria.with_payment_type(PaymentType::parse(payment_type));
        }
        if let (Some(from), Some(to)) = (self.from, self.to) {
            let range = DateRange::whole_days(from, to).map_err(DeskError::Validation)?;
            criteria = criteria.with_date_range(range);
        }
        if let Some(course) = &self.course {
            criteria = criteria.with_course_title(course.clone());
        }
        Ok(criteria)
    }

    /// Push criteria, page size and page into the console's view
    ///
    /// Page size is applied before the page so a requested page is resolved
    /// against the requested size. An out-of-range page leaves the view on
    /// page 1 and logs a warning.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Validation`] for an inverted date range or a page
    /// size of zero.
    pub fn apply(&self, console: &OrderConsole) -> crate::domain::Result<()> {
        let store = console.store();
        store.set_criteria(self.criteria()?);
        if let Some(page_size) = self.page_size {
            store.set_page_size(page_size)?;
        }
        if let Some(page) = self.page {
            if page != store.snapshot().window.current() && !store.go_to_page(page) {
                tracing::warn!(
                    page,
                    total_pages = store.snapshot().window.total_pages(),
                    "Requested page is out of range, staying on page 1"
                );
            }
        }
        Ok(())
    }
}

/// Load and validate the configuration, printing the problem on failure
///
/// Returns the exit code to use when the configuration is unusable.
pub fn load_valid_config(config_path: &str) -> Result<DeskConfig, i32> {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            eprintln!("❌ Failed to load configuration file: {e}");
            return Err(2);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration validation failed");
        eprintln!("❌ Configuration validation failed: {e}");
        return Err(2);
    }

    Ok(config)
}

/// Build a console and load orders and courses into it
///
/// Returns the exit code to use when the console could not be loaded.
pub async fn open_console(
    config: &DeskConfig,
    cancel: &mut watch::Receiver<bool>,
) -> Result<OrderConsole, i32> {
    let console = match OrderConsole::from_config(config).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize order console");
            eprintln!("❌ Failed to initialize: {e}");
            return Err(exit_code_for(&e));
        }
    };

    match console.load(cancel).await {
        Ok(LoadOutcome::Committed { .. }) | Ok(LoadOutcome::Superseded) => Ok(console),
        Ok(LoadOutcome::Cancelled) => {
            println!("⚠️  Interrupted before orders were loaded");
            Err(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("❌ Failed to load orders: {e}");
            if e.is_unauthorized() {
                eprintln!("   Store a fresh token with: orderdesk session store");
            }
            Err(exit_code_for(&e))
        }
    }
}
