//! Core business logic for orderdesk.
//!
//! This module contains the order view pipeline and the export paths.
//!
//! # Modules
//!
//! - [`filter`] - Filter criteria and the conjunctive order filter
//! - [`paginate`] - Page arithmetic and the page window
//! - [`stats`] - Successful purchases per course
//! - [`view`] - Observable view state and the [`view::OrderConsole`] orchestrator
//! - [`export`] - PDF snapshot, spreadsheet and contract exports
//!
//! # Workflow
//!
//! 1. **Load**: Fetch orders and courses concurrently with the session token
//! 2. **Filter**: Apply status, payment type, date range and course criteria
//! 3. **Paginate**: Slice the filtered list into the visible page
//! 4. **Export**: Snapshot the visible page, or request a spreadsheet of the
//!    whole filtered set, or a contract PDF for one paid order
//!
//! # Example
//!
//! ```rust,no_run
//! use orderdesk::config::load_config;
//! use orderdesk::core::filter::FilterCriteria;
//! use orderdesk::core::view::OrderConsole;
//! use orderdesk::domain::OrderStatus;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("orderdesk.toml")?;
//! let console = OrderConsole::from_config(&config).await?;
//!
//! let (_cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
//! console.load(&mut cancel_rx).await?;
//!
//! console
//!     .store()
//!     .set_criteria(FilterCriteria::any().with_status(OrderStatus::Paid));
//!
//! let summary = console.export_spreadsheet().await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod filter;
pub mod paginate;
pub mod stats;
pub mod view;
