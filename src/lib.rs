// orderdesk - Order console for the course-sales service
// Copyright (c) 2025 orderdesk contributors
// Licensed under the MIT License

//! # orderdesk - order console for the course-sales service
//!
//! orderdesk loads the orders and courses of a course-sales service, filters
//! and paginates them, and exports them three ways: a client-side PDF snapshot
//! of the visible page, a server-generated spreadsheet of the whole filtered
//! set, and a server-generated contract PDF for a single paid order.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Authenticating** with a bearer token kept encrypted at rest
//! - **Fetching** orders and courses concurrently, newest order first
//! - **Filtering** by status, payment type, creation date and course
//! - **Paginating** the filtered list with a resettable page window
//! - **Exporting** snapshots, spreadsheets and contracts
//!
//! ## Architecture
//!
//! orderdesk follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (filter, paginate, view state, export)
//! - [`adapters`] - The order service REST client
//! - [`session`] - Encrypted token storage and the session context
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orderdesk::config::load_config;
//! use orderdesk::core::view::OrderConsole;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("orderdesk.toml")?;
//!     let console = OrderConsole::from_config(&config).await?;
//!
//!     let (_cancel_tx, mut cancel_rx) = tokio::sync::watch::channel(false);
//!     console.load(&mut cancel_rx).await?;
//!
//!     let state = console.state();
//!     println!(
//!         "page {} of {}",
//!         state.window.current(),
//!         state.window.total_pages()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! ### Filtering
//!
//! Criteria combine conjunctively; the filter is pure and keeps the input
//! order:
//!
//! ```rust
//! use orderdesk::core::filter::{apply_filters, FilterCriteria};
//! use orderdesk::domain::{Order, OrderStatus};
//!
//! let orders: Vec<Order> = Vec::new();
//! let criteria = FilterCriteria::any()
//!     .with_status(OrderStatus::Paid)
//!     .with_course_title("Algebra");
//! assert!(apply_filters(&orders, &criteria).is_empty());
//! ```
//!
//! ### Sequenced fetches
//!
//! Every load takes a ticket from the view store. Only the most recently
//! issued ticket may commit; a slower, older response is dropped on arrival.
//!
//! ### Snapshot export
//!
//! The visible page is rasterized at 2x, scaled to the page width and shifted
//! upward page by page. A single image object is shared by every page of the
//! emitted PDF.
//!
//! ## Error Handling
//!
//! orderdesk uses the [`domain::DeskError`] type for all errors:
//!
//! ```rust,no_run
//! use orderdesk::domain::DeskError;
//!
//! fn example() -> Result<(), DeskError> {
//!     let config = orderdesk::config::load_config("orderdesk.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! orderdesk uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting export");
//! warn!(status = "REFUNDED", "Unknown order status");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod session;
