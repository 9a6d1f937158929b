//! External system integrations for orderdesk.
//!
//! - [`remote`] - the order service REST API (orders, courses, exports)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the view store and
//! exporters can be tested against in-memory implementations.
//!
//! ```rust,no_run
//! use orderdesk::adapters::remote::{HttpOrderService, OrderRepository};
//! use orderdesk::config::{ApiConfig, SessionConfig};
//! use orderdesk::session::{CredentialVault, SessionContext};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpOrderService::new(&ApiConfig::default())?;
//! let vault = Arc::new(CredentialVault::from_config(&SessionConfig::default()));
//! let session = SessionContext::open(vault).await;
//!
//! let orders = service.fetch_orders(&session).await?;
//! println!("{} orders", orders.len());
//! # Ok(())
//! # }
//! ```

pub mod remote;
