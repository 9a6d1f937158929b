//! Configuration management for orderdesk.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `ORDERDESK_*`
//! environment overrides and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use orderdesk::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("orderdesk.toml")?;
//! println!("Order service: {}", config.api.base_url);
//! println!("Page size: {}", config.view.page_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`ApiConfig`] - order service URL, timeout, TLS
//! - [`SessionConfig`] - token store location, storage key, passphrase
//! - [`ViewConfig`] - page size and selector options
//! - [`ExportConfig`] - output directory and file names
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [api]
//! base_url = "https://api.example.com/api/v1"
//!
//! [session]
//! store_path = "/var/lib/orderdesk/session.json"
//! secret_key = "${ORDERDESK_SECRET_KEY}"
//!
//! [view]
//! page_size = 50
//!
//! [export]
//! output_dir = "exports"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApiConfig, ApplicationConfig, DeskConfig, Environment, ExportConfig, LoggingConfig,
    SessionConfig, ViewConfig, FALLBACK_SECRET_KEY,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
