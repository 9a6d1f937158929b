//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the orderdesk configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Environment: {:?}", config.environment);
                println!("  Log Level: {}", config.application.log_level);
                println!("  Order Service: {}", config.api.base_url);
                println!("  Timeout: {}s", config.api.timeout_seconds);
                println!("  TLS Verify: {}", config.api.tls_verify);
                println!("  Session Store: {}", config.session.store_path);
                println!(
                    "  Session Passphrase: {}",
                    if config.session.uses_fallback_key() {
                        "built-in fallback"
                    } else {
                        "configured"
                    }
                );
                println!(
                    "  Page Size: {} (options {:?})",
                    config.view.page_size, config.view.page_size_options
                );
                println!("  Output Directory: {}", config.export.output_dir);
                println!("  Snapshot Page Format: {}", config.export.page_format);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
