//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "orderdesk.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing orderdesk configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your order service URL", self.output);
                println!("  2. Set ORDERDESK_SECRET_KEY in a .env file");
                println!("  3. Validate configuration: orderdesk validate-config");
                println!("  4. Store the token from your login: orderdesk session store");
                println!("  5. List orders: orderdesk orders");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    fn generate_config() -> String {
        r#"# orderdesk Configuration File
# Order console for the course-sales service

# development | staging | production
environment = "development"

[application]
log_level = "info"

# ============================================================================
# Order Service
# ============================================================================
[api]
base_url = "https://api.example.com/api/v1"
timeout_seconds = 30

# Never disable outside local development
tls_verify = true

# ============================================================================
# Session
# ============================================================================
[session]
# JSON document holding the encrypted bearer token
store_path = ".orderdesk/session.json"
storage_key = "token"

# Passphrase the token is encrypted with (required in production)
secret_key = "${ORDERDESK_SECRET_KEY}"

# ============================================================================
# View
# ============================================================================
[view]
page_size = 10
page_size_options = [10, 50, 100, 200]
currency = "so'm"

# ============================================================================
# Export
# ============================================================================
[export]
output_dir = "exports"
snapshot_file_name = "orders.pdf"
spreadsheet_file_name = "orders.xlsx"

# a4 | letter
page_format = "a4"

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = false
local_path = "logs"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
