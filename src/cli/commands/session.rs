//! Session command implementation
//!
//! This module implements the `session` command for managing the encrypted
//! bearer token the console authenticates with. Logging in happens outside
//! orderdesk; `session store` persists the token that login issued.

use super::{exit_code_for, load_valid_config};
use crate::session::{CredentialVault, SessionContext};
use clap::{Args, Subcommand};
use std::sync::Arc;

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub action: SessionAction,
}

/// Session operations
#[derive(Subcommand, Debug)]
pub enum SessionAction {
    /// Encrypt and store a bearer token (read from stdin when not given)
    Store {
        /// Bearer token issued by the login flow
        #[arg(long, env = "ORDERDESK_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Remove the stored token
    Clear,

    /// Show whether a usable token is stored
    Status,
}

impl SessionArgs {
    /// Execute the session command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_valid_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let vault = Arc::new(CredentialVault::from_config(&config.session));

        match &self.action {
            SessionAction::Store { token } => {
                let token = match token {
                    Some(t) => t.trim().to_string(),
                    None => read_token_from_stdin()?,
                };
                if token.is_empty() {
                    eprintln!("❌ No token given");
                    return Ok(1);
                }

                if let Err(e) = vault.store_token(&token).await {
                    eprintln!("❌ Failed to store token: {e}");
                    return Ok(exit_code_for(&e));
                }
                println!("✅ Session token stored in {}", config.session.store_path);
                Ok(0)
            }
            SessionAction::Clear => {
                let session = SessionContext::new(vault);
                if let Err(e) = session.clear().await {
                    eprintln!("❌ Failed to clear token: {e}");
                    return Ok(exit_code_for(&e));
                }
                println!("✅ Session token cleared");
                Ok(0)
            }
            SessionAction::Status => {
                let session = SessionContext::open(vault).await;
                println!("🔐 Session Status");
                println!("  Store: {}", config.session.store_path);
                println!("  Key: {}", config.session.storage_key);
                println!(
                    "  Passphrase: {}",
                    if config.session.uses_fallback_key() {
                        "built-in fallback (configure session.secret_key)"
                    } else {
                        "configured"
                    }
                );
                if session.is_authenticated() {
                    println!("  Token: present");
                    Ok(0)
                } else {
                    println!("  Token: missing or unreadable");
                    Ok(3)
                }
            }
        }
    }
}

fn read_token_from_stdin() -> std::io::Result<String> {
    use std::io::{self, BufRead, Write};

    print!("Bearer token: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
