//! Contract command implementation
//!
//! This module implements the `contract` command: download the generated
//! contract PDF for one paid order and save it as `<invoiceNumber>.pdf`.

use super::export::report;
use super::{load_valid_config, open_console};
use crate::domain::OrderId;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the contract command
#[derive(Args, Debug)]
pub struct ContractArgs {
    /// Id of the order (must be PAID)
    pub order_id: String,
}

impl ContractArgs {
    /// Execute the contract command
    pub async fn execute(
        &self,
        config_path: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(order_id = %self.order_id, "Starting contract command");

        let order_id = match OrderId::new(self.order_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("❌ Invalid order id: {e}");
                return Ok(1);
            }
        };

        let config = match load_valid_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let console = match open_console(&config, &mut cancel).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        Ok(report(console.export_contract(&order_id).await))
    }
}
