//! Orders command implementation
//!
//! This module implements the `orders` command: fetch, filter and print one
//! page of orders.

use super::{exit_code_for, load_valid_config, open_console, FilterArgs};
use crate::core::view::ViewState;
use crate::domain::{Order, NO_DATA};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the orders command
#[derive(Args, Debug)]
pub struct OrdersArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Print the visible page as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl OrdersArgs {
    /// Execute the orders command
    pub async fn execute(
        &self,
        config_path: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting orders command");

        let config = match load_valid_config(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        let console = match open_console(&config, &mut cancel).await {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        if let Err(e) = self.filters.apply(&console) {
            eprintln!("❌ {e}");
            return Ok(exit_code_for(&e));
        }

        let state = console.state();
        if self.json {
            println!("{}", serde_json::to_string_pretty(state.visible())?);
            return Ok(0);
        }

        print_table(&state, &config.view.currency);
        Ok(0)
    }
}

fn print_table(state: &ViewState, currency: &str) {
    let visible = state.visible();
    if visible.is_empty() {
        println!("No orders match the current filters.");
    } else {
        println!(
            "{:<26} {:<10} {:<24} {:<16} {:<20} {:<18} {:<10} {:<8} {:<17}",
            "ID", "Invoice", "Client", "Phone", "Course", "Amount", "Status", "Payment", "Created"
        );
        println!("{}", "-".repeat(155));
        for order in visible {
            println!("{}", format_row(order, currency));
        }
    }

    println!();
    println!(
        "Page {} of {} ({} of {} orders match, {} per page)",
        state.window.current(),
        state.window.total_pages(),
        state.filtered.len(),
        state.orders.len(),
        state.window.page_size()
    );
}

fn format_row(order: &Order, currency: &str) -> String {
    let created = order
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| NO_DATA.to_string());

    format!(
        "{:<26} {:<10} {:<24} {:<16} {:<20} {:<18} {:<10} {:<8} {:<17}",
        order.id.as_str(),
        order.invoice_label(),
        truncate(&order.client_name, 24),
        order.client_phone,
        truncate(order.course_title().unwrap_or(NO_DATA), 20),
        order.formatted_amount(currency),
        order.status.badge().label,
        order.payment_type.as_ref().map_or("-", |p| p.as_str()),
        created
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, OrderStatus};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Абдуллаев Рустам", 8), "Абдулла…");
    }

    #[test]
    fn test_row_shows_display_amount() {
        let order = Order::builder()
            .id(OrderId::new("o1").unwrap())
            .invoice_number("17")
            .amount(150_000)
            .status(OrderStatus::Paid)
            .build()
            .unwrap();
        let row = format_row(&order, "so'm");
        assert!(row.contains("1500 so'm"));
        assert!(row.contains("U17"));
    }

    #[test]
    fn test_row_without_amount_shows_no_data() {
        let order = Order::builder()
            .id(OrderId::new("o1").unwrap())
            .status(OrderStatus::Unpaid)
            .build()
            .unwrap();
        assert!(format_row(&order, "so'm").contains(NO_DATA));
    }
}
