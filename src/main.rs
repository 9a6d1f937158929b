// orderdesk - Order console for the course-sales service
// Copyright (c) 2025 orderdesk contributors
// Licensed under the MIT License

use clap::Parser;
use orderdesk::cli::{Cli, Commands};
use orderdesk::config::{load_config, LoggingConfig};
use orderdesk::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; commands
    // report configuration problems themselves
    let file_config = load_config(&cli.config).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config: LoggingConfig = file_config.map(|c| c.logging).unwrap_or_default();
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "orderdesk");

    // Cancels in-flight fetches on Ctrl+C / SIGTERM
    let (cancel_tx, cancel_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), cancelling");
                    println!("\n⚠️  Interrupt received, cancelling...");
                    let _ = cancel_tx.send(true);
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, cancelling");
                    let _ = cancel_tx.send(true);
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), cancelling");
                println!("\n⚠️  Interrupt received, cancelling...");
                let _ = cancel_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, cancel_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Flush buffered logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, cancel: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Orders(args) => args.execute(&cli.config, cancel).await,
        Commands::Courses(args) => args.execute(&cli.config, cancel).await,
        Commands::Export(args) => args.execute(&cli.config, cancel).await,
        Commands::Contract(args) => args.execute(&cli.config, cancel).await,
        Commands::Session(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
