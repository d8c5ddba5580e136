//! Airlens CLI - Main entry point

use airlens_cli::{Cli, Commands, UserCommand};
use airlens_core::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use clap::Parser;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging based on verbose flag and environment
    let log_config = if cli.verbose {
        // Verbose mode: debug-level console logging
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Console)
            .log_file_prefix("airlens".to_string())
            .build()
    } else {
        // Normal mode: warnings and errors only
        LogConfig::builder()
            .level(LogLevel::Warn)
            .output(LogOutput::Console)
            .log_file_prefix("airlens".to_string())
            .build()
    };

    // Merge with environment variables (they take precedence)
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // Initialize logging (ignore errors as the CLI should work without logging)
    let _ = init_logging(&log_config);

    // Execute command
    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze { data, stdin, out } => {
            airlens_cli::commands::analyze::run(data, stdin, out).await
        }

        Commands::User { command } => match command {
            UserCommand::Register {
                fullname,
                email,
                username,
                password,
                db,
            } => {
                airlens_cli::commands::user::register(fullname, email, username, password, db)
                    .await
            }
            UserCommand::Verify {
                username,
                password,
                db,
            } => airlens_cli::commands::user::verify(username, password, db).await,
        },
    }
}
