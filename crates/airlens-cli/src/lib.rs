//! Airlens CLI Library
//!
//! Command-line interface for airline passenger EDA.
//!
//! # Overview
//!
//! The Airlens CLI exposes the shared analysis pipeline and the credential
//! service:
//!
//! - **Dataset Analysis**: Clean a passenger CSV and render the fifteen-chart
//!   battery (`airlens analyze`)
//! - **User Registration**: Create a user with a salted password hash
//!   (`airlens user register`)
//! - **User Verification**: Check a username/password pair
//!   (`airlens user verify`)

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Airlens - Airline passenger EDA toolkit
#[derive(Parser, Debug)]
#[command(name = "airlens")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a passenger dataset and render the chart battery
    Analyze {
        /// CSV file to analyze (defaults to the configured dataset path)
        #[arg(short, long, env = "AIRLENS_DATA_PATH")]
        data: Option<PathBuf>,

        /// Read the CSV from standard input instead of a file
        #[arg(long, conflicts_with = "data")]
        stdin: bool,

        /// Directory the chart PNGs are written into
        #[arg(short, long, env = "AIRLENS_PLOTS_DIR")]
        out: Option<PathBuf>,
    },

    /// Manage user credentials
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

/// Credential subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a new user
    Register {
        /// Full name
        #[arg(long)]
        fullname: String,

        /// Email address (unique)
        #[arg(long)]
        email: String,

        /// Username (unique)
        #[arg(long)]
        username: String,

        /// Password (salted and hashed before storage)
        #[arg(long)]
        password: String,

        /// SQLite database holding the users table
        #[arg(long, env = "AIRLENS_USERS_DB")]
        db: Option<PathBuf>,
    },

    /// Verify a username/password pair
    Verify {
        /// Username to check
        #[arg(long)]
        username: String,

        /// Password to check
        #[arg(long)]
        password: String,

        /// SQLite database holding the users table
        #[arg(long, env = "AIRLENS_USERS_DB")]
        db: Option<PathBuf>,
    },
}
