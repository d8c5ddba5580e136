//! Airlens Core Library
//!
//! Cleaning and exploratory charting for airline passenger CSV exports,
//! plus a small credential service.
//!
//! # Overview
//!
//! This crate provides the shared core consumed by the Airlens binaries:
//!
//! - **Dataset**: CSV loading and the two cleaning gates (missing values,
//!   unparseable departure dates)
//! - **Stats**: deterministic aggregations the charts draw from
//! - **Charts**: the fixed fifteen-chart battery rendered as PNG artifacts
//! - **Pipeline**: the single load-clean-render path for both dataset flows
//! - **Auth**: user registration and verification over a SQLite store
//!
//! # Example
//!
//! ```no_run
//! use airlens_core::dataset::DatasetSource;
//! use airlens_core::pipeline::run_analysis;
//! use std::path::Path;
//!
//! fn analyze() -> airlens_core::Result<()> {
//!     let source = DatasetSource::Path("data/airline.csv".into());
//!     let report = run_analysis(&source, Path::new("static/plots"))?;
//!     println!("Rendered {} charts", report.artifacts.len());
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod auth;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod stats;

// Re-export commonly used types
pub use error::{AirlensError, Result};
pub use pipeline::{run_analysis, AnalysisReport};
