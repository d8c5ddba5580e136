//! `airlens analyze` command implementation
//!
//! Runs the shared load-clean-render pipeline against either an uploaded
//! byte stream (`--stdin`) or a CSV file on disk, then lists the written
//! artifacts.

use airlens_core::config::AppConfig;
use airlens_core::dataset::DatasetSource;
use airlens_core::pipeline::{run_analysis, AnalysisReport};
use airlens_core::AirlensError;
use anyhow::Context;
use std::io::Read;
use std::path::PathBuf;

/// Analyze a passenger dataset and render the chart battery
pub async fn run(
    data: Option<PathBuf>,
    stdin: bool,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let out_dir = out.unwrap_or(config.analysis.plots_dir);

    let source = if stdin {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read CSV from stdin")?;
        DatasetSource::Bytes(bytes)
    } else {
        DatasetSource::Path(data.unwrap_or(config.analysis.data_path))
    };

    // Rendering is CPU-bound; keep it off the async runtime
    let report = tokio::task::spawn_blocking(move || run_analysis(&source, &out_dir))
        .await
        .map_err(|e| AirlensError::Task(e.to_string()))??;

    print_report(&report);
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!(
        "✓ Cleaned dataset: kept {} of {} rows ({} with missing values, {} with invalid dates)",
        report.records,
        report.summary.rows_read,
        report.summary.dropped_missing,
        report.summary.dropped_invalid_dates,
    );
    println!("✓ Rendered {} charts:", report.artifacts.len());
    for artifact in &report.artifacts {
        println!("  {}", artifact.path.display());
    }
}
