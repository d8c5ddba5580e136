//! The load-clean-render pipeline
//!
//! One shared run path for both dataset flows: uploaded bytes and a
//! configured file on disk go through the same loader and the same chart
//! battery, the [`DatasetSource`] is the only difference. The run is a
//! single synchronous pass; any failure aborts it with no partial result
//! beyond artifacts already flushed.

use std::path::Path;
use tracing::info;

use crate::charts::{self, ChartArtifact};
use crate::dataset::{self, DatasetSource, LoadSummary};
use crate::error::Result;

/// Outcome of one analysis run
#[derive(Debug)]
pub struct AnalysisReport {
    /// Records that survived cleaning
    pub records: usize,
    /// What the cleaning pass kept and dropped
    pub summary: LoadSummary,
    /// The fifteen chart artifacts, in render order
    pub artifacts: Vec<ChartArtifact>,
}

/// Load a dataset from `source`, clean it, and render the chart battery
/// into `out_dir`
pub fn run_analysis(source: &DatasetSource, out_dir: &Path) -> Result<AnalysisReport> {
    info!(source = %source, out_dir = %out_dir.display(), "Starting analysis run");

    let dataset = match source {
        DatasetSource::Bytes(bytes) => dataset::load(bytes)?,
        DatasetSource::Path(path) => dataset::load_file(path)?,
    };

    let artifacts = charts::generate_all(&dataset, out_dir)?;

    Ok(AnalysisReport {
        records: dataset.len(),
        summary: dataset.summary,
        artifacts,
    })
}
