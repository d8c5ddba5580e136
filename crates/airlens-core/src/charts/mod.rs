//! The fifteen-chart battery
//!
//! [`generate_all`] renders the fixed, ordered set of fifteen charts for a
//! cleaned dataset into an output directory. Chart order and file names
//! never change; rendering the same directory twice overwrites each
//! artifact in place, so the directory holds at most one image per name.
//! A failed chart aborts the batch, nothing is retried or skipped.
//!
//! Generation against one output directory is serialized through a
//! process-local lock, so concurrent runs cannot interleave their writes
//! within the battery; the last full batch wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info};

use crate::dataset::Dataset;
use crate::error::{AirlensError, Result};
use crate::stats;

pub mod render;

/// Number of charts in the battery.
pub const CHART_COUNT: usize = 15;

/// Histogram bucket count for the age distribution.
pub const AGE_BUCKETS: usize = 20;

/// Sample points for the age density curve.
const KDE_POINTS: usize = 200;

type ChartFn = fn(&Dataset, &Path) -> render::DrawResult;

/// The battery, in render order. File names are `<name>.png`.
const CHARTS: [(&str, ChartFn); CHART_COUNT] = [
    ("gender_distribution", gender_distribution),
    ("age_distribution", age_distribution),
    ("flight_status", flight_status),
    ("status_by_continent", status_by_continent),
    ("top_nationalities", top_nationalities),
    ("top_departure_airports", top_departure_airports),
    ("status_by_gender", status_by_gender),
    ("avg_age_by_status", avg_age_by_status),
    ("top_country_codes", top_country_codes),
    ("heatmap_gender_continent", heatmap_gender_continent),
    ("top_pilots", top_pilots),
    ("monthly_flight_trend", monthly_flight_trend),
    ("weekday_status", weekday_status),
    ("nationality_gender", nationality_gender),
    ("flight_status_pie", flight_status_pie),
];

/// Artifact names in render order, without the `.png` extension
pub fn chart_names() -> [&'static str; CHART_COUNT] {
    CHARTS.map(|(name, _)| name)
}

/// One generated chart image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartArtifact {
    /// Chart name, e.g. `gender_distribution`
    pub name: String,
    /// File name inside the output directory
    pub file_name: String,
    /// Full path of the written PNG
    pub path: PathBuf,
}

impl ChartArtifact {
    /// Read the written image back as bytes
    pub fn bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// Render the full battery for a dataset into `out_dir`
///
/// The directory is created if missing. Returns the artifacts in render
/// order. An empty dataset still yields all fifteen artifacts; each chart
/// degrades to an axes-only placeholder.
pub fn generate_all(dataset: &Dataset, out_dir: &Path) -> Result<Vec<ChartArtifact>> {
    std::fs::create_dir_all(out_dir)?;

    let lock = directory_lock(out_dir);
    let _held = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut artifacts = Vec::with_capacity(CHART_COUNT);
    for (name, draw) in CHARTS {
        let file_name = format!("{name}.png");
        let path = out_dir.join(&file_name);

        debug!(chart = name, "Rendering chart");
        draw(dataset, &path).map_err(|err| AirlensError::render(name, err.to_string()))?;

        artifacts.push(ChartArtifact {
            name: name.to_string(),
            file_name,
            path,
        });
    }

    info!(
        charts = artifacts.len(),
        records = dataset.len(),
        dir = %out_dir.display(),
        "Chart battery rendered"
    );

    Ok(artifacts)
}

/// Lock guarding one output directory, shared process-wide
fn directory_lock(dir: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

    // The directory exists by now, so canonicalization only fails on
    // exotic filesystems; fall back to the literal path there.
    let key = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());

    let registry = LOCKS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut locks = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    locks.entry(key).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
}

fn as_bars(counts: &[(String, u64)]) -> Vec<(String, f64)> {
    counts
        .iter()
        .map(|(name, count)| (name.clone(), *count as f64))
        .collect()
}

// Chart 1
fn gender_distribution(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.gender.as_str()));
    render::bar_chart(
        path,
        "Gender Distribution",
        "Gender",
        "Count",
        &as_bars(&counts),
        false,
    )
}

// Chart 2
fn age_distribution(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let ages: Vec<f64> = dataset.records.iter().map(|r| r.age).collect();
    match stats::histogram(&ages, AGE_BUCKETS) {
        Some(hist) => {
            let kde = stats::gaussian_kde(&ages, KDE_POINTS);
            render::histogram_chart(
                path,
                "Age Distribution",
                "Age",
                "Count",
                &hist,
                &kde,
                ages.len(),
            )
        },
        None => render::empty_chart(path, "Age Distribution"),
    }
}

// Chart 3
fn flight_status(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.flight_status.as_str()));
    render::bar_chart(
        path,
        "Flight Status",
        "Flight Status",
        "Count",
        &as_bars(&counts),
        false,
    )
}

// Chart 4
fn status_by_continent(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let grouped = stats::grouped_counts(
        dataset
            .records
            .iter()
            .map(|r| (r.continent.as_str(), r.flight_status.as_str())),
    );
    render::grouped_bar_chart(
        path,
        "Flight Status by Continent",
        "Airport Continent",
        "Count",
        &grouped,
        true,
    )
}

// Chart 5
fn top_nationalities(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.nationality.as_str()));
    let top = stats::top_n(&counts, 5);
    render::bar_chart(
        path,
        "Top 5 Passenger Nationalities",
        "Nationality",
        "Count",
        &as_bars(&top),
        false,
    )
}

// Chart 6
fn top_departure_airports(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.airport_name.as_str()));
    let top = stats::top_n(&counts, 10);
    render::bar_chart(
        path,
        "Top 10 Departure Airports",
        "Airport Name",
        "Count",
        &as_bars(&top),
        true,
    )
}

// Chart 7
fn status_by_gender(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let grouped = stats::grouped_counts(
        dataset
            .records
            .iter()
            .map(|r| (r.gender.as_str(), r.flight_status.as_str())),
    );
    render::grouped_bar_chart(
        path,
        "Flight Status by Gender",
        "Gender",
        "Count",
        &grouped,
        false,
    )
}

// Chart 8
fn avg_age_by_status(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let means = stats::mean_by(
        dataset
            .records
            .iter()
            .map(|r| (r.flight_status.as_str(), r.age)),
    );
    render::bar_chart(
        path,
        "Average Age by Flight Status",
        "Flight Status",
        "Average Age",
        &means,
        false,
    )
}

// Chart 9
fn top_country_codes(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.country_code.as_str()));
    let top = stats::top_n(&counts, 10);
    render::bar_chart(
        path,
        "Top 10 Country Codes",
        "Airport Country Code",
        "Count",
        &as_bars(&top),
        false,
    )
}

// Chart 10
fn heatmap_gender_continent(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let table = stats::crosstab(
        dataset
            .records
            .iter()
            .map(|r| (r.gender.as_str(), r.continent.as_str())),
    );
    render::heatmap_chart(
        path,
        "Flight Count by Gender and Continent",
        "Airport Continent",
        "Gender",
        &table,
    )
}

// Chart 11
fn top_pilots(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.pilot_name.as_str()));
    let top = stats::top_n(&counts, 10);
    render::bar_chart(
        path,
        "Top 10 Pilots by Flight Count",
        "Pilot Name",
        "Count",
        &as_bars(&top),
        true,
    )
}

// Chart 12
fn monthly_flight_trend(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let months = stats::monthly_counts(dataset.records.iter().map(|r| r.departure_date));
    render::line_chart(
        path,
        "Monthly Flight Trend",
        "Month",
        "Number of Flights",
        &months,
    )
}

// Chart 13
fn weekday_status(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let weekdays: Vec<String> = dataset
        .records
        .iter()
        .map(|r| stats::weekday_name(r.departure_date))
        .collect();
    let pairs = weekdays
        .iter()
        .map(String::as_str)
        .zip(dataset.records.iter().map(|r| r.flight_status.as_str()));

    // The weekday axis is pinned Monday through Sunday even when some
    // weekdays never occur in the data.
    let grouped = stats::grouped_counts_fixed(pairs, &stats::WEEKDAY_ORDER);
    render::grouped_bar_chart(
        path,
        "Flight Status by Day of the Week",
        "Weekday",
        "Count",
        &grouped,
        true,
    )
}

// Chart 14
fn nationality_gender(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.nationality.as_str()));
    let top = stats::top_n(&counts, 5);
    let top_names: Vec<&str> = top.iter().map(|(name, _)| name.as_str()).collect();

    // Same top-5 set as the top_nationalities chart; other nationalities
    // are excluded from the axis entirely.
    let grouped = stats::grouped_counts_fixed(
        dataset
            .records
            .iter()
            .map(|r| (r.nationality.as_str(), r.gender.as_str())),
        &top_names,
    );
    render::grouped_bar_chart(
        path,
        "Top Nationalities by Gender",
        "Nationality",
        "Count",
        &grouped,
        false,
    )
}

// Chart 15
fn flight_status_pie(dataset: &Dataset, path: &Path) -> render::DrawResult {
    let counts = stats::value_counts(dataset.records.iter().map(|r| r.flight_status.as_str()));
    render::pie_chart(path, "Flight Status Distribution", &counts)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::dataset::PassengerRecord;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(gender: &str, age: f64, nationality: &str, status: &str, date: &str) -> PassengerRecord {
        PassengerRecord {
            gender: gender.to_string(),
            age,
            nationality: nationality.to_string(),
            airport_name: format!("{nationality} International"),
            country_code: nationality.chars().take(2).collect::<String>().to_uppercase(),
            continent: "Europe".to_string(),
            pilot_name: format!("Pilot of {nationality}"),
            flight_status: status.to_string(),
            departure_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset {
            records: vec![
                record("Male", 30.0, "Brazil", "On Time", "2023-01-05"),
                record("Female", 25.0, "Japan", "Delayed", "2023-01-20"),
                record("Female", 41.0, "Japan", "On Time", "2023-02-01"),
            ],
            summary: Default::default(),
        }
    }

    #[test]
    fn test_generate_all_renders_fifteen_artifacts_in_order() {
        let dir = TempDir::new().unwrap();
        let artifacts = generate_all(&sample_dataset(), dir.path()).unwrap();

        assert_eq!(artifacts.len(), CHART_COUNT);
        let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, chart_names());

        for artifact in &artifacts {
            assert_eq!(artifact.file_name, format!("{}.png", artifact.name));
            assert!(!artifact.bytes().unwrap().is_empty());
        }
    }

    #[test]
    fn test_generate_all_empty_dataset_degrades_to_placeholders() {
        let dir = TempDir::new().unwrap();
        let artifacts = generate_all(&Dataset::default(), dir.path()).unwrap();

        assert_eq!(artifacts.len(), CHART_COUNT);
        for artifact in &artifacts {
            assert!(artifact.path.exists(), "missing {}", artifact.file_name);
        }
    }

    #[test]
    fn test_generate_all_overwrites_in_place() {
        let dir = TempDir::new().unwrap();

        generate_all(&sample_dataset(), dir.path()).unwrap();
        generate_all(&Dataset::default(), dir.path()).unwrap();

        let pngs = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().extension().map(|ext| ext == "png").unwrap_or(false)
            })
            .count();
        assert_eq!(pngs, CHART_COUNT);
    }

    #[test]
    fn test_generate_all_creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("static").join("plots");

        generate_all(&sample_dataset(), &nested).unwrap();
        assert!(nested.join("gender_distribution.png").exists());
    }

    #[test]
    fn test_pie_percentages_sum_to_one_hundred() {
        let dataset = sample_dataset();
        let counts = stats::value_counts(dataset.records.iter().map(|r| r.flight_status.as_str()));

        let total: u64 = counts.iter().map(|(_, count)| count).sum();
        let percentages: Vec<f64> = counts
            .iter()
            .map(|(_, count)| (*count as f64 / total as f64 * 1000.0).round() / 10.0)
            .collect();

        let sum: f64 = percentages.iter().sum();
        assert!((sum - 100.0).abs() <= 0.1, "percentages sum to {sum}");
    }
}
