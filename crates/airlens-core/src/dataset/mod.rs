//! Passenger dataset model
//!
//! A [`Dataset`] is the cleaned, ordered collection of passenger records
//! for one analysis run. After loading, every record has all analysis
//! attributes present and a valid departure date; rows that failed either
//! gate were dropped by the loader. Datasets are materialized per run and
//! discarded afterwards, nothing is cached between runs.

use chrono::NaiveDate;
use std::path::PathBuf;

pub mod loader;

pub use loader::{load, load_file};

// ============================================================================
// Required Columns
// ============================================================================

/// Passenger gender column.
pub const COL_GENDER: &str = "Gender";

/// Passenger age column.
pub const COL_AGE: &str = "Age";

/// Passenger nationality column.
pub const COL_NATIONALITY: &str = "Nationality";

/// Departure airport name column.
pub const COL_AIRPORT_NAME: &str = "Airport Name";

/// Departure airport country code column.
pub const COL_COUNTRY_CODE: &str = "Airport Country Code";

/// Departure airport continent column.
pub const COL_CONTINENT: &str = "Airport Continent";

/// Pilot name column.
pub const COL_PILOT_NAME: &str = "Pilot Name";

/// Flight status column.
pub const COL_FLIGHT_STATUS: &str = "Flight Status";

/// Departure date column.
pub const COL_DEPARTURE_DATE: &str = "Departure Date";

/// Every column the chart battery reads. The input may carry more; extra
/// columns still participate in the missing-value filter but are not
/// retained in the record.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_GENDER,
    COL_AGE,
    COL_NATIONALITY,
    COL_AIRPORT_NAME,
    COL_COUNTRY_CODE,
    COL_CONTINENT,
    COL_PILOT_NAME,
    COL_FLIGHT_STATUS,
    COL_DEPARTURE_DATE,
];

/// One cleaned passenger row
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerRecord {
    pub gender: String,
    pub age: f64,
    pub nationality: String,
    pub airport_name: String,
    pub country_code: String,
    pub continent: String,
    pub pilot_name: String,
    pub flight_status: String,
    pub departure_date: NaiveDate,
}

/// Row accounting from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Data rows read from the input (header excluded)
    pub rows_read: usize,
    /// Rows dropped because some field was missing or unusable
    pub dropped_missing: usize,
    /// Rows dropped because the departure date failed to parse
    pub dropped_invalid_dates: usize,
}

/// Cleaned dataset for one analysis run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Surviving records, in input order
    pub records: Vec<PassengerRecord>,
    /// What the cleaning pass kept and dropped
    pub summary: LoadSummary,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where the CSV for an analysis run comes from
///
/// Uploaded bytes and the configured on-disk dataset go through the same
/// load-clean-render pipeline; the source is the only difference.
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Raw CSV bytes handed over by the caller (upload flow)
    Bytes(Vec<u8>),
    /// CSV file on local disk (fixed-dataset flow)
    Path(PathBuf),
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Bytes(bytes) => write!(f, "uploaded CSV ({} bytes)", bytes.len()),
            DatasetSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
