//! CSV loading and cleaning
//!
//! Reads a passenger CSV export and applies the two cleaning gates, in
//! order:
//!
//! 1. Drop every row with a missing value in ANY column, including columns
//!    no chart consumes. The filter is deliberately global, not scoped to
//!    the analysis columns; narrowing it would change which rows survive
//!    and shift every downstream count.
//! 2. Parse the departure date leniently against the supported formats and
//!    drop rows where no format matches.
//!
//! Dropped rows are counted, not errors. Structural problems (unreadable
//! CSV, absent required columns) are errors and abort the load.

use csv::{ReaderBuilder, StringRecord, Trim};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{AirlensError, Result};

use super::{
    Dataset, LoadSummary, PassengerRecord, COL_AGE, COL_AIRPORT_NAME, COL_CONTINENT,
    COL_COUNTRY_CODE, COL_DEPARTURE_DATE, COL_FLIGHT_STATUS, COL_GENDER, COL_NATIONALITY,
    COL_PILOT_NAME, REQUIRED_COLUMNS,
};

/// Departure date formats accepted by the cleaner, tried in order.
pub const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%b %d, %Y"];

/// Resolved header positions for the analysis columns
struct ColumnIndex {
    gender: usize,
    age: usize,
    nationality: usize,
    airport_name: usize,
    country_code: usize,
    continent: usize,
    pilot_name: usize,
    flight_status: usize,
    departure_date: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| AirlensError::missing_column(name))
        };

        // Report the first absent column in declaration order
        for name in REQUIRED_COLUMNS {
            position(name)?;
        }

        Ok(Self {
            gender: position(COL_GENDER)?,
            age: position(COL_AGE)?,
            nationality: position(COL_NATIONALITY)?,
            airport_name: position(COL_AIRPORT_NAME)?,
            country_code: position(COL_COUNTRY_CODE)?,
            continent: position(COL_CONTINENT)?,
            pilot_name: position(COL_PILOT_NAME)?,
            flight_status: position(COL_FLIGHT_STATUS)?,
            departure_date: position(COL_DEPARTURE_DATE)?,
        })
    }
}

/// Load and clean a passenger dataset from raw CSV bytes
///
/// Fields are trimmed; a field that is empty after trimming counts as
/// missing. Rows shorter or longer than the header are treated as rows
/// with missing values.
pub fn load(input: &[u8]) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        summary.rows_read += 1;
        // Header occupies line 1 of the file
        let line = index + 2;

        if row.len() != headers.len() || row.iter().any(|field| field.is_empty()) {
            summary.dropped_missing += 1;
            debug!(line, "Dropping row with missing values");
            continue;
        }

        let Some(age) = parse_age(&row[columns.age]) else {
            summary.dropped_missing += 1;
            debug!(line, value = %&row[columns.age], "Dropping row with unusable age");
            continue;
        };

        let Some(departure_date) = parse_departure_date(&row[columns.departure_date]) else {
            summary.dropped_invalid_dates += 1;
            debug!(
                line,
                value = %&row[columns.departure_date],
                "Dropping row with unparseable departure date"
            );
            continue;
        };

        records.push(PassengerRecord {
            gender: row[columns.gender].to_string(),
            age,
            nationality: row[columns.nationality].to_string(),
            airport_name: row[columns.airport_name].to_string(),
            country_code: row[columns.country_code].to_string(),
            continent: row[columns.continent].to_string(),
            pilot_name: row[columns.pilot_name].to_string(),
            flight_status: row[columns.flight_status].to_string(),
            departure_date,
        });
    }

    info!(
        rows_read = summary.rows_read,
        kept = records.len(),
        dropped_missing = summary.dropped_missing,
        dropped_invalid_dates = summary.dropped_invalid_dates,
        "Dataset cleaned"
    );

    Ok(Dataset { records, summary })
}

/// Load and clean a passenger dataset from a CSV file on disk
pub fn load_file(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading dataset from disk");

    let bytes = std::fs::read(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            AirlensError::FileNotFound(path.display().to_string())
        } else {
            AirlensError::Io(err)
        }
    })?;

    load(&bytes)
}

/// Parse a departure date, trying each supported format in order
pub fn parse_departure_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Parse an age field; anything that is not a finite number is missing
fn parse_age(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|age| age.is_finite())
}
