//! Deterministic aggregations over cleaned datasets
//!
//! Every chart in the battery draws from one of these transforms. They are
//! pure functions over record iterators with pinned orderings: categorical
//! counts keep first-appearance order, ranked counts sort by count with a
//! stable tie-break, cross-tabulations sort both axes lexicographically,
//! and time series sort chronologically. Two runs over the same input
//! produce identical vectors.

use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};

/// Weekday axis order for the weekday chart.
pub const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Count occurrences of each value, in first-appearance order
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<(String, u64)> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in values {
        match index.get(value) {
            Some(&at) => counts[at].1 += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            },
        }
    }

    counts
}

/// Rank counts by descending count and keep the first `n`
///
/// The sort is stable, so values with equal counts keep their relative
/// order from the input. Feeding first-appearance counts through here
/// gives a fully deterministic ranking.
pub fn top_n(counts: &[(String, u64)], n: usize) -> Vec<(String, u64)> {
    let mut ranked = counts.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Category axis with one count series per sub-group
///
/// `counts[category][series]` is the number of records with that category
/// and series value. Both axes follow first-appearance order unless the
/// category axis was pinned via [`grouped_counts_fixed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedCounts {
    pub categories: Vec<String>,
    pub series: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl GroupedCounts {
    /// Largest single cell, used for chart axis scaling
    pub fn max_count(&self) -> u64 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Count (category, series) pairs with both axes in first-appearance order
pub fn grouped_counts<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> GroupedCounts {
    grouped_counts_inner(pairs, None)
}

/// Count (category, series) pairs against a pinned category axis
///
/// Pairs whose category is not in `categories` are ignored; the series
/// axis still follows first-appearance order.
pub fn grouped_counts_fixed<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    categories: &[&str],
) -> GroupedCounts {
    grouped_counts_inner(pairs, Some(categories))
}

fn grouped_counts_inner<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    fixed_categories: Option<&[&str]>,
) -> GroupedCounts {
    let mut categories: Vec<String> = Vec::new();
    let mut category_index: HashMap<String, usize> = HashMap::new();

    if let Some(fixed) = fixed_categories {
        for category in fixed {
            category_index.insert((*category).to_string(), categories.len());
            categories.push((*category).to_string());
        }
    }

    let mut series: Vec<String> = Vec::new();
    let mut series_index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<Vec<u64>> = vec![Vec::new(); categories.len()];

    for (category, sub) in pairs {
        let ci = match category_index.get(category) {
            Some(&at) => at,
            None if fixed_categories.is_some() => continue,
            None => {
                category_index.insert(category.to_string(), categories.len());
                categories.push(category.to_string());
                counts.push(vec![0; series.len()]);
                categories.len() - 1
            },
        };

        let si = match series_index.get(sub) {
            Some(&at) => at,
            None => {
                series_index.insert(sub.to_string(), series.len());
                series.push(sub.to_string());
                for row in counts.iter_mut() {
                    row.push(0);
                }
                series.len() - 1
            },
        };

        counts[ci][si] += 1;
    }

    GroupedCounts {
        categories,
        series,
        counts,
    }
}

/// Row/column contingency table with both axes sorted lexicographically
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl CrossTab {
    pub fn max_count(&self) -> u64 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Cross-tabulate (row, col) pairs; axes come out sorted
pub fn crosstab<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> CrossTab {
    let mut cells: BTreeMap<(String, String), u64> = BTreeMap::new();

    for (row, col) in pairs {
        *cells
            .entry((row.to_string(), col.to_string()))
            .or_insert(0) += 1;
    }

    let mut rows: Vec<String> = cells.keys().map(|(row, _)| row.clone()).collect();
    rows.sort();
    rows.dedup();

    let mut cols: Vec<String> = cells.keys().map(|(_, col)| col.clone()).collect();
    cols.sort();
    cols.dedup();

    let counts = rows
        .iter()
        .map(|row| {
            cols.iter()
                .map(|col| {
                    cells
                        .get(&(row.clone(), col.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    CrossTab { rows, cols, counts }
}

/// Mean of `value` per group, in first-appearance group order
pub fn mean_by<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Vec<(String, f64)> {
    let mut groups: Vec<(String, f64, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (group, value) in pairs {
        match index.get(group) {
            Some(&at) => {
                groups[at].1 += value;
                groups[at].2 += 1;
            },
            None => {
                index.insert(group.to_string(), groups.len());
                groups.push((group.to_string(), value, 1));
            },
        }
    }

    groups
        .into_iter()
        .map(|(group, sum, count)| (group, sum / count as f64))
        .collect()
}

/// Count dates per calendar month, chronologically ordered
///
/// Labels are `YYYY-MM`.
pub fn monthly_counts(dates: impl IntoIterator<Item = NaiveDate>) -> Vec<(String, u64)> {
    let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();

    for date in dates {
        *months.entry((date.year(), date.month())).or_insert(0) += 1;
    }

    months
        .into_iter()
        .map(|((year, month), count)| (format!("{year:04}-{month:02}"), count))
        .collect()
}

/// Full weekday name for a date (e.g. "Monday")
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Fixed-width histogram over a value range
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Lower edge of the first bucket
    pub start: f64,
    /// Width of every bucket
    pub bucket_width: f64,
    /// Records per bucket
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Inclusive upper edge of the covered range
    pub fn end(&self) -> f64 {
        self.start + self.bucket_width * self.counts.len() as f64
    }
}

/// Bucket values into `buckets` equal-width bins over their observed range
///
/// Returns `None` for empty input. A degenerate single-value range gets a
/// unit-width axis so the lone bar still renders.
pub fn histogram(values: &[f64], buckets: usize) -> Option<Histogram> {
    if values.is_empty() || buckets == 0 {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bucket_width = if max > min {
        (max - min) / buckets as f64
    } else {
        1.0
    };

    let mut counts = vec![0u64; buckets];
    for value in values {
        let at = ((value - min) / bucket_width).floor() as usize;
        counts[at.min(buckets - 1)] += 1;
    }

    Some(Histogram {
        start: min,
        bucket_width,
        counts,
    })
}

/// Gaussian kernel density estimate sampled on an even grid
///
/// Bandwidth follows Scott's rule. The curve is a probability density;
/// multiply by `values.len() * bucket_width` to overlay it on a count
/// histogram.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    if values.is_empty() || points < 2 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    // Scott's rule; fall back to unit bandwidth when the sample is constant
    let bandwidth = if std_dev > 0.0 {
        std_dev * n.powf(-0.2)
    } else {
        1.0
    };

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lo = min - 3.0 * bandwidth;
    let hi = max + 3.0 * bandwidth;
    let step = (hi - lo) / (points - 1) as f64;

    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}
