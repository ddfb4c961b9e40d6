//! CSV ingest of daily surveillance counts.
//!
//! Reads the schema written by `io::export` (`date,region,count` required;
//! `day_of_year`, `year_index` optional) and turns it into `Observation`s
//! that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use tracing::{info, warn};

use crate::data::year_index;
use crate::domain::Observation;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 3] = ["date", "region", "count"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized observations + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

struct ParsedRow {
    date: NaiveDate,
    day_of_year: Option<u32>,
    year_index: Option<f64>,
    region: usize,
    count: u64,
}

/// Load observations from a CSV file.
pub fn load_observations(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::new(2, format!("Missing required CSV column '{column}'.")));
        }
    }

    let mut parsed = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(row) => parsed.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if !row_errors.is_empty() {
        warn!(skipped = row_errors.len(), "skipped invalid CSV rows");
    }

    let Some(start) = parsed.iter().map(|r| r.date).min() else {
        return Err(AppError::new(3, "No usable rows in CSV."));
    };

    let observations: Vec<Observation> = parsed
        .into_iter()
        .map(|r| Observation {
            date: r.date,
            day_of_year: r.day_of_year.unwrap_or_else(|| r.date.ordinal()),
            year_index: r.year_index.unwrap_or_else(|| year_index(start, r.date)),
            region: r.region,
            count: r.count,
        })
        .collect();

    let rows_used = observations.len();
    info!(path = %path.display(), rows_read, rows_used, "loaded observations");

    Ok(IngestedData {
        observations,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
        .collect()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<ParsedRow, String> {
    let date_raw = get_required(record, header_map, "date")?;
    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{date_raw}': {e}"))?;

    let region_raw = get_required(record, header_map, "region")?;
    let region = region_raw
        .parse::<usize>()
        .map_err(|_| format!("Invalid region '{region_raw}' (expected a non-negative integer)."))?;

    let count_raw = get_required(record, header_map, "count")?;
    let count = count_raw
        .parse::<u64>()
        .map_err(|_| format!("Invalid count '{count_raw}' (expected a non-negative integer)."))?;

    let day_of_year = match get_optional(record, header_map, "day_of_year") {
        Some(s) => {
            let d = s
                .parse::<u32>()
                .map_err(|_| format!("Invalid day_of_year '{s}'."))?;
            if !(1..=366).contains(&d) {
                return Err(format!("day_of_year {d} out of range 1..=366."));
            }
            Some(d)
        }
        None => None,
    };

    let year_index = match get_optional(record, header_map, "year_index") {
        Some(s) => {
            let v = s
                .parse::<f64>()
                .map_err(|_| format!("Invalid year_index '{s}'."))?;
            if !v.is_finite() {
                return Err(format!("Non-finite year_index '{s}'."));
            }
            Some(v)
        }
        None => None,
    };

    Ok(ParsedRow {
        date,
        day_of_year,
        year_index,
        region,
        count,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing value for '{name}'."))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = *header_map.get(name)?;
    record.get(idx).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::io::export::write_observations_csv;

    fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("season_ingest_{}_{name}.csv", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn exported_observations_load_back() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let observations = vec![
            Observation {
                date,
                day_of_year: 61,
                year_index: 0.0,
                region: 0,
                count: 12,
            },
            Observation {
                date: date.succ_opt().unwrap(),
                day_of_year: 62,
                year_index: 1.0 / 365.25,
                region: 1,
                count: 0,
            },
        ];
        let path = std::env::temp_dir().join(format!("season_export_{}.csv", std::process::id()));
        write_observations_csv(&path, &observations).unwrap();

        let loaded = load_observations(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.rows_read, 2);
        assert_eq!(loaded.rows_used, 2);
        assert!(loaded.row_errors.is_empty());
        assert_eq!(loaded.observations[1].count, 0);
        assert_eq!(loaded.observations[1].day_of_year, 62);
        assert!((loaded.observations[1].year_index - observations[1].year_index).abs() < 1e-9);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let path = temp_csv(
            "bad_rows",
            "date,region,count\n2021-01-01,0,5\nnot-a-date,0,5\n2021-01-02,0,-3\n2021-01-03,x,1\n2021-01-04,1,7\n",
        );
        let loaded = load_observations(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.rows_read, 5);
        assert_eq!(loaded.rows_used, 2);
        let lines: Vec<usize> = loaded.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
    }

    #[test]
    fn missing_optional_columns_are_derived_from_dates() {
        let path = temp_csv("derived", "date,region,count\n2021-01-10,0,1\n2022-01-10,0,2\n");
        let loaded = load_observations(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.observations[0].day_of_year, 10);
        assert_eq!(loaded.observations[0].year_index, 0.0);
        assert!((loaded.observations[1].year_index - 365.0 / 365.25).abs() < 1e-12);
    }

    #[test]
    fn schema_and_empty_file_errors() {
        let path = temp_csv("schema", "date,count\n2021-01-01,3\n");
        let err = load_observations(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 2);

        let path = temp_csv("empty", "date,region,count\n");
        let err = load_observations(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.exit_code(), 3);
    }
}
