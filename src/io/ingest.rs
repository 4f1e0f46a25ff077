//! CSV ingest.
//!
//! Turns a CSV with `x` and `y` columns into a list of `SamplePair`s.
//!
//! - Header names are matched case-insensitively (a UTF-8 BOM is ignored).
//! - Rows with blank, non-numeric or non-finite cells are skipped and reported
//!   with their line number; the remaining rows are kept in file order.
//! - An input with no usable rows is an error (exit code 2).

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::SamplePair;
use crate::error::AppError;

/// A row-level problem found during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub samples: Vec<SamplePair>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    pub fn rows_used(&self) -> usize {
        self.samples.len()
    }
}

/// Load samples from a CSV file on disk.
pub fn load_samples(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    debug!(path = %path.display(), "reading samples");
    load_samples_from_reader(file)
}

/// Load samples from any CSV source.
pub fn load_samples_from_reader<R: Read>(source: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let x_col = required_column(&header_map, "x")?;
    let y_col = required_column(&header_map, "y")?;

    let mut samples = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        rows_read += 1;

        let parsed = result
            .map_err(|e| format!("CSV parse error: {e}"))
            .and_then(|record| parse_row(&record, x_col, y_col));

        match parsed {
            Ok(sample) => samples.push(sample),
            Err(message) => {
                warn!(line, %message, "skipping row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    if samples.is_empty() {
        return Err(AppError::input(format!(
            "No usable rows in CSV ({rows_read} read, {} rejected).",
            row_errors.len()
        )));
    }

    debug!(rows_read, rows_used = samples.len(), "ingest complete");
    Ok(IngestedData {
        samples,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn required_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))
}

fn parse_row(record: &StringRecord, x_col: usize, y_col: usize) -> Result<SamplePair, String> {
    let x = parse_cell(record, x_col, "x")?;
    let y = parse_cell(record, y_col, "y")?;
    Ok(SamplePair::new(x, y))
}

fn parse_cell(record: &StringRecord, col: usize, name: &str) -> Result<f64, String> {
    let raw = record.get(col).unwrap_or("");
    if raw.is_empty() {
        return Err(format!("Blank `{name}`"));
    }
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("Non-numeric `{name}`: '{raw}'"))?;
    if !v.is_finite() {
        return Err(format!("Non-finite `{name}`: '{raw}'"));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<IngestedData, AppError> {
        load_samples_from_reader(text.as_bytes())
    }

    #[test]
    fn reads_x_and_y_in_file_order() {
        let data = load("x,y\n3,9\n1,1\n2,4\n").unwrap();
        assert_eq!(
            data.samples,
            vec![SamplePair::new(3.0, 9.0), SamplePair::new(1.0, 1.0), SamplePair::new(2.0, 4.0)]
        );
        assert!(data.row_errors.is_empty());
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.rows_used(), 3);
    }

    #[test]
    fn headers_are_case_insensitive_and_extra_columns_ignored() {
        let data = load("\u{feff}Label, X ,Y\na,0.5,1e2\nb,1.5,-3\n").unwrap();
        assert_eq!(data.samples, vec![SamplePair::new(0.5, 100.0), SamplePair::new(1.5, -3.0)]);
    }

    #[test]
    fn bad_rows_are_skipped_with_line_numbers() {
        let data = load("x,y\n0,0\n1,\nabc,2\n3,NaN\n4,16\n").unwrap();
        assert_eq!(data.samples, vec![SamplePair::new(0.0, 0.0), SamplePair::new(4.0, 16.0)]);
        assert_eq!(data.rows_read, 5);

        let lines: Vec<usize> = data.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5]);
        assert!(data.row_errors[0].message.contains("Blank `y`"));
        assert!(data.row_errors[1].message.contains("Non-numeric `x`"));
        assert!(data.row_errors[2].message.contains("Non-finite `y`"));
    }

    #[test]
    fn short_rows_count_as_blank() {
        let data = load("x,y\n1\n2,4\n").unwrap();
        assert_eq!(data.samples, vec![SamplePair::new(2.0, 4.0)]);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 2);
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let err = load("time,velocity\n0,0\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`x`"));
    }

    #[test]
    fn no_usable_rows_is_an_input_error() {
        let err = load("x,y\n,\nfoo,bar\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("No usable rows"));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_samples(Path::new("/nonexistent/fitint/samples.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
