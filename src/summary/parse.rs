use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use csv::StringRecord;

use super::result::TestResult;
use crate::error::ProbeError;

const TIME_COLUMN: &str = "time";
const LOAD_TIME_COLUMN: &str = "load_time_ms";
const TTFB_COLUMN: &str = "time_to_first_byte_ms";

/// The measurements live in the second data row after the header; the first
/// is a sub-header the test server emits above the per-run rows.
const RESULT_ROW: usize = 1;

/// Accepted `time` column formats, tried in order. An all-digit value is
/// treated as epoch seconds instead.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Map a summary CSV body to a `TestResult`.
/// The header row is required; header names are matched after normalization,
/// so `Load Time (ms)` and `load_time_ms` resolve to the same column. A
/// missing column, a missing result row, or a non-numeric timing is an error.
pub fn parse_summary(body: &str, csv_url: &str) -> Result<TestResult, ProbeError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    let time_column = column(&headers, TIME_COLUMN)?;
    let load_time_column = column(&headers, LOAD_TIME_COLUMN)?;
    let ttfb_column = column(&headers, TTFB_COLUMN)?;

    let record = reader
        .records()
        .nth(RESULT_ROW)
        .ok_or(ProbeError::MissingRow(RESULT_ROW))??;

    Ok(TestResult {
        timestamp_of_test: parse_timestamp(record.get(time_column).unwrap_or(""))?,
        load_time: numeric_field(&record, load_time_column, LOAD_TIME_COLUMN)?,
        time_to_first_byte: numeric_field(&record, ttfb_column, TTFB_COLUMN)?,
        csv_url: csv_url.to_string(),
    })
}

/// Normalize a CSV header to a lookup key: lowercase, whitespace to `_`,
/// anything outside `[a-z0-9_]` dropped.
fn normalize_header(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            key.push('_');
        } else {
            for lower in ch.to_lowercase() {
                if lower.is_ascii_alphanumeric() || lower == '_' {
                    key.push(lower);
                }
            }
        }
    }
    key
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize, ProbeError> {
    headers
        .iter()
        .position(|header| normalize_header(header) == name)
        .ok_or(ProbeError::MissingColumn(name))
}

fn numeric_field(
    record: &StringRecord,
    index: usize,
    name: &'static str,
) -> Result<i64, ProbeError> {
    let raw = record.get(index).unwrap_or("").trim();
    raw.parse::<i64>().map_err(|_| ProbeError::InvalidField {
        field: name,
        value: raw.to_string(),
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ProbeError> {
    let raw = raw.trim();

    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        let epoch: i64 = raw
            .parse()
            .map_err(|_| ProbeError::Timestamp(raw.to_string()))?;
        return DateTime::from_timestamp(epoch, 0).ok_or_else(|| ProbeError::Timestamp(raw.to_string()));
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(ProbeError::Timestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BODY: &str =
        "time,load_time_ms,time_to_first_byte_ms\nheader,header,header\n\"2024-01-01 12:00:00\",1234,56\n";

    fn expected_timestamp() -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Utc.from_utc_datetime(&naive)
    }

    #[test]
    fn maps_second_data_row() {
        let result = parse_summary(BODY, "http://x/y.csv").unwrap();
        assert_eq!(result.load_time, 1234);
        assert_eq!(result.time_to_first_byte, 56);
        assert_eq!(result.timestamp_of_test, expected_timestamp());
        assert_eq!(result.csv_url, "http://x/y.csv");
    }

    #[test]
    fn matches_normalized_headers() {
        let body = "Date,Time,Load Time (ms),Time to First Byte (ms)\n\
                    sub,sub,sub,sub\n\
                    \"2024-01-01\",\"2024-01-01 12:00:00\",1234,56\n";
        let result = parse_summary(body, "http://x/y.csv").unwrap();
        assert_eq!(result.load_time, 1234);
        assert_eq!(result.time_to_first_byte, 56);
    }

    #[test]
    fn epoch_seconds_timestamp() {
        let body = "time,load_time_ms,time_to_first_byte_ms\nsub,sub,sub\n1704110400,100,10\n";
        let result = parse_summary(body, "u").unwrap();
        assert_eq!(
            result.timestamp_of_test,
            DateTime::from_timestamp(1_704_110_400, 0).unwrap()
        );
    }

    #[test]
    fn missing_column_is_an_error() {
        let body = "time,time_to_first_byte_ms\nsub,sub\n\"2024-01-01 12:00:00\",56\n";
        match parse_summary(body, "u") {
            Err(ProbeError::MissingColumn(name)) => assert_eq!(name, "load_time_ms"),
            other => panic!("expected missing column error, got {other:?}"),
        }
    }

    #[test]
    fn missing_result_row_is_an_error() {
        let body = "time,load_time_ms,time_to_first_byte_ms\n\"2024-01-01 12:00:00\",1234,56\n";
        assert!(matches!(
            parse_summary(body, "u"),
            Err(ProbeError::MissingRow(1))
        ));
    }

    #[test]
    fn non_numeric_timing_is_an_error() {
        let body =
            "time,load_time_ms,time_to_first_byte_ms\nsub,sub,sub\n\"2024-01-01 12:00:00\",fast,56\n";
        match parse_summary(body, "u") {
            Err(ProbeError::InvalidField { field, value }) => {
                assert_eq!(field, "load_time_ms");
                assert_eq!(value, "fast");
            }
            other => panic!("expected invalid field error, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_timestamp_is_an_error() {
        let body = "time,load_time_ms,time_to_first_byte_ms\nsub,sub,sub\nyesterday,1234,56\n";
        assert!(matches!(
            parse_summary(body, "u"),
            Err(ProbeError::Timestamp(_))
        ));
    }

    #[test]
    fn normalizes_header_names() {
        assert_eq!(normalize_header("Load Time (ms)"), "load_time_ms");
        assert_eq!(normalize_header("  time  "), "time");
        assert_eq!(normalize_header("Time to First Byte (ms)"), "time_to_first_byte_ms");
    }
}
