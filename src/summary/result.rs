use chrono::{DateTime, Utc};

/// One summarized page test, as persisted. Timings are milliseconds as
/// reported by the test server.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub timestamp_of_test: DateTime<Utc>,
    pub load_time: i64,
    pub time_to_first_byte: i64,
    pub csv_url: String,
}
