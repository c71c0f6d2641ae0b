use std::fmt::Write;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("test server url cannot be a base: {0}")]
    ServerUrl(String),

    #[error("missing <{0}> element in test server response")]
    MissingElement(&'static str),

    #[error("result not ready after {attempts} polls")]
    PollExhausted { attempts: u32 },

    #[error("failed to parse results csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("results csv has no data row at index {0}")]
    MissingRow(usize),

    #[error("results csv is missing the {0:?} column")]
    MissingColumn(&'static str),

    #[error("field {field:?} is not numeric: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("unrecognized timestamp: {0:?}")]
    Timestamp(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
