use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Fatal failures. Anything that leaves a usable document behind is a
/// [`Warning`] instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no 'FHX2 FORMAT' or 'FIRE2 FORMAT' line found")]
    MissingHeader,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("unknown charset label: {0}")]
    UnknownCharset(String),

    #[error("unsupported filter type: {0}")]
    UnsupportedFilterType(String),

    #[error("unsupported event type: {0}")]
    UnsupportedEventType(String),

    #[error("unsupported sample depth filter type: {0}")]
    UnsupportedDepthFilterType(String),

    #[error(
        "series '{title}' arrays differ in length: recording={recording} event={event} injury={injury}"
    )]
    SeriesLengthMismatch {
        title: String,
        recording: usize,
        event: usize,
        injury: usize,
    },

    #[error("invalid filter config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-row and per-sample anomalies collected while the document stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Warning {
    /// Row length mismatch or non-numeric year suffix.
    BadDataLine {
        /// Index of the row within the data block (same index as the year).
        index: usize,
        /// 1-based line number in the decoded file.
        line_number: usize,
        reason: BadLineReason,
    },
    /// Character outside the FHX alphabet at one cell.
    InvalidYearCode {
        sample: usize,
        year: i32,
        code: char,
    },
    /// Sample whose resolved range is missing or spans at most one year.
    EmptySampleRange {
        sample: usize,
        title: String,
        start: Option<usize>,
        last: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BadLineReason {
    /// Fewer characters than samples; the row was padded with `.`.
    TooShort { len: usize, expected: usize },
    /// Trailing text after the sample columns is not a year echo.
    BadYearSuffix,
}

impl BadLineReason {
    pub fn is_too_short(&self) -> bool {
        matches!(self, BadLineReason::TooShort { .. })
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::BadDataLine {
                index,
                line_number,
                reason,
            } => match reason {
                BadLineReason::TooShort { len, expected } => write!(
                    f,
                    "bad data line {line_number} (row {index}): {len} characters, expected {expected}"
                ),
                BadLineReason::BadYearSuffix => write!(
                    f,
                    "bad data line {line_number} (row {index}): year suffix is not numeric"
                ),
            },
            Warning::InvalidYearCode { sample, year, code } => {
                write!(f, "invalid code {code:?} for sample {sample} in {year}")
            }
            Warning::EmptySampleRange {
                sample,
                title,
                start,
                last,
            } => write!(
                f,
                "sample {sample} ({}) has no usable range (start={start:?}, last={last:?})",
                title.trim()
            ),
        }
    }
}
