//! FHX fire-history file decoder.
//!
//! Loads the fixed-width FHX2 text format into a [`FireHistoryDocument`] and
//! derives, per event variant, the event matrix, the recorder-year matrix,
//! per-year filter totals, composite event years, seasonal scar tallies and
//! the finalized [`FhSeries`] list.

pub mod composite;
pub mod config;
pub mod document;
pub mod error;
pub mod format;
pub mod matrix;
pub mod reader;
pub mod series;

pub use composite::{FilterType, SampleDepthFilterType};
pub use config::{CharsetPolicy, CompositeFilter, ReaderConfig};
pub use document::FireHistoryDocument;
pub use error::{BadLineReason, Error, Result, Warning};
pub use format::{EventType, FileFormat, YearCode};
pub use matrix::{
    EventState, FilterRow, RecorderState, SampleMatrix, Season, SeasonalTally, UNDEFINED_PERCENT,
};
pub use reader::RawFile;
pub use series::{CategoryEntry, FhSeries};
