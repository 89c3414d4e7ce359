//! Derived per-sample, per-year matrices.
//!
//! Every matrix here is a pure function of the [`RawFile`](crate::reader::RawFile)
//! grid, so computing one twice yields identical results.

pub mod events;
pub mod filters;
pub mod range;
pub mod recorder;
pub mod season;

use serde::Serialize;

pub use events::EventAnalysis;
pub use filters::{FilterArray, FilterRow, UNDEFINED_PERCENT};
pub use range::{SampleMarkers, SampleRange};
pub use recorder::{scan_until, RecorderAnalysis, ScanDirection};
pub use season::{Season, SeasonCounts, SeasonTotals, SeasonalTally};

/// Event occurrence at one cell. Ordered `NoData < Recording < Event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EventState {
    NoData,
    Recording,
    Event,
}

impl EventState {
    /// Legacy numeric code: -1, 0, 1.
    pub fn code(self) -> i8 {
        match self {
            EventState::NoData => -1,
            EventState::Recording => 0,
            EventState::Event => 1,
        }
    }

    pub fn is_event(self) -> bool {
        self == EventState::Event
    }
}

/// Capability to record at one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecorderState {
    OutOfRange,
    NotRecording,
    Recording,
}

impl RecorderState {
    /// Legacy numeric code: -1, 0, 1.
    pub fn code(self) -> i8 {
        match self {
            RecorderState::OutOfRange => -1,
            RecorderState::NotRecording => 0,
            RecorderState::Recording => 1,
        }
    }

    pub fn is_recording(self) -> bool {
        self == RecorderState::Recording
    }

    pub fn in_range(self) -> bool {
        self != RecorderState::OutOfRange
    }
}

/// Sample-major matrix: one row per sample, one cell per year of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleMatrix<T> {
    rows: Vec<Vec<T>>,
    year_count: usize,
}

impl<T: Copy> SampleMatrix<T> {
    pub(crate) fn new(rows: Vec<Vec<T>>, year_count: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == year_count));
        Self { rows, year_count }
    }

    pub fn sample_count(&self) -> usize {
        self.rows.len()
    }

    pub fn year_count(&self) -> usize {
        self.year_count
    }

    pub fn sample(&self, sample: usize) -> Option<&[T]> {
        self.rows.get(sample).map(Vec::as_slice)
    }

    pub fn samples(&self) -> impl Iterator<Item = &[T]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn get(&self, sample: usize, year_index: usize) -> Option<T> {
        self.rows.get(sample)?.get(year_index).copied()
    }

    /// Count samples per year whose cell satisfies `predicate`.
    pub fn count_per_year(&self, predicate: impl Fn(T) -> bool) -> Vec<usize> {
        let mut counts = vec![0usize; self.year_count];
        for row in &self.rows {
            for (count, cell) in counts.iter_mut().zip(row.iter()) {
                if predicate(*cell) {
                    *count += 1;
                }
            }
        }
        counts
    }
}

impl SampleMatrix<EventState> {
    /// Numeric view as handed to statistics collaborators.
    pub fn to_codes(&self) -> Vec<Vec<i8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }
}

impl SampleMatrix<RecorderState> {
    pub fn to_codes(&self) -> Vec<Vec<i8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }
}
