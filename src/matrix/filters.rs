//! Per-year aggregates across samples.

use serde::Serialize;

use super::{RecorderState, SampleMatrix};
use crate::format::{EventType, YearCode};
use crate::reader::RawFile;

use super::events::event_bounds;

/// Legacy stand-in for an undefined percentage.
pub const UNDEFINED_PERCENT: f64 = -99.0;

/// Totals for one year of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterRow {
    pub event_count: usize,
    pub contributing: usize,
    /// `100 * event_count / contributing`; `None` when nothing contributes.
    pub percent_scarred: Option<f64>,
}

impl FilterRow {
    pub fn new(event_count: usize, contributing: usize) -> Self {
        Self {
            event_count,
            contributing,
            percent_scarred: percent(event_count, contributing),
        }
    }

    /// Percent scarred with [`UNDEFINED_PERCENT`] standing in for `None`.
    pub fn percent_or_sentinel(&self) -> f64 {
        self.percent_scarred.unwrap_or(UNDEFINED_PERCENT)
    }
}

/// One [`FilterRow`] per year of the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterArray {
    pub event_type: EventType,
    rows: Vec<FilterRow>,
}

impl FilterArray {
    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn get(&self, year_index: usize) -> Option<&FilterRow> {
        self.rows.get(year_index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn event_counts(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.event_count).collect()
    }

    pub fn contributing(&self) -> Vec<usize> {
        self.rows.iter().map(|row| row.contributing).collect()
    }

    pub fn percents(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.percent_scarred).collect()
    }
}

/// `100 * part / whole`, undefined for an empty whole.
pub fn percent(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| 100.0 * part as f64 / whole as f64)
}

/// Build the filter array of one variant.
///
/// Independent of sample ranges: a sample contributes to a year once that
/// year has reached its own first event and something other than `.` or a
/// marker has been seen in the sample up to and including that year.
pub fn build(raw: &RawFile, event_type: EventType) -> FilterArray {
    let alphabet = event_type.alphabet();
    let columns: Vec<&[YearCode]> = raw.columns().collect();
    let first_events: Vec<Option<usize>> = columns
        .iter()
        .map(|column| event_bounds(column, &alphabet).0)
        .collect();
    let mut seen = vec![false; columns.len()];
    let mut rows = Vec::with_capacity(raw.year_count());

    for year in 0..raw.year_count() {
        let mut event_count = 0;
        let mut contributing = 0;
        for (sample, column) in columns.iter().enumerate() {
            let code = column[year];
            if alphabet.is_event(code) {
                event_count += 1;
            }
            if code.is_letter() || code == YearCode::Recording {
                seen[sample] = true;
            }
            let reached = first_events[sample].map_or(false, |first| year >= first);
            if reached && seen[sample] {
                contributing += 1;
            }
        }
        rows.push(FilterRow::new(event_count, contributing));
    }

    FilterArray { event_type, rows }
}

/// Samples per year that are within range, recording or not.
pub fn sample_depths(recorder: &SampleMatrix<RecorderState>) -> Vec<usize> {
    recorder.count_per_year(RecorderState::in_range)
}

/// Samples per year in recording status.
pub fn recording_depths(recorder: &SampleMatrix<RecorderState>) -> Vec<usize> {
    recorder.count_per_year(RecorderState::is_recording)
}

/// Per-year `100 * events / depth`.
pub fn percent_per_year(event_counts: &[usize], depths: &[usize]) -> Vec<Option<f64>> {
    event_counts
        .iter()
        .zip(depths)
        .map(|(events, depth)| percent(*events, *depth))
        .collect()
}
