//! Recorder-year resolution.
//!
//! A year is a recorder year when the tree could have preserved a scar of the
//! chosen variant. Unambiguous codes decide on their own; markers and
//! other-variant letters borrow from the neighbouring years, and the backward
//! scan never crosses the sample's start.

use super::range::SampleRange;
use super::{RecorderState, SampleMatrix};
use crate::format::{EventAlphabet, EventType, YearCode};
use crate::reader::RawFile;

/// Recorder matrix for one variant plus recorder-year totals per sample.
#[derive(Debug, Clone)]
pub struct RecorderAnalysis {
    pub event_type: EventType,
    pub matrix: SampleMatrix<RecorderState>,
    pub recording_years: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Forward,
    Backward,
}

/// Walk `column` from `from` towards `limit` (inclusive) and return the first
/// cell matching `predicate`.
///
/// Returns `None` when `from` already lies past `limit` in the scan
/// direction, when `from` is outside the column, or when no cell matches.
pub fn scan_until<P>(
    column: &[YearCode],
    from: usize,
    direction: ScanDirection,
    limit: usize,
    predicate: P,
) -> Option<(usize, YearCode)>
where
    P: Fn(YearCode) -> bool,
{
    if from >= column.len() {
        return None;
    }
    let hit = |idx: usize| {
        let code = column[idx];
        predicate(code).then_some((idx, code))
    };
    match direction {
        ScanDirection::Forward => {
            let end = limit.min(column.len() - 1);
            if from > end {
                return None;
            }
            (from..=end).find_map(hit)
        }
        ScanDirection::Backward => {
            if from < limit {
                return None;
            }
            (limit..=from).rev().find_map(hit)
        }
    }
}

/// The year right after `j` exists inside the range and is `|` or a primary letter.
fn next_year_records(column: &[YearCode], j: usize, last: usize, alphabet: &EventAlphabet) -> bool {
    let next = j + 1;
    scan_until(column, next, ScanDirection::Forward, next.min(last), |_| true)
        .map_or(false, |(_, code)| alphabet.is_recording_evidence(code))
}

/// Look back for the nearest decisive code, stopping at `start`.
fn earlier_years_record(
    column: &[YearCode],
    j: usize,
    start: usize,
    alphabet: &EventAlphabet,
) -> RecorderState {
    let Some(from) = j.checked_sub(1) else {
        return RecorderState::NotRecording;
    };
    let decisive = |code: YearCode| {
        matches!(code, YearCode::NotRecording | YearCode::Recording)
            || code.is_start_marker()
            || alphabet.is_event(code)
    };
    match scan_until(column, from, ScanDirection::Backward, start, decisive) {
        Some((_, code)) if alphabet.is_recording_evidence(code) => RecorderState::Recording,
        _ => RecorderState::NotRecording,
    }
}

/// Recorder state of year `j`, which must lie within `start..=last`.
pub fn classify_year(
    column: &[YearCode],
    j: usize,
    start: usize,
    last: usize,
    alphabet: &EventAlphabet,
) -> RecorderState {
    let code = column[j];
    if alphabet.is_recording_evidence(code) {
        return RecorderState::Recording;
    }
    match code {
        YearCode::NotRecording => RecorderState::NotRecording,
        code if code.is_start_marker() => {
            if next_year_records(column, j, last, alphabet) {
                RecorderState::Recording
            } else {
                RecorderState::NotRecording
            }
        }
        code if code.is_end_marker() => earlier_years_record(column, j, start, alphabet),
        code if alphabet.is_cross_event(code) => {
            if next_year_records(column, j, last, alphabet) {
                RecorderState::Recording
            } else {
                earlier_years_record(column, j, start, alphabet)
            }
        }
        other => {
            log::trace!("treating {:?} at index {j} as not recording", other.as_char());
            RecorderState::NotRecording
        }
    }
}

pub fn resolve_sample(
    column: &[YearCode],
    range: &SampleRange,
    alphabet: &EventAlphabet,
) -> Vec<RecorderState> {
    let mut states = vec![RecorderState::OutOfRange; column.len()];
    if let Some((start, last)) = range.bounds() {
        let last = last.min(column.len().saturating_sub(1));
        for j in start..=last {
            states[j] = classify_year(column, j, start, last, alphabet);
        }
    }
    states
}

pub fn resolve(raw: &RawFile, ranges: &[SampleRange], event_type: EventType) -> RecorderAnalysis {
    let alphabet = event_type.alphabet();
    let mut rows = Vec::with_capacity(raw.sample_count());
    let mut recording_years = Vec::with_capacity(raw.sample_count());

    for (column, range) in raw.columns().zip(ranges) {
        let states = resolve_sample(column, range, &alphabet);
        recording_years.push(states.iter().filter(|s| s.is_recording()).count());
        rows.push(states);
    }

    RecorderAnalysis {
        event_type,
        matrix: SampleMatrix::new(rows, raw.year_count()),
        recording_years,
    }
}
