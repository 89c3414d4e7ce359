//! Event classification per variant.

use super::{EventState, SampleMatrix};
use crate::format::{EventAlphabet, EventType, YearCode};
use crate::reader::RawFile;

/// Event matrix for one variant plus where each sample's events lie.
#[derive(Debug, Clone)]
pub struct EventAnalysis {
    pub event_type: EventType,
    pub matrix: SampleMatrix<EventState>,
    /// Index of each sample's first event, if any.
    pub first_event: Vec<Option<usize>>,
    /// Index of each sample's last event, if any.
    pub last_event: Vec<Option<usize>>,
    /// One state per year across all samples, see [`summarize_years`].
    pub summary: Vec<EventState>,
}

impl EventAnalysis {
    /// Earliest first-event index across samples.
    pub fn first_event_index(&self) -> Option<usize> {
        self.first_event.iter().flatten().copied().min()
    }

    pub fn has_events(&self) -> bool {
        self.first_event.iter().any(Option::is_some)
    }

    pub fn year_summary(&self) -> &[EventState] {
        &self.summary
    }
}

pub fn classify_cell(alphabet: &EventAlphabet, code: YearCode) -> EventState {
    if alphabet.is_event(code) {
        EventState::Event
    } else if code == YearCode::Recording {
        EventState::Recording
    } else {
        EventState::NoData
    }
}

/// First and last index of a primary-alphabet letter in one column.
pub fn event_bounds(column: &[YearCode], alphabet: &EventAlphabet) -> (Option<usize>, Option<usize>) {
    let first = column.iter().position(|code| alphabet.is_event(*code));
    let last = column.iter().rposition(|code| alphabet.is_event(*code));
    (first, last)
}

/// Collapse every year to one state over the raw codes.
///
/// A primary letter in any sample makes the year an `Event`. Otherwise a `|`
/// or a secondary letter makes it `Recording`, since a scar of the other kind
/// shows the tree was there to record. Markers and `.` alone leave `NoData`.
pub fn summarize_years(raw: &RawFile, alphabet: &EventAlphabet) -> Vec<EventState> {
    let mut summary = vec![EventState::NoData; raw.year_count()];
    for column in raw.columns() {
        for (slot, code) in summary.iter_mut().zip(column) {
            let state = if alphabet.is_event(*code) {
                EventState::Event
            } else if *code == YearCode::Recording || alphabet.is_cross_event(*code) {
                EventState::Recording
            } else {
                EventState::NoData
            };
            *slot = (*slot).max(state);
        }
    }
    summary
}

pub fn classify(raw: &RawFile, event_type: EventType) -> EventAnalysis {
    let alphabet = event_type.alphabet();
    let mut rows = Vec::with_capacity(raw.sample_count());
    let mut first_event = Vec::with_capacity(raw.sample_count());
    let mut last_event = Vec::with_capacity(raw.sample_count());

    for column in raw.columns() {
        rows.push(
            column
                .iter()
                .map(|code| classify_cell(&alphabet, *code))
                .collect(),
        );
        let (first, last) = event_bounds(column, &alphabet);
        first_event.push(first);
        last_event.push(last);
    }

    EventAnalysis {
        event_type,
        matrix: SampleMatrix::new(rows, raw.year_count()),
        first_event,
        last_event,
        summary: summarize_years(raw, &alphabet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_text;

    fn raw(rows: &[&str]) -> RawFile {
        let width = rows[0].len();
        let names = "X".repeat(width);
        let text = format!("FHX2 FORMAT\n1900 {width} 1\n{names}\n\n{}\n", rows.join("\n"));
        parse_text(&text).unwrap()
    }

    #[test]
    fn fire_accepts_uppercase_only() {
        let raw = raw(&["U|", "a.", "|D"]);
        let analysis = classify(&raw, EventType::Fire);
        assert_eq!(
            analysis.matrix.sample(0).unwrap(),
            &[EventState::Event, EventState::NoData, EventState::Recording]
        );
        assert_eq!(
            analysis.matrix.sample(1).unwrap(),
            &[EventState::Recording, EventState::NoData, EventState::Event]
        );
        assert_eq!(analysis.first_event, vec![Some(0), Some(2)]);
        assert_eq!(analysis.first_event_index(), Some(0));
    }

    #[test]
    fn injury_accepts_lowercase_only() {
        let raw = raw(&["U|", "a.", "|d"]);
        let analysis = classify(&raw, EventType::Injury);
        assert_eq!(
            analysis.matrix.sample(0).unwrap(),
            &[EventState::NoData, EventState::Event, EventState::Recording]
        );
        assert_eq!(analysis.first_event, vec![Some(1), Some(2)]);
        assert_eq!(analysis.first_event_index(), Some(1));
    }

    #[test]
    fn combined_accepts_both_cases() {
        let raw = raw(&["U|", "a.", "|d"]);
        let analysis = classify(&raw, EventType::FireOrInjury);
        assert_eq!(
            analysis.matrix.sample(0).unwrap(),
            &[EventState::Event, EventState::Event, EventState::Recording]
        );
        assert_eq!(analysis.last_event, vec![Some(1), Some(2)]);
    }

    #[test]
    fn markers_are_no_data() {
        let raw = raw(&["{", "|", "}"]);
        let analysis = classify(&raw, EventType::Fire);
        assert_eq!(
            analysis.matrix.sample(0).unwrap(),
            &[EventState::NoData, EventState::Recording, EventState::NoData]
        );
        assert!(!analysis.has_events());
        assert_eq!(analysis.first_event_index(), None);
    }

    #[test]
    fn year_summary_collapses_samples() {
        let raw = raw(&["U.", "|.", ".."]);
        let analysis = classify(&raw, EventType::Fire);
        assert_eq!(
            analysis.year_summary(),
            &[EventState::Event, EventState::Recording, EventState::NoData]
        );
    }

    #[test]
    fn year_summary_counts_other_letters_as_recording() {
        use crate::matrix::EventState::{Event as E, NoData as N, Recording as R};
        let raw = raw(&["..", "a.", "U|", "{]"]);
        assert_eq!(classify(&raw, EventType::Fire).year_summary(), &[N, R, E, N]);
        assert_eq!(classify(&raw, EventType::Injury).year_summary(), &[N, E, R, N]);
        assert_eq!(
            classify(&raw, EventType::FireOrInjury).year_summary(),
            &[N, E, E, N]
        );
    }

    #[test]
    fn year_summary_differs_from_event_matrix_for_cross_letters() {
        let raw = raw(&["a"]);
        let analysis = classify(&raw, EventType::Fire);
        assert_eq!(analysis.matrix.get(0, 0), Some(EventState::NoData));
        assert_eq!(analysis.year_summary(), &[EventState::Recording]);
    }
}
