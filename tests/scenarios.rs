use fhx::{EventState, EventType, FilterType, FireHistoryDocument, Warning, YearCode};

#[test]
fn two_samples_with_year_suffixes() {
    let text = "FHX2 FORMAT\n1850 2 3\nAB\nAB\nAB\n\nU. 1850\n|a 1851\n.{ 1852\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    assert_eq!(doc.first_year(), 1850);
    assert_eq!(doc.last_year(), 1852);
    assert_eq!(doc.years(), vec![1850, 1851, 1852]);
    assert_eq!(doc.series_names(), &["AAA".to_string(), "BBB".to_string()]);
    assert_eq!(doc.raw().code(0, 0), Some(YearCode::Fire('U')));
    assert_eq!(
        doc.event_matrix(EventType::Fire).get(0, 0),
        Some(EventState::Event)
    );
    assert!(doc.passes_basic_syntax_check());
}

#[test]
fn short_row_is_flagged_but_keeps_its_year() {
    let text = "FHX2 FORMAT\n1900 3 1\nABC\n\n{{{\n|\n}}}\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    assert_eq!(doc.bad_lines(), &[1]);
    assert!(!doc.passes_basic_syntax_check());
    assert_eq!(doc.years().len(), 3);
    assert!(doc
        .warnings()
        .iter()
        .any(|w| matches!(w, Warning::BadDataLine { index: 1, .. })));
}

#[test]
fn pith_to_bark_series_records_every_year() {
    let text = "FHX2 FORMAT\n1600 1 1\nP\n\n{\n|\n|\n|\n}\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    let series = doc.series();
    assert_eq!(series.len(), 1);
    let s = &series[0];
    assert!(s.has_pith());
    assert!(s.has_bark());
    assert_eq!(s.first_year(), 1600);
    assert_eq!(s.last_year(), 1604);
    assert!(s.recording_years().iter().all(|r| *r));
    assert!(s.event_years().iter().all(|e| !*e));
    assert!(s.injury_years().iter().all(|i| !*i));
}

#[test]
fn percentage_composite_respects_minimum_depth() {
    // Year 1 has one event among two contributing trees; year 0 has depth 1.
    let text = "FHX2 FORMAT\n1900 2 1\nAB\n\nU.\n.U\nU|\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    let filters = doc.filter_array(EventType::Fire);
    assert_eq!(filters.get(1).expect("row").contributing, 2);
    assert_eq!(filters.get(1).expect("row").percent_scarred, Some(50.0));

    let years = doc.composite_years(EventType::Fire, FilterType::PercentageOfEvents, 50.0, 2);
    assert_eq!(years, vec![1901, 1902]);
    assert!(!years.contains(&1900));
}

#[test]
fn recorder_matrix_uses_neighbouring_years() {
    let text = "FHX2 FORMAT\n1700 2 1\nAB\n\n[{\n|.\na.\n.a\n]}\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");
    let fire = doc.recorder_matrix(EventType::Fire);

    use fhx::RecorderState::{NotRecording as N, Recording as R};
    // Sample 0: '[' borrows from '|', 'a' looks back to '|', ']' stops at the '.' before it.
    assert_eq!(fire.sample(0).expect("sample 0"), &[R, R, R, N, N]);
    // Sample 1: nothing records.
    assert_eq!(fire.sample(1).expect("sample 1"), &[N, N, N, N, N]);

    let injury = doc.recorder_matrix(EventType::Injury);
    assert_eq!(injury.sample(1).expect("sample 1"), &[N, N, N, R, R]);
    assert_eq!(doc.total_recording_years(EventType::Fire), &[3, 0]);
}

#[test]
fn depths_and_percentages() {
    let text = "FHX2 FORMAT\n1700 2 1\nAB\n\n{.\nU{\n|U\n}}\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    assert_eq!(doc.sample_depths(EventType::Fire), &[1, 2, 2, 2]);
    assert_eq!(doc.recording_depths(EventType::Fire), &[1, 2, 2, 2]);
    assert_eq!(
        doc.percent_of_recording_scarred(EventType::Fire),
        vec![Some(0.0), Some(50.0), Some(50.0), Some(0.0)]
    );
    assert_eq!(
        doc.percent_of_all_scarred(EventType::Fire),
        vec![Some(0.0), Some(50.0), Some(50.0), Some(0.0)]
    );
}

#[test]
fn per_sample_markers_and_years() {
    let text = "FHX2 FORMAT\n1800 2 1\nAB\n\n..\n{[\n|a\nU|\n}]\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    let a = doc.sample_markers(0).expect("sample 0");
    assert_eq!(a.pith, Some(1));
    assert_eq!(a.bark, Some(4));
    assert_eq!(a.first_fire, Some(3));
    let b = doc.sample_markers(1).expect("sample 1");
    assert_eq!(b.inner_ring, Some(1));
    assert_eq!(b.outer_ring, Some(4));
    assert_eq!(b.first_injury, Some(2));

    assert_eq!(doc.sample_start_year(0), Some(1801));
    assert_eq!(doc.sample_last_year(1), Some(1804));
    assert!(doc.sample_markers(2).is_none());

    let series = doc.series();
    assert_eq!(series.len(), 2);
    assert!(series[0].has_pith() && series[0].has_bark());
    assert!(!series[1].has_pith() && !series[1].has_bark());
}

#[test]
fn year_summary_and_event_presence() {
    let text = "FHX2 FORMAT\n1900 2 1\nAB\n\n..\n|.\n.a\n";
    let doc = FireHistoryDocument::from_text(text).expect("load");

    assert!(!doc.has_fire_events());
    assert!(doc.has_injury_events());
    assert_eq!(
        doc.year_summary(EventType::Injury),
        vec![EventState::NoData, EventState::Recording, EventState::Event]
    );
    assert_eq!(doc.first_fire_year(), None);
    assert_eq!(doc.first_injury_year(), Some(1902));
}
