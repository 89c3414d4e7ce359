//! Immutable handle over one loaded FHX file.
//!
//! Loading is the only fallible step. Every derived matrix is computed on
//! first access and cached in a [`OnceLock`] slot keyed by variant, so
//! concurrent readers share a single result.

use std::path::Path;
use std::sync::OnceLock;

use crate::composite::{select_composite_years, CompositeInputs, FilterType};
use crate::config::{CompositeFilter, ReaderConfig};
use crate::error::{Result, Warning};
use crate::format::{EventType, FileFormat};
use crate::matrix::filters::{self, percent_per_year};
use crate::matrix::{
    events, range, recorder, season, EventAnalysis, EventState, FilterArray, RecorderAnalysis,
    RecorderState, SampleMarkers, SampleMatrix, SampleRange, SeasonalTally,
};
use crate::reader::{self, RawFile};
use crate::series::{self, FhSeries, SeriesSources};

type PerVariant<T> = [OnceLock<T>; 3];

#[derive(Debug, Default)]
struct MemoTable {
    ranges: OnceLock<(Vec<SampleRange>, Vec<Warning>)>,
    events: PerVariant<EventAnalysis>,
    recorders: PerVariant<RecorderAnalysis>,
    filters: PerVariant<FilterArray>,
    sample_depths: PerVariant<Vec<usize>>,
    recording_depths: PerVariant<Vec<usize>>,
    seasons: OnceLock<SeasonalTally>,
    series: OnceLock<Vec<FhSeries>>,
    warnings: OnceLock<Vec<Warning>>,
}

#[derive(Debug)]
pub struct FireHistoryDocument {
    raw: RawFile,
    memo: MemoTable,
}

impl FireHistoryDocument {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &ReaderConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: &ReaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let raw = reader::load_path(path, config)?;
        log::info!(
            "loaded {}: {} samples, {}..={}",
            path.display(),
            raw.sample_count(),
            raw.first_year(),
            raw.last_year()
        );
        Ok(Self::from_raw(raw))
    }

    pub fn from_bytes(bytes: &[u8], config: &ReaderConfig) -> Result<Self> {
        reader::load_bytes(bytes, config).map(Self::from_raw)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        reader::parse_text(text).map(Self::from_raw)
    }

    pub fn from_raw(raw: RawFile) -> Self {
        Self {
            raw,
            memo: MemoTable::default(),
        }
    }

    pub fn raw(&self) -> &RawFile {
        &self.raw
    }

    // ---- file-level facts ----

    pub fn format(&self) -> FileFormat {
        self.raw.format()
    }

    pub fn file_contents(&self) -> &str {
        self.raw.contents()
    }

    pub fn encoding(&self) -> &'static str {
        self.raw.encoding()
    }

    pub fn source(&self) -> Option<&Path> {
        self.raw.source()
    }

    /// File name of the source, when loaded from disk.
    pub fn name(&self) -> Option<&str> {
        self.raw.source()?.file_name()?.to_str()
    }

    pub fn first_year(&self) -> i32 {
        self.raw.first_year()
    }

    pub fn last_year(&self) -> i32 {
        self.raw.last_year()
    }

    pub fn years(&self) -> Vec<i32> {
        self.raw.years()
    }

    pub fn year_count(&self) -> usize {
        self.raw.year_count()
    }

    pub fn sample_count(&self) -> usize {
        self.raw.sample_count()
    }

    pub fn name_length(&self) -> usize {
        self.raw.name_length()
    }

    pub fn series_names(&self) -> &[String] {
        self.raw.series_names()
    }

    pub fn passes_basic_syntax_check(&self) -> bool {
        self.raw.passes_basic_syntax_check()
    }

    pub fn bad_lines(&self) -> &[usize] {
        self.raw.bad_lines()
    }

    /// Load-time warnings followed by sample-range warnings.
    pub fn warnings(&self) -> &[Warning] {
        self.memo.warnings.get_or_init(|| {
            let mut all = self.raw.warnings().to_vec();
            all.extend(self.range_resolution().1.iter().cloned());
            all
        })
    }

    // ---- per-sample ranges ----

    fn range_resolution(&self) -> &(Vec<SampleRange>, Vec<Warning>) {
        self.memo.ranges.get_or_init(|| range::resolve_all(&self.raw))
    }

    pub fn sample_ranges(&self) -> &[SampleRange] {
        &self.range_resolution().0
    }

    pub fn sample_markers(&self, sample: usize) -> Option<SampleMarkers> {
        self.sample_ranges().get(sample).map(|range| range.markers)
    }

    /// Calendar year of a sample's range start.
    pub fn sample_start_year(&self, sample: usize) -> Option<i32> {
        let start = self.sample_ranges().get(sample)?.start?;
        Some(self.raw.year_at(start))
    }

    /// Calendar year of a sample's range end.
    pub fn sample_last_year(&self, sample: usize) -> Option<i32> {
        let last = self.sample_ranges().get(sample)?.last?;
        Some(self.raw.year_at(last))
    }

    // ---- events ----

    pub fn event_analysis(&self, event_type: EventType) -> &EventAnalysis {
        self.memo.events[event_type.index()].get_or_init(|| events::classify(&self.raw, event_type))
    }

    pub fn event_matrix(&self, event_type: EventType) -> &SampleMatrix<EventState> {
        &self.event_analysis(event_type).matrix
    }

    pub fn first_event_year(&self, event_type: EventType) -> Option<i32> {
        self.event_analysis(event_type)
            .first_event_index()
            .map(|idx| self.raw.year_at(idx))
    }

    pub fn first_fire_year(&self) -> Option<i32> {
        self.first_event_year(EventType::Fire)
    }

    pub fn first_injury_year(&self) -> Option<i32> {
        self.first_event_year(EventType::Injury)
    }

    pub fn first_indicator_year(&self) -> Option<i32> {
        self.first_event_year(EventType::FireOrInjury)
    }

    /// Per-year collapse across samples: event, recording, or no data.
    pub fn year_summary(&self, event_type: EventType) -> &[EventState] {
        self.event_analysis(event_type).year_summary()
    }

    pub fn has_events(&self, event_type: EventType) -> bool {
        self.event_analysis(event_type).has_events()
    }

    pub fn has_fire_events(&self) -> bool {
        self.has_events(EventType::Fire)
    }

    pub fn has_injury_events(&self) -> bool {
        self.has_events(EventType::Injury)
    }

    // ---- recorders ----

    pub fn recorder_analysis(&self, event_type: EventType) -> &RecorderAnalysis {
        self.memo.recorders[event_type.index()]
            .get_or_init(|| recorder::resolve(&self.raw, self.sample_ranges(), event_type))
    }

    pub fn recorder_matrix(&self, event_type: EventType) -> &SampleMatrix<RecorderState> {
        &self.recorder_analysis(event_type).matrix
    }

    /// Recorder years per sample.
    pub fn total_recording_years(&self, event_type: EventType) -> &[usize] {
        &self.recorder_analysis(event_type).recording_years
    }

    // ---- per-year aggregates ----

    pub fn filter_array(&self, event_type: EventType) -> &FilterArray {
        self.memo.filters[event_type.index()].get_or_init(|| filters::build(&self.raw, event_type))
    }

    pub fn sample_depths(&self, event_type: EventType) -> &[usize] {
        self.memo.sample_depths[event_type.index()]
            .get_or_init(|| filters::sample_depths(self.recorder_matrix(event_type)))
    }

    pub fn recording_depths(&self, event_type: EventType) -> &[usize] {
        self.memo.recording_depths[event_type.index()]
            .get_or_init(|| filters::recording_depths(self.recorder_matrix(event_type)))
    }

    /// Events over recording depth, per year.
    pub fn percent_of_recording_scarred(&self, event_type: EventType) -> Vec<Option<f64>> {
        percent_per_year(
            &self.filter_array(event_type).event_counts(),
            self.recording_depths(event_type),
        )
    }

    /// Events over sample depth, per year.
    pub fn percent_of_all_scarred(&self, event_type: EventType) -> Vec<Option<f64>> {
        percent_per_year(
            &self.filter_array(event_type).event_counts(),
            self.sample_depths(event_type),
        )
    }

    /// Scar letters counted by case and season.
    pub fn seasonal_tally(&self) -> &SeasonalTally {
        self.memo.seasons.get_or_init(|| season::tally(&self.raw))
    }

    // ---- composites ----

    pub fn composite_years(
        &self,
        event_type: EventType,
        filter_type: FilterType,
        threshold: f64,
        min_depth: usize,
    ) -> Vec<i32> {
        self.composite(&CompositeFilter::new(event_type, filter_type, threshold, min_depth))
    }

    /// Like [`composite_years`](Self::composite_years) with the filter type
    /// given by name; unknown names fail with `UnsupportedFilterType`.
    pub fn composite_years_named(
        &self,
        event_type: EventType,
        filter_type: &str,
        threshold: f64,
        min_depth: usize,
    ) -> Result<Vec<i32>> {
        let filter_type = filter_type.parse::<FilterType>()?;
        Ok(self.composite_years(event_type, filter_type, threshold, min_depth))
    }

    pub fn composite(&self, filter: &CompositeFilter) -> Vec<i32> {
        let event_type = filter.event_type;
        let inputs = CompositeInputs {
            first_year: self.first_year(),
            filters: self.filter_array(event_type),
            sample_depths: self.sample_depths(event_type),
            recording_depths: self.recording_depths(event_type),
        };
        let years = select_composite_years(&inputs, filter);
        log::debug!(
            "{} composite ({}, threshold {}, min depth {}): {} years",
            event_type,
            filter.filter_type,
            filter.threshold,
            filter.min_samples,
            years.len()
        );
        years
    }

    // ---- series ----

    pub fn series(&self) -> &[FhSeries] {
        self.memo.series.get_or_init(|| {
            series::assemble(&SeriesSources {
                raw: &self.raw,
                ranges: self.sample_ranges(),
                fire_recorders: self.recorder_analysis(EventType::Fire),
                fire_events: self.event_analysis(EventType::Fire),
                injury_events: self.event_analysis(EventType::Injury),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str = "FHX2 FORMAT\n1850 2 3\nAB\nAB\nAB\n\nU. 1850\n|a 1851\n.{ 1852\n";

    #[test]
    fn test_scenario_a_accessors() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        assert_eq!(doc.first_year(), 1850);
        assert_eq!(doc.last_year(), 1852);
        assert_eq!(doc.years().len(), doc.year_count());
        assert_eq!(doc.event_matrix(EventType::Fire).get(0, 0), Some(EventState::Event));
        assert_eq!(doc.first_fire_year(), Some(1850));
        assert_eq!(doc.first_injury_year(), Some(1851));
        assert_eq!(doc.first_indicator_year(), Some(1850));
        assert!(doc.has_fire_events());
        assert!(doc.name().is_none());
    }

    #[test]
    fn test_matrices_are_memoized() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        let first = doc.recorder_matrix(EventType::Fire) as *const _;
        let second = doc.recorder_matrix(EventType::Fire) as *const _;
        assert_eq!(first, second);
        assert!(std::ptr::eq(doc.series(), doc.series()));
    }

    #[test]
    fn test_variants_do_not_share_slots() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        let fire = doc.filter_array(EventType::Fire).event_counts();
        let injury = doc.filter_array(EventType::Injury).event_counts();
        assert_eq!(fire, vec![1, 0, 0]);
        assert_eq!(injury, vec![0, 1, 0]);
    }

    #[test]
    fn test_concurrent_first_access() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        let results: Vec<Vec<usize>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| doc.recording_depths(EventType::Fire).to_vec()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_warnings_include_range_warnings() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        // Sample 0 has a single fire year; sample 1 has an injury then pith.
        assert!(doc
            .warnings()
            .iter()
            .any(|w| matches!(w, Warning::EmptySampleRange { sample: 0, .. })));
    }

    #[test]
    fn test_seasonal_tally_is_memoized() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        let tally = doc.seasonal_tally();
        assert!(std::ptr::eq(tally, doc.seasonal_tally()));
        assert_eq!(tally.totals.fire, 1);
        assert_eq!(tally.totals.injury, 1);
        assert_eq!(tally.totals.markers, 1);
        assert_eq!(tally.fire_per_year[0].get(crate::matrix::Season::Undetermined), 1);
        assert_eq!(tally.injury_per_year[1].get(crate::matrix::Season::Latewood), 1);
    }

    #[test]
    fn test_composite_named_rejects_unknown() {
        let doc = FireHistoryDocument::from_text(SCENARIO_A).unwrap();
        assert!(doc
            .composite_years_named(EventType::Fire, "loudest", 1.0, 1)
            .is_err());
        assert_eq!(
            doc.composite_years_named(EventType::Fire, "Number of fires", 1.0, 1)
                .unwrap(),
            vec![1850]
        );
    }
}
