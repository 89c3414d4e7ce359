//! Finalized per-sample series.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::{EventAnalysis, RecorderAnalysis, SampleRange};
use crate::reader::RawFile;

/// One category classification (e.g. genus, species) for a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub series_title: String,
    pub category: String,
    pub content: String,
}

impl CategoryEntry {
    pub fn new(
        series_title: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            series_title: series_title.into(),
            category: category.into(),
            content: content.into(),
        }
    }
}

/// A sample trimmed to its range, with boolean year arrays aligned to
/// `first_year..=last_year()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FhSeries {
    title: String,
    first_year: i32,
    has_pith: bool,
    has_bark: bool,
    recording_years: Vec<bool>,
    event_years: Vec<bool>,
    injury_years: Vec<bool>,
    category_entries: Vec<CategoryEntry>,
}

impl FhSeries {
    /// Fails with [`Error::SeriesLengthMismatch`] unless all three arrays
    /// have the same length.
    pub fn new(
        title: impl Into<String>,
        first_year: i32,
        has_pith: bool,
        has_bark: bool,
        recording_years: Vec<bool>,
        event_years: Vec<bool>,
        injury_years: Vec<bool>,
    ) -> Result<Self> {
        let title = title.into();
        if recording_years.len() != event_years.len() || recording_years.len() != injury_years.len()
        {
            return Err(Error::SeriesLengthMismatch {
                title,
                recording: recording_years.len(),
                event: event_years.len(),
                injury: injury_years.len(),
            });
        }
        Ok(Self {
            title,
            first_year,
            has_pith,
            has_bark,
            recording_years,
            event_years,
            injury_years,
            category_entries: Vec::new(),
        })
    }

    pub fn with_category_entries(mut self, entries: impl IntoIterator<Item = CategoryEntry>) -> Self {
        self.category_entries.extend(entries);
        self
    }

    /// Untrimmed title as read from the name block.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + self.length() as i32 - 1
    }

    pub fn length(&self) -> usize {
        self.recording_years.len()
    }

    pub fn has_pith(&self) -> bool {
        self.has_pith
    }

    pub fn has_bark(&self) -> bool {
        self.has_bark
    }

    pub fn recording_years(&self) -> &[bool] {
        &self.recording_years
    }

    pub fn event_years(&self) -> &[bool] {
        &self.event_years
    }

    pub fn injury_years(&self) -> &[bool] {
        &self.injury_years
    }

    pub fn category_entries(&self) -> &[CategoryEntry] {
        &self.category_entries
    }
}

/// Matrices the assembler reads from.
pub struct SeriesSources<'a> {
    pub raw: &'a RawFile,
    pub ranges: &'a [SampleRange],
    pub fire_recorders: &'a RecorderAnalysis,
    pub fire_events: &'a EventAnalysis,
    pub injury_events: &'a EventAnalysis,
}

/// Build one series per sample with a usable range. Samples whose arrays
/// cannot be built are logged and left out.
pub fn assemble(sources: &SeriesSources<'_>) -> Vec<FhSeries> {
    let names = sources.raw.series_names();
    let mut series = Vec::with_capacity(sources.ranges.len());

    for (sample, range) in sources.ranges.iter().enumerate() {
        if !range.is_usable() {
            continue;
        }
        let Some((start, last)) = range.bounds() else {
            continue;
        };
        let title = names.get(sample).cloned().unwrap_or_default();
        if range.markers.pith.is_none() && range.markers.inner_ring.is_none() {
            log::debug!("sample {sample} ({}) has neither pith nor inner ring", title.trim());
        }
        if range.markers.bark.is_none() && range.markers.outer_ring.is_none() {
            log::debug!("sample {sample} ({}) has neither bark nor outer ring", title.trim());
        }

        let recording = window(sources.fire_recorders.matrix.sample(sample), start, last, |s| {
            s.is_recording()
        });
        let events = window(sources.fire_events.matrix.sample(sample), start, last, |s| s.is_event());
        let injuries = window(sources.injury_events.matrix.sample(sample), start, last, |s| s.is_event());

        let (Some(recording), Some(events), Some(injuries)) = (recording, events, injuries) else {
            log::error!(
                "failed to build series for sample {sample} ({}): range {start}..={last} outside data",
                title.trim()
            );
            continue;
        };

        match FhSeries::new(
            title,
            sources.raw.year_at(start),
            range.has_pith(),
            range.has_bark(),
            recording,
            events,
            injuries,
        ) {
            Ok(built) => series.push(built),
            Err(e) => log::error!("failed to build series for sample {sample}: {e}"),
        }
    }

    series
}

/// `row[start..=last]` mapped to booleans; `None` when the window is outside the row.
fn window<T: Copy>(
    row: Option<&[T]>,
    start: usize,
    last: usize,
    flag: impl Fn(T) -> bool,
) -> Option<Vec<bool>> {
    Some(row?.get(start..=last)?.iter().map(|cell| flag(*cell)).collect())
}
