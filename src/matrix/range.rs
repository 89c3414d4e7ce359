//! Per-sample year range: pith/inner ring to bark/outer ring, falling back to
//! the span of recorded events.

use serde::Serialize;

use super::events::event_bounds;
use crate::error::Warning;
use crate::format::{EventType, YearCode};
use crate::reader::RawFile;

/// Row indices of the structural markers and event extremes of one sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SampleMarkers {
    /// First `{`.
    pub pith: Option<usize>,
    /// First `[`.
    pub inner_ring: Option<usize>,
    /// First `]`.
    pub outer_ring: Option<usize>,
    /// First `}`.
    pub bark: Option<usize>,
    pub first_fire: Option<usize>,
    pub last_fire: Option<usize>,
    pub first_injury: Option<usize>,
    pub last_injury: Option<usize>,
}

impl SampleMarkers {
    pub fn scan(column: &[YearCode]) -> Self {
        let first = |target: YearCode| column.iter().position(|code| *code == target);
        let (first_fire, last_fire) = event_bounds(column, &EventType::Fire.alphabet());
        let (first_injury, last_injury) = event_bounds(column, &EventType::Injury.alphabet());
        Self {
            pith: first(YearCode::Pith),
            inner_ring: first(YearCode::InnerRing),
            outer_ring: first(YearCode::OuterRing),
            bark: first(YearCode::Bark),
            first_fire,
            last_fire,
            first_injury,
            last_injury,
        }
    }

    /// Earliest event of either kind; fire wins a tie.
    pub fn first_event(&self) -> Option<usize> {
        match (self.first_fire, self.first_injury) {
            (Some(fire), Some(injury)) if injury < fire => Some(injury),
            (Some(fire), _) => Some(fire),
            (None, injury) => injury,
        }
    }

    pub fn last_event(&self) -> Option<usize> {
        match (self.last_fire, self.last_injury) {
            (Some(fire), Some(injury)) => Some(fire.max(injury)),
            (fire, injury) => fire.or(injury),
        }
    }
}

/// Inclusive row-index range over which a sample is analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleRange {
    pub start: Option<usize>,
    pub last: Option<usize>,
    pub markers: SampleMarkers,
}

impl SampleRange {
    pub fn resolve(column: &[YearCode]) -> Self {
        let markers = SampleMarkers::scan(column);
        let start = markers
            .pith
            .or(markers.inner_ring)
            .or_else(|| markers.first_event());
        let last = markers
            .bark
            .or(markers.outer_ring)
            .or_else(|| markers.last_event());
        Self {
            start,
            last,
            markers,
        }
    }

    /// Both ends, when they exist and are ordered.
    pub fn bounds(&self) -> Option<(usize, usize)> {
        match (self.start, self.last) {
            (Some(start), Some(last)) if start <= last => Some((start, last)),
            _ => None,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bounds()
            .map_or(false, |(start, last)| (start..=last).contains(&index))
    }

    /// Number of years covered; zero when unresolved or inverted.
    pub fn len(&self) -> usize {
        self.bounds().map_or(0, |(start, last)| last - start + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ranges of one year or less are not turned into series.
    pub fn is_usable(&self) -> bool {
        self.len() > 1
    }

    /// Pith present and no inner ring.
    pub fn has_pith(&self) -> bool {
        self.markers.pith.is_some() && self.markers.inner_ring.is_none()
    }

    /// Bark present and no outer ring.
    pub fn has_bark(&self) -> bool {
        self.markers.bark.is_some() && self.markers.outer_ring.is_none()
    }
}

/// Resolve every sample's range and collect a warning for each unusable one.
pub fn resolve_all(raw: &RawFile) -> (Vec<SampleRange>, Vec<Warning>) {
    let names = raw.series_names();
    let mut ranges = Vec::with_capacity(raw.sample_count());
    let mut warnings = Vec::new();

    for (sample, column) in raw.columns().enumerate() {
        let range = SampleRange::resolve(column);
        let title = names.get(sample).cloned().unwrap_or_default();
        if range.markers.pith.is_some() && range.markers.inner_ring.is_some() {
            log::debug!("sample {sample} ({}) has both pith and inner ring", title.trim());
        }
        if range.markers.bark.is_some() && range.markers.outer_ring.is_some() {
            log::debug!("sample {sample} ({}) has both bark and outer ring", title.trim());
        }
        if !range.is_usable() {
            log::info!(
                "sample {sample} ({}) has no usable range: start={:?} last={:?}",
                title.trim(),
                range.start,
                range.last
            );
            warnings.push(Warning::EmptySampleRange {
                sample,
                title,
                start: range.start,
                last: range.last,
            });
        }
        ranges.push(range);
    }

    (ranges, warnings)
}
