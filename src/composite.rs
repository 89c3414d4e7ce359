//! Composite event-year selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CompositeFilter;
use crate::error::Error;
use crate::matrix::filters::percent;
use crate::matrix::FilterArray;

/// What the composite threshold is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Absolute number of samples with an event.
    #[default]
    NumberOfEvents,
    /// Percent of contributing samples with an event.
    PercentageOfEvents,
    /// Percent of recording samples with an event.
    PercentageOfRecording,
}

impl FilterType {
    pub const ALL: [FilterType; 3] = [
        FilterType::NumberOfEvents,
        FilterType::PercentageOfEvents,
        FilterType::PercentageOfRecording,
    ];

    pub fn human_name(self) -> &'static str {
        match self {
            FilterType::NumberOfEvents => "Number of fires",
            FilterType::PercentageOfEvents => "Percent scarred",
            FilterType::PercentageOfRecording => "Percent of recording",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_name())
    }
}

impl FromStr for FilterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if let Some(found) = FilterType::ALL
            .into_iter()
            .find(|t| t.human_name().eq_ignore_ascii_case(value))
        {
            return Ok(found);
        }
        match normalize(value).as_str() {
            "number_of_events" | "number_of_fires" | "events" => Ok(FilterType::NumberOfEvents),
            "percentage_of_events" | "percent_scarred" => Ok(FilterType::PercentageOfEvents),
            "percentage_of_recording" | "percent_of_recording" => {
                Ok(FilterType::PercentageOfRecording)
            }
            _ => Err(Error::UnsupportedFilterType(s.to_string())),
        }
    }
}

/// Which per-year depth the minimum-sample rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleDepthFilterType {
    /// Samples within their range, recording or not.
    MinNumSamples,
    /// Samples in recording status.
    MinNumRecorderSamples,
}

impl SampleDepthFilterType {
    pub fn human_name(self) -> &'static str {
        match self {
            SampleDepthFilterType::MinNumSamples => "Minimum number of samples",
            SampleDepthFilterType::MinNumRecorderSamples => "Minimum number of recorder samples",
        }
    }
}

impl fmt::Display for SampleDepthFilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_name())
    }
}

impl FromStr for SampleDepthFilterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        for depth_type in [
            SampleDepthFilterType::MinNumSamples,
            SampleDepthFilterType::MinNumRecorderSamples,
        ] {
            if depth_type.human_name().eq_ignore_ascii_case(value) {
                return Ok(depth_type);
            }
        }
        match normalize(value).as_str() {
            "min_num_samples" | "samples" => Ok(SampleDepthFilterType::MinNumSamples),
            "min_num_recorder_samples" | "recorders" | "recorder_samples" => {
                Ok(SampleDepthFilterType::MinNumRecorderSamples)
            }
            _ => Err(Error::UnsupportedDepthFilterType(s.to_string())),
        }
    }
}

fn normalize(value: &str) -> String {
    value
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' { '_' } else { c })
        .collect()
}

/// Per-year statistics of one variant that composite selection reads.
#[derive(Debug, Clone, Copy)]
pub struct CompositeInputs<'a> {
    pub first_year: i32,
    pub filters: &'a FilterArray,
    pub sample_depths: &'a [usize],
    pub recording_depths: &'a [usize],
}

impl CompositeInputs<'_> {
    fn depth(&self, year: usize, filter: &CompositeFilter) -> usize {
        let pick = |depths: &[usize]| depths.get(year).copied().unwrap_or(0);
        match filter.depth_type {
            Some(SampleDepthFilterType::MinNumSamples) => pick(self.sample_depths),
            Some(SampleDepthFilterType::MinNumRecorderSamples) => pick(self.recording_depths),
            None if filter.filter_type == FilterType::PercentageOfRecording => {
                pick(self.recording_depths)
            }
            None => self
                .filters
                .get(year)
                .map_or(0, |row| row.contributing),
        }
    }

    fn value(&self, year: usize, filter_type: FilterType) -> Option<f64> {
        let row = self.filters.get(year)?;
        match filter_type {
            FilterType::NumberOfEvents => Some(row.event_count as f64),
            FilterType::PercentageOfEvents => row.percent_scarred,
            FilterType::PercentageOfRecording => percent(
                row.event_count,
                self.recording_depths.get(year).copied().unwrap_or(0),
            ),
        }
    }
}

/// Ascending calendar years that pass both the depth and the threshold test.
///
/// An undefined percentage never qualifies.
pub fn select_composite_years(inputs: &CompositeInputs<'_>, filter: &CompositeFilter) -> Vec<i32> {
    debug_assert_eq!(inputs.filters.event_type, filter.event_type);
    (0..inputs.filters.len())
        .filter(|year| {
            let depth = inputs.depth(*year, filter);
            if depth < filter.min_samples {
                log::trace!(
                    "{} below minimum depth: {depth} < {}",
                    inputs.first_year + *year as i32,
                    filter.min_samples
                );
            }
            depth >= filter.min_samples
        })
        .filter(|year| {
            inputs
                .value(*year, filter.filter_type)
                .map_or(false, |value| value >= filter.threshold)
        })
        .map(|year| inputs.first_year + year as i32)
        .collect()
}
