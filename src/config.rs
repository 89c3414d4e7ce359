//! Reader and composite-filter configuration.
//!
//! Defaults reproduce the behaviour of the desktop tool's stock preferences.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composite::{FilterType, SampleDepthFilterType};
use crate::error::{Error, Result};
use crate::format::EventType;

/// Configuration for loading FHX files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// How the byte stream is turned into text.
    /// Default: auto-detect
    #[serde(default)]
    pub charset: CharsetPolicy,
}

impl ReaderConfig {
    pub fn forced(label: impl Into<String>) -> Self {
        Self {
            charset: CharsetPolicy::Force {
                label: label.into(),
            },
        }
    }
}

/// Charset selection for the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CharsetPolicy {
    /// Byte-order mark if present, then UTF-8 if the bytes are valid UTF-8,
    /// otherwise Windows-1252.
    #[default]
    AutoDetect,

    /// Always decode with the given WHATWG encoding label.
    Force {
        /// e.g. "utf-8", "windows-1252", "iso-8859-1"
        label: String,
    },
}

/// Parameters for composite fire-year selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeFilter {
    /// Event variant to composite.
    /// Default: fire events
    #[serde(default = "default_event_type")]
    pub event_type: EventType,

    /// What the threshold is compared against.
    /// Default: number of events
    #[serde(default)]
    pub filter_type: FilterType,

    /// Minimum event count or percentage.
    /// Default: 1
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Minimum sample depth for a year to be considered at all.
    /// Default: 1
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Which depth `min_samples` is checked against. `None` picks the
    /// recording depth for percentage-of-recording and the contributing-tree
    /// count otherwise.
    #[serde(default)]
    pub depth_type: Option<SampleDepthFilterType>,
}

fn default_event_type() -> EventType {
    EventType::Fire
}

fn default_threshold() -> f64 {
    1.0
}

fn default_min_samples() -> usize {
    1
}

impl Default for CompositeFilter {
    fn default() -> Self {
        Self {
            event_type: default_event_type(),
            filter_type: FilterType::default(),
            threshold: default_threshold(),
            min_samples: default_min_samples(),
            depth_type: None,
        }
    }
}

impl CompositeFilter {
    pub fn new(event_type: EventType, filter_type: FilterType, threshold: f64, min_samples: usize) -> Self {
        Self {
            event_type,
            filter_type,
            threshold,
            min_samples,
            depth_type: None,
        }
    }

    pub fn with_depth_type(mut self, depth_type: SampleDepthFilterType) -> Self {
        self.depth_type = Some(depth_type);
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_slice(&data)?)
    }
}
