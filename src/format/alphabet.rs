//! Event-type variants and the letter sets that drive them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::YearCode;
use crate::error::Error;

/// Which letters count as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Uppercase letters only.
    Fire,
    /// Lowercase letters only ("other indicators").
    Injury,
    /// Either case.
    FireOrInjury,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Fire, EventType::Injury, EventType::FireOrInjury];

    /// Slot in per-variant tables.
    pub fn index(self) -> usize {
        match self {
            EventType::Fire => 0,
            EventType::Injury => 1,
            EventType::FireOrInjury => 2,
        }
    }

    pub fn alphabet(self) -> EventAlphabet {
        match self {
            EventType::Fire => EventAlphabet::new(LetterSet::Upper, LetterSet::Lower),
            EventType::Injury => EventAlphabet::new(LetterSet::Lower, LetterSet::Upper),
            EventType::FireOrInjury => EventAlphabet::new(LetterSet::Both, LetterSet::Empty),
        }
    }

    pub fn human_name(self) -> &'static str {
        match self {
            EventType::Fire => "Fire events",
            EventType::Injury => "Other indicators",
            EventType::FireOrInjury => "Fire events and other indicators",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_name())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        for event_type in EventType::ALL {
            if event_type.human_name().eq_ignore_ascii_case(value) {
                return Ok(event_type);
            }
        }
        match value.to_ascii_lowercase().replace('-', "_").as_str() {
            "fire" => Ok(EventType::Fire),
            "injury" | "other" => Ok(EventType::Injury),
            "fire_or_injury" | "fire_and_injury" | "both" => Ok(EventType::FireOrInjury),
            _ => Err(Error::UnsupportedEventType(s.to_string())),
        }
    }
}

/// A set of letter cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterSet {
    Empty,
    Upper,
    Lower,
    Both,
}

impl LetterSet {
    pub fn contains(self, code: YearCode) -> bool {
        match (self, code) {
            (LetterSet::Upper | LetterSet::Both, YearCode::Fire(_)) => true,
            (LetterSet::Lower | LetterSet::Both, YearCode::Injury(_)) => true,
            _ => false,
        }
    }
}

/// Primary letters are the variant's events; secondary letters are events of
/// the other variant, which need neighbour context to decide recording status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventAlphabet {
    pub primary: LetterSet,
    pub secondary: LetterSet,
}

impl EventAlphabet {
    pub const fn new(primary: LetterSet, secondary: LetterSet) -> Self {
        Self { primary, secondary }
    }

    pub fn is_event(&self, code: YearCode) -> bool {
        self.primary.contains(code)
    }

    pub fn is_cross_event(&self, code: YearCode) -> bool {
        self.secondary.contains(code)
    }

    /// `|` or a primary letter.
    pub fn is_recording_evidence(&self, code: YearCode) -> bool {
        code == YearCode::Recording || self.is_event(code)
    }
}
