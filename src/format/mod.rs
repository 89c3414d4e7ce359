//! FHX alphabet and file-format tags.

mod alphabet;
mod code;

use std::fmt;

use serde::Serialize;

pub use alphabet::{EventAlphabet, EventType, LetterSet};
pub use code::YearCode;

/// Format tag taken from the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    Fhx2,
    Fire2,
}

impl FileFormat {
    /// Match a header line, case-insensitively, by its prefix.
    pub fn detect(line: &str) -> Option<Self> {
        let lower = line.trim_start().to_ascii_lowercase();
        if lower.starts_with("fhx2 format") {
            Some(FileFormat::Fhx2)
        } else if lower.starts_with("fire2 format") {
            Some(FileFormat::Fire2)
        } else {
            None
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Fhx2 => f.write_str("FHX2"),
            FileFormat::Fire2 => f.write_str("FIRE2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_is_case_insensitive() {
        assert_eq!(FileFormat::detect("FHX2 FORMAT"), Some(FileFormat::Fhx2));
        assert_eq!(FileFormat::detect("fhx2 format  "), Some(FileFormat::Fhx2));
        assert_eq!(FileFormat::detect("Fire2 Format"), Some(FileFormat::Fire2));
        assert_eq!(FileFormat::detect("Name of site : Foo"), None);
    }
}
