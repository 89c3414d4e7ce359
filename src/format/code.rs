//! Single-cell year codes of the FHX alphabet.

use serde::Serialize;

/// One (sample, year) cell of the data block.
///
/// Letters carry their raw character since the letter position encodes the
/// season of the scar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum YearCode {
    /// `A`..=`Z`.
    Fire(char),
    /// `a`..=`z`.
    Injury(char),
    /// `.`
    NotRecording,
    /// `|`
    Recording,
    /// `[` innermost ring, no pith.
    InnerRing,
    /// `{`
    Pith,
    /// `]` outermost ring, no bark.
    OuterRing,
    /// `}`
    Bark,
    /// Anything else. Kept so it can be reported, never treated as data.
    Invalid(char),
}

impl YearCode {
    pub fn from_char(c: char) -> Self {
        match c {
            'A'..='Z' => YearCode::Fire(c),
            'a'..='z' => YearCode::Injury(c),
            '.' => YearCode::NotRecording,
            '|' => YearCode::Recording,
            '[' => YearCode::InnerRing,
            '{' => YearCode::Pith,
            ']' => YearCode::OuterRing,
            '}' => YearCode::Bark,
            other => YearCode::Invalid(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            YearCode::Fire(c) | YearCode::Injury(c) | YearCode::Invalid(c) => c,
            YearCode::NotRecording => '.',
            YearCode::Recording => '|',
            YearCode::InnerRing => '[',
            YearCode::Pith => '{',
            YearCode::OuterRing => ']',
            YearCode::Bark => '}',
        }
    }

    pub fn is_letter(self) -> bool {
        matches!(self, YearCode::Fire(_) | YearCode::Injury(_))
    }

    pub fn is_valid(self) -> bool {
        !matches!(self, YearCode::Invalid(_))
    }

    /// `{` or `[`: the sample's first ring.
    pub fn is_start_marker(self) -> bool {
        matches!(self, YearCode::Pith | YearCode::InnerRing)
    }

    /// `}` or `]`: the sample's last ring.
    pub fn is_end_marker(self) -> bool {
        matches!(self, YearCode::Bark | YearCode::OuterRing)
    }
}

impl From<char> for YearCode {
    fn from(value: char) -> Self {
        YearCode::from_char(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alphabet_char_round_trips() {
        for c in ('A'..='Z').chain('a'..='z').chain(".|[]{}".chars()) {
            let code = YearCode::from_char(c);
            assert!(code.is_valid(), "{c} should be valid");
            assert_eq!(code.as_char(), c);
        }
    }

    #[test]
    fn unknown_chars_are_invalid() {
        for c in [' ', '0', '-', '*', 'é', '\t'] {
            assert_eq!(YearCode::from_char(c), YearCode::Invalid(c));
        }
    }

    #[test]
    fn marker_groups() {
        assert!(YearCode::Pith.is_start_marker());
        assert!(YearCode::InnerRing.is_start_marker());
        assert!(YearCode::Bark.is_end_marker());
        assert!(YearCode::OuterRing.is_end_marker());
        assert!(!YearCode::Recording.is_start_marker());
        assert!(YearCode::Fire('U').is_letter());
        assert!(!YearCode::NotRecording.is_letter());
    }
}
