//! Fixed-width data rows.

use crate::error::BadLineReason;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowOutcome {
    /// Exactly `sample_count` cells.
    Accepted(String),
    /// Kept (padded or clipped to `sample_count` cells) but flagged.
    Flagged(String, BadLineReason),
    /// Zero-length line, no year is produced.
    Skipped,
}

pub(crate) fn classify_row(line: &str, sample_count: usize) -> RowOutcome {
    if line.is_empty() {
        return RowOutcome::Skipped;
    }

    let len = line.chars().count();
    if len >= sample_count {
        let split = line
            .char_indices()
            .nth(sample_count)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len());
        let (cells, suffix) = line.split_at(split);
        if suffix.is_empty() || is_year_suffix(suffix) {
            RowOutcome::Accepted(cells.to_string())
        } else {
            RowOutcome::Flagged(cells.to_string(), BadLineReason::BadYearSuffix)
        }
    } else {
        let mut cells = line.to_string();
        cells.extend(std::iter::repeat('.').take(sample_count - len));
        RowOutcome::Flagged(
            cells,
            BadLineReason::TooShort {
                len,
                expected: sample_count,
            },
        )
    }
}

/// `^[0-9 -]+$` once trimmed; a blank suffix is not a year.
fn is_year_suffix(suffix: &str) -> bool {
    let suffix = suffix.trim();
    !suffix.is_empty()
        && suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
}
