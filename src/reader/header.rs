//! Dimension line and transposed series-name block.

use crate::error::{Error, Result};

/// `<firstYear> <sampleCount> <nameLength>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub first_year: i32,
    pub sample_count: usize,
    pub name_length: usize,
}

pub(crate) fn parse_dimensions(line: &str) -> Result<Dimensions> {
    let mut fields = line.split_whitespace();
    let first_year = parse_field(fields.next(), "first year", line)?;
    let sample_count = parse_field(fields.next(), "sample count", line)?;
    let name_length = parse_field(fields.next(), "name length", line)?;
    Ok(Dimensions {
        first_year,
        sample_count,
        name_length,
    })
}

impl Dimensions {
    /// Reject dimensions no file of `text_len` bytes could hold: every
    /// sample needs a character per row and every name line needs a line.
    pub(crate) fn check_fits(&self, text_len: usize) -> Result<()> {
        if self.sample_count > text_len {
            return Err(Error::MalformedHeader(format!(
                "sample count {} exceeds file size of {text_len} bytes",
                self.sample_count
            )));
        }
        if self.name_length > text_len {
            return Err(Error::MalformedHeader(format!(
                "name length {} exceeds file size of {text_len} bytes",
                self.name_length
            )));
        }
        Ok(())
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, what: &str, line: &str) -> Result<T> {
    let field = field.ok_or_else(|| Error::MalformedHeader(format!("missing {what} in '{line}'")))?;
    field
        .parse::<T>()
        .map_err(|_| Error::MalformedHeader(format!("invalid {what} '{field}' in '{line}'")))
}

/// First `sample_count` characters of a name line, right-padded with spaces.
pub(crate) fn pad_name_line(line: &str, sample_count: usize) -> String {
    let mut padded: String = line.chars().take(sample_count).collect();
    let have = padded.chars().count();
    padded.extend(std::iter::repeat(' ').take(sample_count - have));
    padded
}

/// Read sample `i`'s name down the stacked name lines.
///
/// Trailing spaces are kept; callers trim when they display.
pub fn series_name(name_lines: &[String], sample: usize) -> String {
    name_lines
        .iter()
        .map(|line| line.chars().nth(sample).unwrap_or(' '))
        .collect()
}

pub fn series_names(name_lines: &[String], sample_count: usize) -> Vec<String> {
    (0..sample_count)
        .map(|sample| series_name(name_lines, sample))
        .collect()
}
