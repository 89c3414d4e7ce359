//! FHX file loading.
//!
//! Decodes the bytes, finds the `FHX2 FORMAT` header, reads the dimension
//! line and the transposed name block, then takes every following non-empty
//! line as one year of fixed-width data. Row-level problems are recorded as
//! warnings and never abort the load; only a missing or unparsable header
//! does.

pub mod charset;
pub mod header;
mod rows;

use std::path::{Path, PathBuf};

use crate::config::ReaderConfig;
use crate::error::{Error, Result, Warning};
use crate::format::{FileFormat, YearCode};

pub use header::Dimensions;
use rows::{classify_row, RowOutcome};

/// The decoded, validated character grid of one FHX file.
#[derive(Debug, Clone)]
pub struct RawFile {
    source: Option<PathBuf>,
    encoding: &'static str,
    contents: String,
    format: FileFormat,
    dimensions: Dimensions,
    name_lines: Vec<String>,
    series_names: Vec<String>,
    rows: Vec<String>,
    /// Sample-major: `grid[sample][year_index]`.
    grid: Vec<Vec<YearCode>>,
    bad_lines: Vec<usize>,
    warnings: Vec<Warning>,
    well_formed_header: bool,
}

pub fn load_path(path: &Path, config: &ReaderConfig) -> Result<RawFile> {
    let bytes = std::fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut raw = load_bytes(&bytes, config)?;
    raw.source = Some(path.to_path_buf());
    Ok(raw)
}

pub fn load_bytes(bytes: &[u8], config: &ReaderConfig) -> Result<RawFile> {
    let decoded = charset::decode(bytes, &config.charset)?;
    if decoded.had_errors {
        log::warn!(
            "malformed byte sequences replaced while decoding as {}",
            decoded.encoding
        );
    }
    let mut raw = parse_text(&decoded.text)?;
    raw.encoding = decoded.encoding;
    raw.contents = decoded.text;
    Ok(raw)
}

/// Parse already-decoded text.
pub fn parse_text(text: &str) -> Result<RawFile> {
    let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    let format = lines
        .by_ref()
        .find_map(|(_, line)| FileFormat::detect(line))
        .ok_or(Error::MissingHeader)?;

    let (_, dims_line) = lines
        .next()
        .ok_or_else(|| Error::MalformedHeader("file ends after format line".to_string()))?;
    let dimensions = header::parse_dimensions(dims_line)?;
    dimensions.check_fits(text.len())?;
    let sample_count = dimensions.sample_count;

    let mut name_lines = Vec::new();
    let mut well_formed_header = false;
    for i in 0..=dimensions.name_length {
        let (_, line) = lines.next().ok_or_else(|| {
            Error::MalformedHeader(format!(
                "file ends inside series name block ({i} of {} lines)",
                dimensions.name_length + 1
            ))
        })?;
        if i < dimensions.name_length {
            name_lines.push(header::pad_name_line(line, sample_count));
        } else if line.trim().is_empty() {
            well_formed_header = true;
        }
    }
    if !well_formed_header {
        log::debug!("no blank line after series names");
    }

    let mut rows = Vec::new();
    let mut bad_lines = Vec::new();
    let mut warnings = Vec::new();
    for (line_number, line) in lines {
        let index = rows.len();
        match classify_row(line, sample_count) {
            RowOutcome::Accepted(cells) => rows.push(cells),
            RowOutcome::Flagged(cells, reason) => {
                log::warn!("bad data line {line_number}: {reason:?}");
                bad_lines.push(index);
                warnings.push(Warning::BadDataLine {
                    index,
                    line_number,
                    reason,
                });
                rows.push(cells);
            }
            RowOutcome::Skipped => log::debug!("Skipping empty line {line_number}"),
        }
    }

    let grid = build_grid(&rows, sample_count);
    for (sample, column) in grid.iter().enumerate() {
        for (idx, code) in column.iter().enumerate() {
            if let YearCode::Invalid(c) = code {
                warnings.push(Warning::InvalidYearCode {
                    sample,
                    year: dimensions.first_year + idx as i32,
                    code: *c,
                });
            }
        }
    }

    let series_names = header::series_names(&name_lines, sample_count);

    Ok(RawFile {
        source: None,
        encoding: "UTF-8",
        contents: text.to_string(),
        format,
        dimensions,
        name_lines,
        series_names,
        rows,
        grid,
        bad_lines,
        warnings,
        well_formed_header,
    })
}

fn build_grid(rows: &[String], sample_count: usize) -> Vec<Vec<YearCode>> {
    let mut grid = vec![Vec::with_capacity(rows.len()); sample_count];
    for row in rows {
        for (column, c) in grid.iter_mut().zip(row.chars()) {
            column.push(YearCode::from_char(c));
        }
    }
    grid
}

impl RawFile {
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn encoding(&self) -> &'static str {
        self.encoding
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn first_year(&self) -> i32 {
        self.dimensions.first_year
    }

    /// `first_year + row_count - 1`; one less than `first_year` when there are no rows.
    pub fn last_year(&self) -> i32 {
        self.dimensions.first_year + self.rows.len() as i32 - 1
    }

    pub fn sample_count(&self) -> usize {
        self.dimensions.sample_count
    }

    pub fn name_length(&self) -> usize {
        self.dimensions.name_length
    }

    pub fn year_count(&self) -> usize {
        self.rows.len()
    }

    pub fn years(&self) -> Vec<i32> {
        (0..self.rows.len() as i32)
            .map(|idx| self.dimensions.first_year + idx)
            .collect()
    }

    pub fn year_at(&self, index: usize) -> i32 {
        self.dimensions.first_year + index as i32
    }

    /// Row index of a calendar year, if it is in the file.
    pub fn index_of_year(&self, year: i32) -> Option<usize> {
        let offset = year.checked_sub(self.dimensions.first_year)?;
        usize::try_from(offset)
            .ok()
            .filter(|idx| *idx < self.rows.len())
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn name_lines(&self) -> &[String] {
        &self.name_lines
    }

    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    pub fn column(&self, sample: usize) -> Option<&[YearCode]> {
        self.grid.get(sample).map(Vec::as_slice)
    }

    pub fn columns(&self) -> impl Iterator<Item = &[YearCode]> {
        self.grid.iter().map(Vec::as_slice)
    }

    pub fn code(&self, sample: usize, year_index: usize) -> Option<YearCode> {
        self.grid.get(sample)?.get(year_index).copied()
    }

    pub fn bad_lines(&self) -> &[usize] {
        &self.bad_lines
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_well_formed_header(&self) -> bool {
        self.well_formed_header
    }

    /// Blank line after the name block and no bad data rows.
    pub fn passes_basic_syntax_check(&self) -> bool {
        self.well_formed_header && self.bad_lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str = "FHX2 FORMAT\n1850 2 3\nAB\nAB\nAB\n\nU. 1850\n|a 1851\n.{ 1852\n";

    #[test]
    fn parses_scenario_a() {
        let raw = parse_text(SCENARIO_A).unwrap();
        assert_eq!(raw.format(), FileFormat::Fhx2);
        assert_eq!(raw.first_year(), 1850);
        assert_eq!(raw.last_year(), 1852);
        assert_eq!(raw.years(), vec![1850, 1851, 1852]);
        assert_eq!(raw.series_names(), &["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(raw.code(0, 0), Some(YearCode::Fire('U')));
        assert_eq!(raw.code(1, 1), Some(YearCode::Injury('a')));
        assert_eq!(raw.code(1, 2), Some(YearCode::Pith));
        assert!(raw.passes_basic_syntax_check());
        assert!(raw.warnings().is_empty());
    }

    #[test]
    fn preamble_before_header_is_ignored() {
        let text = format!("Name of site   : Foo Ridge\nSite code      : FOO\n{SCENARIO_A}");
        let raw = parse_text(&text).unwrap();
        assert_eq!(raw.year_count(), 3);
    }

    #[test]
    fn missing_header_is_fatal() {
        assert!(matches!(parse_text("1850 2 3\n||\n"), Err(Error::MissingHeader)));
    }

    #[test]
    fn unparsable_dimensions_are_fatal() {
        let err = parse_text("FHX2 FORMAT\n1850 x 3\n").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn truncated_name_block_is_fatal() {
        let err = parse_text("FIRE2 FORMAT\n1850 2 3\nAB\n").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn missing_blank_line_fails_syntax_check_only() {
        let raw = parse_text("FHX2 FORMAT\n1900 1 1\nA\nX\n|\n|\n").unwrap();
        assert!(!raw.has_well_formed_header());
        assert!(!raw.passes_basic_syntax_check());
        assert_eq!(raw.year_count(), 2);
    }

    #[test]
    fn short_row_is_flagged_and_kept() {
        let raw = parse_text("FHX2 FORMAT\n1900 3 1\nABC\n\n|||\n|\n|||\n").unwrap();
        assert_eq!(raw.year_count(), 3);
        assert_eq!(raw.bad_lines(), &[1]);
        assert!(!raw.passes_basic_syntax_check());
        assert_eq!(raw.code(1, 1), Some(YearCode::NotRecording));
        match &raw.warnings()[0] {
            Warning::BadDataLine {
                index,
                line_number,
                reason,
            } => {
                assert_eq!(*index, 1);
                assert_eq!(*line_number, 6);
                assert!(reason.is_too_short());
            }
            other => panic!("unexpected warning {other:?}"),
        }
    }

    #[test]
    fn empty_lines_do_not_produce_years() {
        let raw = parse_text("FHX2 FORMAT\n1900 1 1\nA\n\n|\n\n|\n\n").unwrap();
        assert_eq!(raw.year_count(), 2);
        assert!(raw.passes_basic_syntax_check());
    }

    #[test]
    fn whitespace_rows_keep_their_year() {
        let raw = parse_text("FHX2 FORMAT\n1900 2 1\nAB\n\n||\n  \nU|\n").unwrap();
        assert_eq!(raw.years(), vec![1900, 1901, 1902]);
        assert_eq!(raw.code(0, 2), Some(YearCode::Fire('U')));
        assert_eq!(
            raw.warnings(),
            &[
                Warning::InvalidYearCode {
                    sample: 0,
                    year: 1901,
                    code: ' '
                },
                Warning::InvalidYearCode {
                    sample: 1,
                    year: 1901,
                    code: ' '
                },
            ]
        );
    }

    #[test]
    fn short_whitespace_row_is_flagged() {
        let raw = parse_text("FHX2 FORMAT\n1900 2 1\nAB\n\n||\n \nU|\n").unwrap();
        assert_eq!(raw.year_count(), 3);
        assert_eq!(raw.bad_lines(), &[1]);
        assert!(!raw.passes_basic_syntax_check());
    }

    #[test]
    fn blank_year_suffix_is_a_bad_line() {
        let raw = parse_text("FHX2 FORMAT\n1900 2 1\nAB\n\n|| \n||\n").unwrap();
        assert_eq!(raw.year_count(), 2);
        assert_eq!(raw.bad_lines(), &[0]);
    }

    #[test]
    fn absurd_name_length_is_malformed() {
        let err = parse_text("FHX2 FORMAT\n1850 2 999999999999999\nAB\n").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
        let err = parse_text("FHX2 FORMAT\n1850 18446744073709551615 1\nAB\n").unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn invalid_codes_are_reported() {
        let raw = parse_text("FHX2 FORMAT\n1900 2 1\nAB\n\n|* 1900\n|| 1901\n").unwrap();
        assert_eq!(
            raw.warnings(),
            &[Warning::InvalidYearCode {
                sample: 1,
                year: 1900,
                code: '*'
            }]
        );
        assert!(raw.passes_basic_syntax_check());
    }

    #[test]
    fn crlf_line_endings() {
        let raw = parse_text(&SCENARIO_A.replace('\n', "\r\n")).unwrap();
        assert_eq!(raw.year_count(), 3);
        assert!(raw.passes_basic_syntax_check());
    }

    #[test]
    fn index_of_year_bounds() {
        let raw = parse_text(SCENARIO_A).unwrap();
        assert_eq!(raw.index_of_year(1850), Some(0));
        assert_eq!(raw.index_of_year(1852), Some(2));
        assert_eq!(raw.index_of_year(1849), None);
        assert_eq!(raw.index_of_year(1853), None);
    }

    #[test]
    fn load_bytes_keeps_contents_and_encoding() {
        let raw = load_bytes(SCENARIO_A.as_bytes(), &ReaderConfig::default()).unwrap();
        assert_eq!(raw.contents(), SCENARIO_A);
        assert_eq!(raw.encoding(), "UTF-8");
        assert!(raw.source().is_none());
    }
}
