//! Seasonal tallies of scar letters.
//!
//! The letter of a fire or injury code records where in the ring the scar
//! sits. These counters feed seasonality summaries.

use std::fmt;

use serde::Serialize;

use crate::format::YearCode;
use crate::reader::RawFile;

/// Intra-ring position of a scar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    /// `D`: between rings.
    Dormant,
    /// `E`
    EarlyEarlywood,
    /// `M`
    MiddleEarlywood,
    /// `L`
    LateEarlywood,
    /// `A`
    Latewood,
    /// `U`: position could not be determined.
    Undetermined,
}

impl Season {
    pub const ALL: [Season; 6] = [
        Season::Dormant,
        Season::EarlyEarlywood,
        Season::MiddleEarlywood,
        Season::LateEarlywood,
        Season::Latewood,
        Season::Undetermined,
    ];

    /// Season of a scar letter of either case. Other letters have none.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(Season::Dormant),
            'E' => Some(Season::EarlyEarlywood),
            'M' => Some(Season::MiddleEarlywood),
            'L' => Some(Season::LateEarlywood),
            'A' => Some(Season::Latewood),
            'U' => Some(Season::Undetermined),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Season::Dormant => 0,
            Season::EarlyEarlywood => 1,
            Season::MiddleEarlywood => 2,
            Season::LateEarlywood => 3,
            Season::Latewood => 4,
            Season::Undetermined => 5,
        }
    }

    /// Uppercase code letter.
    pub fn letter(self) -> char {
        match self {
            Season::Dormant => 'D',
            Season::EarlyEarlywood => 'E',
            Season::MiddleEarlywood => 'M',
            Season::LateEarlywood => 'L',
            Season::Latewood => 'A',
            Season::Undetermined => 'U',
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Dormant => "dormant",
            Season::EarlyEarlywood => "early earlywood",
            Season::MiddleEarlywood => "middle earlywood",
            Season::LateEarlywood => "late earlywood",
            Season::Latewood => "latewood",
            Season::Undetermined => "undetermined",
        };
        f.write_str(name)
    }
}

/// Scar count per [`Season`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeasonCounts([usize; 6]);

impl SeasonCounts {
    pub fn get(&self, season: Season) -> usize {
        self.0[season.index()]
    }

    pub fn record(&mut self, season: Season) {
        self.0[season.index()] += 1;
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    fn add(&mut self, other: &SeasonCounts) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            *mine += theirs;
        }
    }
}

/// Whole-file counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonTotals {
    /// Uppercase letters, seasonal or not.
    pub fire: usize,
    /// Lowercase letters, seasonal or not.
    pub injury: usize,
    pub fire_seasons: SeasonCounts,
    pub injury_seasons: SeasonCounts,
    /// `[`, `]`, `{` and `}` cells.
    pub markers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonalTally {
    pub totals: SeasonTotals,
    /// Fire-scar seasons found in each year.
    pub fire_per_year: Vec<SeasonCounts>,
    /// Injury seasons found in each year.
    pub injury_per_year: Vec<SeasonCounts>,
}

impl SeasonalTally {
    /// Fire-scar seasons summed from the first year through each year.
    pub fn running_fire_totals(&self) -> Vec<SeasonCounts> {
        let mut running = SeasonCounts::default();
        self.fire_per_year
            .iter()
            .map(|counts| {
                running.add(counts);
                running
            })
            .collect()
    }

    /// Share of seasonally coded fire scars falling in `season`, ×100.
    /// `None` when no fire scar has a season letter.
    pub fn fire_season_percent(&self, season: Season) -> Option<f64> {
        let total = self.totals.fire_seasons.total();
        (total > 0).then(|| 100.0 * self.totals.fire_seasons.get(season) as f64 / total as f64)
    }
}

pub fn tally(raw: &RawFile) -> SeasonalTally {
    let year_count = raw.year_count();
    let mut tally = SeasonalTally {
        totals: SeasonTotals::default(),
        fire_per_year: vec![SeasonCounts::default(); year_count],
        injury_per_year: vec![SeasonCounts::default(); year_count],
    };

    for column in raw.columns() {
        for (idx, code) in column.iter().enumerate() {
            match *code {
                YearCode::Fire(c) => {
                    tally.totals.fire += 1;
                    if let Some(season) = Season::from_letter(c) {
                        tally.totals.fire_seasons.record(season);
                        tally.fire_per_year[idx].record(season);
                    }
                }
                YearCode::Injury(c) => {
                    tally.totals.injury += 1;
                    if let Some(season) = Season::from_letter(c) {
                        tally.totals.injury_seasons.record(season);
                        tally.injury_per_year[idx].record(season);
                    }
                }
                code if code.is_start_marker() || code.is_end_marker() => {
                    tally.totals.markers += 1;
                }
                _ => {}
            }
        }
    }

    log::debug!(
        "season tally: {} fire, {} injury, {} markers",
        tally.totals.fire,
        tally.totals.injury,
        tally.totals.markers
    );
    tally
}
