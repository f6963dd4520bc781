use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

// ===== RECORDS =====

/// One population count for an island in a given year.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PopulationRecord {
    pub year: i32,
    pub island: String,
    #[serde(rename = "pigPopulation")]
    pub pig_population: f64,
}

impl PopulationRecord {
    pub fn new(year: i32, island: impl Into<String>, pig_population: f64) -> Self {
        Self {
            year,
            island: island.into(),
            pig_population,
        }
    }
}

/// The static dataset document, records kept in source order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    #[serde(rename = "PIG POPULATIONS")]
    pub records: Vec<PopulationRecord>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Largest population in the whole dataset, used as a stable chart scale.
    pub fn max_population(&self) -> f64 {
        self.records
            .iter()
            .map(|record| record.pig_population)
            .fold(0.0, f64::max)
    }
}

// ===== INDEX FUNCTIONS =====

/// Distinct years in the order they first appear.
pub fn load_years(records: &[PopulationRecord]) -> Vec<i32> {
    records
        .iter()
        .map(|record| record.year)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// All records for `year`, in input order. Empty when the year is unknown.
pub fn records_for_year(records: &[PopulationRecord], year: i32) -> Vec<PopulationRecord> {
    records
        .iter()
        .filter(|record| record.year == year)
        .cloned()
        .collect()
}

// ===== YEAR SEQUENCE =====

/// How the cyclic year order is derived from the records.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum YearOrder {
    /// Order of first appearance in the source data.
    #[default]
    FirstSeen,
    Ascending,
}

/// Result of stepping from one year to the next in the cyclic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(i32),
    /// Stepped past the last year and wrapped to the first.
    Wrapped(i32),
    /// The current year was not in the sequence; restarted at the first year.
    Recovered(i32),
}

impl Advance {
    pub fn year(self) -> i32 {
        match self {
            Advance::Next(year) | Advance::Wrapped(year) | Advance::Recovered(year) => year,
        }
    }
}

/// Ordered distinct years that Tick cycles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSequence {
    years: Vec<i32>,
}

impl YearSequence {
    pub fn from_records(records: &[PopulationRecord], order: YearOrder) -> Self {
        let mut years = load_years(records);
        if order == YearOrder::Ascending {
            years.sort_unstable();
        }
        Self { years }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn first(&self) -> Option<i32> {
        self.years.first().copied()
    }

    /// Numeric `(min, max)` over the sequence, independent of its order.
    pub fn bounds(&self) -> Option<(i32, i32)> {
        let min = self.years.iter().min()?;
        let max = self.years.iter().max()?;
        Some((*min, *max))
    }

    /// Year following `year`. Returns `None` only for an empty sequence.
    pub fn advance(&self, year: i32) -> Option<Advance> {
        let first = self.first()?;
        let advance = match self.years.iter().position(|&candidate| candidate == year) {
            Some(index) => match self.years.get(index + 1) {
                Some(&next) => Advance::Next(next),
                None => Advance::Wrapped(first),
            },
            None => Advance::Recovered(first),
        };
        Some(advance)
    }
}
