use std::fmt;
use std::ops::{Index, IndexMut};

use serde::Serialize;

// ---------------------------------------------------------------------------
// State – the closed set of Legal Amazon states reported by PRODES
// ---------------------------------------------------------------------------

/// One of the nine states with a per-state column in the PRODES table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Acre,
    Amazonas,
    Amapa,
    Maranhao,
    MatoGrosso,
    Para,
    Rondonia,
    Roraima,
    Tocantins,
}

impl State {
    /// All states, in the column order of the source table.
    pub const ALL: [State; 9] = [
        State::Acre,
        State::Amazonas,
        State::Amapa,
        State::Maranhao,
        State::MatoGrosso,
        State::Para,
        State::Rondonia,
        State::Roraima,
        State::Tocantins,
    ];

    /// Exact (case-sensitive) column name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            State::Acre => "acre",
            State::Amazonas => "amazonas",
            State::Amapa => "amapa",
            State::Maranhao => "maranhao",
            State::MatoGrosso => "mato_grosso",
            State::Para => "para",
            State::Rondonia => "rondonia",
            State::Roraima => "roraima",
            State::Tocantins => "tocantins",
        }
    }

    /// Human-readable name, for legends and tooltips.
    pub fn display_name(self) -> &'static str {
        match self {
            State::Acre => "Acre",
            State::Amazonas => "Amazonas",
            State::Amapa => "Amapá",
            State::Maranhao => "Maranhão",
            State::MatoGrosso => "Mato Grosso",
            State::Para => "Pará",
            State::Rondonia => "Rondônia",
            State::Roraima => "Roraima",
            State::Tocantins => "Tocantins",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// StateAreas – one value per state, fixed shape
// ---------------------------------------------------------------------------

/// Deforested area (km²) for each of the nine states.
///
/// A plain struct rather than a map: a missing or extra state is a type
/// error, not a runtime lookup miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StateAreas {
    pub acre: f64,
    pub amazonas: f64,
    pub amapa: f64,
    pub maranhao: f64,
    pub mato_grosso: f64,
    pub para: f64,
    pub rondonia: f64,
    pub roraima: f64,
    pub tocantins: f64,
}

impl StateAreas {
    /// Iterate `(state, area)` pairs in [`State::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (State, f64)> + '_ {
        State::ALL.into_iter().map(move |s| (s, self[s]))
    }
}

impl Index<State> for StateAreas {
    type Output = f64;

    fn index(&self, state: State) -> &f64 {
        match state {
            State::Acre => &self.acre,
            State::Amazonas => &self.amazonas,
            State::Amapa => &self.amapa,
            State::Maranhao => &self.maranhao,
            State::MatoGrosso => &self.mato_grosso,
            State::Para => &self.para,
            State::Rondonia => &self.rondonia,
            State::Roraima => &self.roraima,
            State::Tocantins => &self.tocantins,
        }
    }
}

impl IndexMut<State> for StateAreas {
    fn index_mut(&mut self, state: State) -> &mut f64 {
        match state {
            State::Acre => &mut self.acre,
            State::Amazonas => &mut self.amazonas,
            State::Amapa => &mut self.amapa,
            State::Maranhao => &mut self.maranhao,
            State::MatoGrosso => &mut self.mato_grosso,
            State::Para => &mut self.para,
            State::Rondonia => &mut self.rondonia,
            State::Roraima => &mut self.roraima,
            State::Tocantins => &mut self.tocantins,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// One year's figures: the total plus the per-state breakdown.
///
/// Serialises with the source column names so an exported table reads
/// like the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "referencia")]
    pub year: i32,
    #[serde(rename = "area_total_desmatamento")]
    pub total_deforested_area: f64,
    #[serde(flatten)]
    pub states: StateAreas,
}

// ---------------------------------------------------------------------------
// YearRange – inclusive year interval
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` year interval. `start > end` is allowed and
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        YearRange { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    /// Whether no year can satisfy the range.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Clamp a year into this range. Only meaningful when not inverted.
    pub fn clamp(&self, year: i32) -> i32 {
        year.max(self.start).min(self.end)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records from one input file, in file order. Duplicate years are
/// kept as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed `[min_year, max_year]`, or `None` for an empty dataset.
    pub fn year_range(&self) -> Option<YearRange> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some(YearRange::new(min, max))
    }
}
