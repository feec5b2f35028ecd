use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One line of the registry export, exactly as it appears in the CSV.
///
/// All fields are optional strings; typing and validation happen in the
/// loader so a ragged row never aborts the whole load.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "preusuel")]
    pub name: Option<String>,
    #[serde(rename = "sexe")]
    pub sex: Option<String>,
    #[serde(rename = "dpt")]
    pub department: Option<String>,
    #[serde(rename = "annais")]
    pub year: Option<String>,
    #[serde(rename = "nombre")]
    pub count: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Decode the registry's numeric sex code (`1` male, `2` female).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Sex::Male),
            "2" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// One pre-aggregated birth row: `count` births of `name` for this
/// sex/department/year combination. Not one row per birth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthRecord {
    pub name: String,
    pub sex: Sex,
    /// Normalized fixed-width department code (`01`, `2A`, `971`, ...).
    /// May fail to resolve in the region lookup.
    pub department: String,
    pub year: i32,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SexFilter {
    #[default]
    All,
    Only(Sex),
}

/// One user query. Built fresh per query, owns no cross-query state.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Case-insensitive substring over the record name. Empty means "no
    /// query active", which is distinct from a query with zero matches.
    pub name_pattern: String,
    /// Inclusive bounds; `None` means the full dataset range.
    pub year_range: Option<(i32, i32)>,
    pub sex: SexFilter,
    /// Resolved department display names. Empty means all departments.
    pub departments: BTreeSet<String>,
}

impl SexFilter {
    pub fn label(self) -> &'static str {
        match self {
            SexFilter::All => "all",
            SexFilter::Only(sex) => sex.label(),
        }
    }
}

impl FilterCriteria {
    pub fn for_name(pattern: &str) -> Self {
        FilterCriteria {
            name_pattern: pattern.to_string(),
            ..FilterCriteria::default()
        }
    }

    /// Whether the user has typed anything at all.
    pub fn has_active_query(&self) -> bool {
        !self.name_pattern.trim().is_empty()
    }
}

/// User-selected toggle between raw counts and proportions of the
/// per-dimension baseline totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Count,
    Proportion,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Count => "count",
            DisplayMode::Proportion => "proportion",
        }
    }
}

// ── Presentation rows ──────────────────────────────────────────────────────
//
// Pre-formatted rows for table previews and CSV export. The core pipeline
// works in numbers; formatting happens once, at the presentation boundary.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TimeSeriesRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ChoroplethRow {
    #[serde(rename = "Code")]
    #[tabled(rename = "Code")]
    pub code: String,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Summary of one query, exported as JSON next to the view CSVs. Echoes the
/// criteria so an export is self-describing.
#[derive(Debug, Serialize)]
pub struct QuerySummary {
    pub name_pattern: String,
    pub sex: String,
    pub year_range: Option<(i32, i32)>,
    pub departments: Vec<String>,
    pub display_mode: String,
    pub status: String,
    pub matched_rows: usize,
    pub total_occurrences: u64,
    pub distinct_years: usize,
    pub distinct_departments: usize,
    pub generated_at: chrono::DateTime<chrono::Local>,
}
