use std::collections::HashMap;

use crate::error::LoadError;
use crate::types::BirthRecord;

/// Department code -> display name mapping, with the inverse direction for
/// the choropleth's name -> code resolution. Built once at load, then
/// read-only.
#[derive(Debug, Clone)]
pub struct RegionLookup {
    name_by_code: HashMap<String, String>,
    code_by_name: HashMap<String, String>,
}

impl RegionLookup {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        let mut name_by_code = HashMap::with_capacity(pairs.len());
        let mut code_by_name = HashMap::with_capacity(pairs.len());
        for (code, name) in pairs {
            code_by_name.insert(name.clone(), code.clone());
            name_by_code.insert(code, name);
        }
        RegionLookup {
            name_by_code,
            code_by_name,
        }
    }

    /// Resolve a department code to its display name (e.g., `35` ->
    /// `Ille-et-Vilaine`). Unknown codes resolve to `None`; callers exclude
    /// such records from department-dimension views rather than failing.
    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.name_by_code.get(code).map(String::as_str)
    }

    /// Inverse resolution, used when joining view rows back onto geometry
    /// keyed by code.
    pub fn code_for(&self, name: &str) -> Option<&str> {
        self.code_by_name.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.name_by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_by_code.is_empty()
    }
}

/// The loaded birth-record table. Immutable for the process lifetime: every
/// query reads the same snapshot, so concurrent queries need no coordination.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<BirthRecord>,
    min_year: i32,
    max_year: i32,
}

impl RecordStore {
    /// Wrap an already-normalized record table. The year bounds are scanned
    /// once here and used by callers to bound and clamp range queries.
    pub fn new(records: Vec<BirthRecord>) -> Result<Self, LoadError> {
        let mut years = records.iter().map(|r| r.year);
        let first = years.next().ok_or(LoadError::EmptyTable)?;
        let (min_year, max_year) = years.fold((first, first), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        Ok(RecordStore {
            records,
            min_year,
            max_year,
        })
    }

    pub fn records(&self) -> &[BirthRecord] {
        &self.records
    }

    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    /// Clamp a requested inclusive range to the dataset's bounds.
    pub fn clamp_range(&self, lo: i32, hi: i32) -> (i32, i32) {
        (lo.max(self.min_year), hi.min(self.max_year))
    }
}
