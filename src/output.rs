use std::path::Path;

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::error::ExportError;
use crate::store::RegionLookup;
use crate::types::{ChoroplethRow, DisplayMode, RankingRow, TimeSeriesRow};
use crate::util::{format_int, format_number};
use crate::views::{QueryResults, RankingEntry, TimeSeriesPoint};

/// Render a view value for tables and CSV: counts get thousands separators,
/// proportions a fixed four decimals.
pub fn format_value(value: f64, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Count => format_int(value.round() as u64),
        DisplayMode::Proportion => format_number(value, 4),
    }
}

pub fn time_series_rows(points: &[TimeSeriesPoint], mode: DisplayMode) -> Vec<TimeSeriesRow> {
    points
        .iter()
        .map(|p| TimeSeriesRow {
            year: p.year,
            value: format_value(p.value, mode),
        })
        .collect()
}

pub fn ranking_rows(entries: &[RankingEntry], mode: DisplayMode) -> Vec<RankingRow> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, e)| RankingRow {
            rank: idx + 1,
            department: e.department.clone(),
            value: format_value(e.value, mode),
        })
        .collect()
}

pub fn choropleth_rows(results: &QueryResults, lookup: &RegionLookup, mode: DisplayMode) -> Vec<ChoroplethRow> {
    results
        .choropleth
        .iter()
        .map(|(code, value)| ChoroplethRow {
            code: code.clone(),
            department: lookup.display_name(code).unwrap_or("").to_string(),
            value: format_value(*value, mode),
        })
        .collect()
}

/// Print a titled markdown table of up to `max_rows` rows.
pub fn preview_table<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("... {} more rows", format_int((rows.len() - max_rows) as u64));
    }
    println!();
}

pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<(), ExportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}
