use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::{department_counts, year_counts};
use crate::derive::{rank, with_ratios, AggregatedRow};
use crate::error::ConsistencyError;
use crate::filter::{baseline_subset, named_subset};
use crate::store::{RecordStore, RegionLookup};
use crate::types::{BirthRecord, DisplayMode, FilterCriteria};

/// Department rankings show at most this many entries.
pub const RANKING_SIZE: usize = 5;

/// One point of the per-year chart. `value` is a count or a ratio depending
/// on the display mode the views were assembled with.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// One entry of the department ranking, ordered per the deriver.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub department: String,
    pub value: f64,
}

/// Headline numbers for the matched subset, shown next to the views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSummary {
    pub matched_rows: usize,
    pub total_occurrences: u64,
    pub distinct_years: usize,
    pub distinct_departments: usize,
}

/// The three presentation-ready views plus the match summary.
#[derive(Debug, Clone)]
pub struct QueryResults {
    pub time_series: Vec<TimeSeriesPoint>,
    pub ranking: Vec<RankingEntry>,
    /// Department code -> value, for the external map renderer. Covers every
    /// matched department, not just the ranked top entries.
    pub choropleth: BTreeMap<String, f64>,
    pub summary: MatchSummary,
}

/// What a query produced. The caller renders each state differently:
/// an idle prompt, an explicit "no results" message, or the views. An empty
/// chart is never shown for either of the first two.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The user has not typed a name pattern yet.
    NoActiveQuery,
    /// An active query matched zero records.
    NoResults,
    Results(QueryResults),
}

impl QueryOutcome {
    pub fn status_label(&self) -> &'static str {
        match self {
            QueryOutcome::NoActiveQuery => "no active query",
            QueryOutcome::NoResults => "no results",
            QueryOutcome::Results(_) => "results",
        }
    }
}

/// Map year buckets into chart points, ascending by year.
pub fn to_time_series(rows: &[AggregatedRow<i32>], mode: DisplayMode) -> Vec<TimeSeriesPoint> {
    rows.iter()
        .map(|r| TimeSeriesPoint {
            year: r.value,
            value: r.metric(mode),
        })
        .collect()
}

/// Map already-ranked department buckets into ranking entries.
pub fn to_ranking(rows: &[AggregatedRow<String>], mode: DisplayMode) -> Vec<RankingEntry> {
    rows.iter()
        .map(|r| RankingEntry {
            department: r.value.clone(),
            value: r.metric(mode),
        })
        .collect()
}

/// Map department buckets back onto codes for the geometry join.
///
/// This is the inverse of the forward code -> name resolution. A display
/// name the lookup cannot map back is omitted rather than erroring; the map
/// renderer simply leaves that region unshaded.
pub fn to_choropleth(
    rows: &[AggregatedRow<String>],
    lookup: &RegionLookup,
    mode: DisplayMode,
) -> BTreeMap<String, f64> {
    rows.iter()
        .filter_map(|r| {
            lookup
                .code_for(&r.value)
                .map(|code| (code.to_string(), r.metric(mode)))
        })
        .collect()
}

fn summarize(matched: &[&BirthRecord]) -> MatchSummary {
    let years: BTreeSet<i32> = matched.iter().map(|r| r.year).collect();
    let departments: BTreeSet<&str> = matched.iter().map(|r| r.department.as_str()).collect();
    MatchSummary {
        matched_rows: matched.len(),
        total_occurrences: matched.iter().map(|r| r.count).sum(),
        distinct_years: years.len(),
        distinct_departments: departments.len(),
    }
}

/// Run the whole pipeline for one query: filter, aggregate both dimensions,
/// join against baseline totals, rank, and assemble the three views.
///
/// Short-circuits before any aggregation when no query is active. The
/// snapshot is never mutated, so concurrent callers can share it freely.
pub fn run_query(
    store: &RecordStore,
    lookup: &RegionLookup,
    criteria: &FilterCriteria,
    mode: DisplayMode,
) -> Result<QueryOutcome, ConsistencyError> {
    let Some(matched) = named_subset(store.records(), criteria, lookup) else {
        return Ok(QueryOutcome::NoActiveQuery);
    };
    if matched.is_empty() {
        return Ok(QueryOutcome::NoResults);
    }

    let baseline = baseline_subset(store.records(), criteria, lookup);

    let year_rows = with_ratios(year_counts(&matched), &year_counts(&baseline))?;
    let dept_rows = with_ratios(
        department_counts(&matched, lookup),
        &department_counts(&baseline, lookup),
    )?;
    let ranked = rank(&dept_rows, mode, RANKING_SIZE);

    Ok(QueryOutcome::Results(QueryResults {
        time_series: to_time_series(&year_rows, mode),
        ranking: to_ranking(&ranked, mode),
        choropleth: to_choropleth(&dept_rows, lookup, mode),
        summary: summarize(&matched),
    }))
}
