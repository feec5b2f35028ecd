use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::ConsistencyError;
use crate::types::DisplayMode;

/// One dimension bucket after joining filtered counts against baseline
/// totals. `total` is the occurrence sum for the same bucket with the name
/// filter lifted; `ratio` is the bucket's share of it.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow<K> {
    pub value: K,
    pub count: u64,
    pub total: u64,
    pub ratio: f64,
}

impl<K> AggregatedRow<K> {
    /// The number the active display mode puts on screen.
    pub fn metric(&self, mode: DisplayMode) -> f64 {
        match mode {
            DisplayMode::Count => self.count as f64,
            DisplayMode::Proportion => self.ratio,
        }
    }
}

/// Left-join counts against totals and derive the ratio per bucket.
///
/// Every count bucket must have a total: totals come from a superset of the
/// records behind the counts, so a missing key is an upstream invariant
/// violation and surfaces as [`ConsistencyError`]. A zero total yields a
/// ratio of zero rather than a division fault; it occurs when a restrictive
/// filter selects a dimension slice holding only zero-count rows.
///
/// Rows come back ascending by dimension value, which is the chronological
/// order the time-series view needs.
pub fn with_ratios<K>(
    counts: BTreeMap<K, u64>,
    totals: &BTreeMap<K, u64>,
) -> Result<Vec<AggregatedRow<K>>, ConsistencyError>
where
    K: Ord + Display,
{
    let mut rows = Vec::with_capacity(counts.len());
    for (value, count) in counts {
        let total = match totals.get(&value) {
            Some(t) => *t,
            None => {
                return Err(ConsistencyError {
                    dimension_value: value.to_string(),
                })
            }
        };
        let ratio = if total > 0 {
            count as f64 / total as f64
        } else {
            0.0
        };
        rows.push(AggregatedRow {
            value,
            count,
            total,
            ratio,
        });
    }
    Ok(rows)
}

/// Order rows descending by the selected metric and keep the first `top_n`.
///
/// Ties break ascending by dimension value so rankings are deterministic and
/// testable. Works on the ascending output of [`with_ratios`].
pub fn rank<K>(rows: &[AggregatedRow<K>], mode: DisplayMode, top_n: usize) -> Vec<AggregatedRow<K>>
where
    K: Ord + Clone,
{
    let mut ranked: Vec<AggregatedRow<K>> = rows.to_vec();
    ranked.sort_by(|a, b| {
        metric_order(b, a, mode).then_with(|| a.value.cmp(&b.value))
    });
    ranked.truncate(top_n);
    ranked
}

fn metric_order<K>(a: &AggregatedRow<K>, b: &AggregatedRow<K>, mode: DisplayMode) -> Ordering {
    match mode {
        DisplayMode::Count => a.count.cmp(&b.count),
        // Ratios are finite (zero denominators map to 0.0), so total_cmp
        // gives a well-defined order.
        DisplayMode::Proportion => a.ratio.total_cmp(&b.ratio),
    }
}
