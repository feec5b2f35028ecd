use std::collections::BTreeMap;

use crate::store::RegionLookup;
use crate::types::BirthRecord;

/// Group records by an extracted key and sum their occurrence counts.
///
/// The key extractor may decline a record (`None`), which silently drops it
/// from this aggregation only. Both concrete dimensions below are thin
/// wrappers over this one implementation so counts and baseline totals are
/// guaranteed to bucket identically.
pub fn counts_by<K, F>(records: &[&BirthRecord], key: F) -> BTreeMap<K, u64>
where
    K: Ord,
    F: Fn(&BirthRecord) -> Option<K>,
{
    let mut buckets = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *buckets.entry(k).or_insert(0) += record.count;
        }
    }
    buckets
}

/// Occurrences per calendar year. Every record has a year, including those
/// whose department code does not resolve.
pub fn year_counts(records: &[&BirthRecord]) -> BTreeMap<i32, u64> {
    counts_by(records, |r| Some(r.year))
}

/// Occurrences per department display name. Records whose code is missing
/// from the lookup have no display name and are excluded here, while still
/// contributing to the year dimension.
pub fn department_counts(
    records: &[&BirthRecord],
    lookup: &RegionLookup,
) -> BTreeMap<String, u64> {
    counts_by(records, |r| {
        lookup.display_name(&r.department).map(str::to_string)
    })
}
