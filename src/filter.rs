use crate::store::RegionLookup;
use crate::types::{BirthRecord, FilterCriteria, SexFilter};

/// Whether a record passes every active filter EXCEPT the name pattern.
///
/// These are the predicates shared between the matched subset and the
/// baseline subset that feeds the ratio denominators. All predicates are
/// intersected, so application order never changes the result.
fn shared_filters_match(
    record: &BirthRecord,
    criteria: &FilterCriteria,
    lookup: &RegionLookup,
) -> bool {
    if let Some((lo, hi)) = criteria.year_range {
        if record.year < lo || record.year > hi {
            return false;
        }
    }

    if let SexFilter::Only(sex) = criteria.sex {
        if record.sex != sex {
            return false;
        }
    }

    // The department set is chosen from name-labelled UI options, so the
    // membership test runs on the resolved display name, not the raw code.
    if !criteria.departments.is_empty() {
        match lookup.display_name(&record.department) {
            Some(name) => {
                if !criteria.departments.contains(name) {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

/// Records matching the name pattern and every other active filter.
///
/// Returns `None` when no query is active (empty name pattern): the caller
/// must skip aggregation entirely in that case, since baseline totals are
/// only meaningful alongside a filtered count. `Some(vec![])` means an
/// active query matched nothing, which is a different user-visible state.
pub fn named_subset<'a>(
    records: &'a [BirthRecord],
    criteria: &FilterCriteria,
    lookup: &RegionLookup,
) -> Option<Vec<&'a BirthRecord>> {
    if !criteria.has_active_query() {
        return None;
    }
    let pattern = criteria.name_pattern.trim().to_lowercase();
    let matched = records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&pattern))
        .filter(|r| shared_filters_match(r, criteria, lookup))
        .collect();
    Some(matched)
}

/// Records matching every active filter EXCEPT the name pattern: the
/// denominator population for ratio math. Recomputed per query because it
/// changes whenever the sex/year-range/department filters change.
pub fn baseline_subset<'a>(
    records: &'a [BirthRecord],
    criteria: &FilterCriteria,
    lookup: &RegionLookup,
) -> Vec<&'a BirthRecord> {
    records
        .iter()
        .filter(|r| shared_filters_match(r, criteria, lookup))
        .collect()
}
