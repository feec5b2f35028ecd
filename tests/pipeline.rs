// End-to-end runs of the query pipeline over small in-memory datasets.

use std::collections::BTreeSet;

use prenom_explorer::store::{RecordStore, RegionLookup};
use prenom_explorer::types::{BirthRecord, DisplayMode, FilterCriteria, Sex, SexFilter};
use prenom_explorer::views::{run_query, QueryOutcome};

fn record(name: &str, sex: Sex, dept: &str, year: i32, count: u64) -> BirthRecord {
    BirthRecord {
        name: name.to_string(),
        sex,
        department: dept.to_string(),
        year,
        count,
    }
}

fn lookup() -> RegionLookup {
    RegionLookup::new(vec![
        ("75".to_string(), "Paris".to_string()),
        ("13".to_string(), "Bouches-du-Rhone".to_string()),
        ("35".to_string(), "Ille-et-Vilaine".to_string()),
    ])
}

fn camille_store() -> RecordStore {
    RecordStore::new(vec![
        record("CAMILLE", Sex::Male, "75", 2000, 120),
        record("CAMILLE", Sex::Female, "75", 2000, 340),
        record("CAMILLE", Sex::Female, "13", 2001, 90),
    ])
    .unwrap()
}

#[test]
fn camille_scenario_time_series_and_ranking() {
    let store = camille_store();
    let mut criteria = FilterCriteria::for_name("camille");
    criteria.year_range = Some((2000, 2001));

    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Count).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };

    let series: Vec<(i32, f64)> = results
        .time_series
        .iter()
        .map(|p| (p.year, p.value))
        .collect();
    assert_eq!(series, vec![(2000, 460.0), (2001, 90.0)]);

    let ranking: Vec<(&str, f64)> = results
        .ranking
        .iter()
        .map(|e| (e.department.as_str(), e.value))
        .collect();
    assert_eq!(ranking, vec![("Paris", 460.0), ("Bouches-du-Rhone", 90.0)]);

    assert_eq!(results.choropleth.get("75"), Some(&460.0));
    assert_eq!(results.choropleth.get("13"), Some(&90.0));

    assert_eq!(results.summary.matched_rows, 3);
    assert_eq!(results.summary.total_occurrences, 550);
}

#[test]
fn camille_scenario_proportions_use_per_dimension_baselines() {
    // Every record in the dataset is a Camille row, so each bucket's share
    // of its own baseline is exactly one.
    let store = camille_store();
    let criteria = FilterCriteria::for_name("camille");

    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Proportion).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };
    for point in &results.time_series {
        assert!((point.value - 1.0).abs() < 1e-12);
    }
    for entry in &results.ranking {
        assert!((entry.value - 1.0).abs() < 1e-12);
    }
}

#[test]
fn unmatched_name_reports_no_results() {
    let store = camille_store();
    let criteria = FilterCriteria::for_name("zzzznotaname");
    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Count).unwrap();
    assert!(matches!(outcome, QueryOutcome::NoResults));
    assert_eq!(outcome.status_label(), "no results");
}

#[test]
fn empty_pattern_reports_no_active_query() {
    let store = camille_store();
    let criteria = FilterCriteria::for_name("");
    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Count).unwrap();
    assert!(matches!(outcome, QueryOutcome::NoActiveQuery));
    assert_eq!(outcome.status_label(), "no active query");
}

fn mixed_store() -> RecordStore {
    RecordStore::new(vec![
        record("CAMILLE", Sex::Male, "75", 2000, 120),
        record("CAMILLE", Sex::Female, "75", 2000, 340),
        record("CAMILLE", Sex::Female, "13", 2001, 90),
        record("LOUIS", Sex::Male, "75", 2000, 540),
        record("LOUIS", Sex::Male, "13", 2001, 210),
        record("ANNA", Sex::Female, "35", 2000, 80),
        record("ANNA", Sex::Female, "35", 2001, 60),
    ])
    .unwrap()
}

#[test]
fn proportions_are_shares_of_the_name_blind_baseline() {
    let store = mixed_store();
    let criteria = FilterCriteria::for_name("camille");

    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Proportion).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };

    // 2000: 460 Camille of 1,080 births; 2001: 90 of 360.
    let by_year: Vec<(i32, f64)> = results
        .time_series
        .iter()
        .map(|p| (p.year, p.value))
        .collect();
    assert_eq!(by_year.len(), 2);
    assert!((by_year[0].1 - 460.0 / 1080.0).abs() < 1e-12);
    assert!((by_year[1].1 - 90.0 / 360.0).abs() < 1e-12);

    // Paris: 460 of 1,000; Bouches-du-Rhone: 90 of 300.
    assert!((results.choropleth.get("75").unwrap() - 0.46).abs() < 1e-12);
    assert!((results.choropleth.get("13").unwrap() - 0.30).abs() < 1e-12);

    for point in &results.time_series {
        assert!(point.value >= 0.0 && point.value <= 1.0);
    }
}

#[test]
fn sex_filter_restricts_counts_and_baselines_together() {
    let store = mixed_store();
    let mut criteria = FilterCriteria::for_name("camille");
    criteria.sex = SexFilter::Only(Sex::Female);

    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Proportion).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };

    // Female births 2000: Camille 340 of 420 (340 + Anna's 80).
    let p2000 = results
        .time_series
        .iter()
        .find(|p| p.year == 2000)
        .unwrap();
    assert!((p2000.value - 340.0 / 420.0).abs() < 1e-12);
}

#[test]
fn department_filter_narrows_every_view() {
    let store = mixed_store();
    let mut criteria = FilterCriteria::for_name("camille");
    criteria.departments = BTreeSet::from(["Paris".to_string()]);

    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Count).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };

    assert_eq!(results.ranking.len(), 1);
    assert_eq!(results.ranking[0].department, "Paris");
    assert_eq!(results.choropleth.len(), 1);
    assert!(results.time_series.iter().all(|p| p.year == 2000));
}

#[test]
fn unresolved_departments_stay_out_of_geo_views_but_in_the_time_series() {
    let store = RecordStore::new(vec![
        record("CAMILLE", Sex::Female, "75", 2000, 100),
        // "98" is not in the lookup.
        record("CAMILLE", Sex::Female, "98", 2000, 25),
    ])
    .unwrap();
    let criteria = FilterCriteria::for_name("camille");

    let outcome = run_query(&store, &lookup(), &criteria, DisplayMode::Count).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };

    assert_eq!(results.time_series[0].value, 125.0);
    assert_eq!(results.ranking.len(), 1);
    assert_eq!(results.ranking[0].department, "Paris");
    assert!(!results.choropleth.contains_key("98"));
}

#[test]
fn ranking_keeps_the_top_five_departments() {
    let mut records = Vec::new();
    let lookup = RegionLookup::new(
        (1..=8)
            .map(|i| (format!("0{}", i), format!("Dept{}", i)))
            .collect(),
    );
    for i in 1..=8u64 {
        records.push(record("NOA", Sex::Female, &format!("0{}", i), 2010, i * 10));
    }
    let store = RecordStore::new(records).unwrap();
    let criteria = FilterCriteria::for_name("noa");

    let outcome = run_query(&store, &lookup, &criteria, DisplayMode::Count).unwrap();
    let QueryOutcome::Results(results) = outcome else {
        panic!("expected results");
    };

    assert_eq!(results.ranking.len(), 5);
    let values: Vec<f64> = results.ranking.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![80.0, 70.0, 60.0, 50.0, 40.0]);
    // The choropleth still covers all eight departments.
    assert_eq!(results.choropleth.len(), 8);
}

#[test]
fn rapid_fire_queries_share_the_snapshot_without_interference() {
    let store = mixed_store();
    let lk = lookup();

    let first = run_query(
        &store,
        &lk,
        &FilterCriteria::for_name("camille"),
        DisplayMode::Count,
    )
    .unwrap();
    let second = run_query(
        &store,
        &lk,
        &FilterCriteria::for_name("louis"),
        DisplayMode::Count,
    )
    .unwrap();
    let third = run_query(
        &store,
        &lk,
        &FilterCriteria::for_name("camille"),
        DisplayMode::Count,
    )
    .unwrap();

    let (QueryOutcome::Results(a), QueryOutcome::Results(b), QueryOutcome::Results(c)) =
        (first, second, third)
    else {
        panic!("expected results");
    };
    assert_eq!(a.summary.total_occurrences, 550);
    assert_eq!(b.summary.total_occurrences, 750);
    // Identical query, identical result: nothing was mutated in between.
    assert_eq!(c.summary.total_occurrences, a.summary.total_occurrences);
    assert_eq!(c.time_series, a.time_series);
}
