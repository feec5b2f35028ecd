// Entry point and interactive shell.
//
// The shell is a thin presentation layer over the query pipeline:
// - Option [1] loads the records CSV and the department lookup, printing
//   load diagnostics.
// - Option [2] prompts for one query (name, year range, sex, departments,
//   display mode), runs the pipeline once, and renders the three views.
// - After a query, the user can go back to the menu or exit.
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use prenom_explorer::store::{RecordStore, RegionLookup};
use prenom_explorer::types::{DisplayMode, FilterCriteria, QuerySummary, Sex, SexFilter};
use prenom_explorer::views::{self, QueryOutcome, QueryResults};
use prenom_explorer::{loader, output, util};

const RECORDS_PATH: &str = "data/merged_data.csv";
const DEPARTMENTS_PATH: &str = "data/departments.csv";

// In-memory app state so the CSVs are loaded once but queried many times in
// a single run. The snapshot behind the Arcs is never mutated; a failed
// reload leaves the previous one in place.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        store: None,
        lookup: None,
    })
});

struct AppState {
    store: Option<Arc<RecordStore>>,
    lookup: Option<Arc<RegionLookup>>,
}

/// Print a prompt and read one trimmed line from stdin.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after a query.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load both CSVs and swap in the new snapshot.
fn handle_load() {
    let lookup = match loader::load_region_lookup(DEPARTMENTS_PATH) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to load department lookup: {}\n", e);
            return;
        }
    };

    match loader::load_records(RECORDS_PATH) {
        Ok((records, report)) => {
            let store = match RecordStore::new(records) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Failed to build record store: {}\n", e);
                    return;
                }
            };
            println!(
                "Processing dataset... ({} rows read, {} kept, years {}-{})",
                util::format_int(report.rows_read as i64),
                util::format_int(report.rows_kept as i64),
                store.min_year(),
                store.max_year()
            );
            if report.rows_dropped() > 0 {
                println!(
                    "Note: {} rows skipped ({} malformed, {} bad year, {} bad sex, {} bad count).",
                    util::format_int(report.rows_dropped() as i64),
                    util::format_int(report.malformed as i64),
                    util::format_int(report.bad_year as i64),
                    util::format_int(report.bad_sex as i64),
                    util::format_int(report.bad_count as i64)
                );
            }
            println!(
                "Department lookup: {} regions.\n",
                util::format_int(lookup.len() as i64)
            );
            let mut state = APP_STATE.lock().unwrap();
            state.store = Some(Arc::new(store));
            state.lookup = Some(Arc::new(lookup));
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Prompt for one query's criteria and display mode.
fn prompt_criteria(store: &RecordStore, lookup: &RegionLookup) -> (FilterCriteria, DisplayMode) {
    let mut criteria = FilterCriteria::for_name(&read_line("Name (substring): "));

    let range_input = read_line(&format!(
        "Year range {}-{} (lo-hi, blank for all): ",
        store.min_year(),
        store.max_year()
    ));
    if !range_input.is_empty() {
        match parse_year_range(&range_input) {
            Some((lo, hi)) => criteria.year_range = Some(store.clamp_range(lo, hi)),
            None => println!("Unrecognized range, using the full dataset."),
        }
    }

    criteria.sex = match read_line("Sex (M/F, blank for all): ").to_uppercase().as_str() {
        "M" => SexFilter::Only(Sex::Male),
        "F" => SexFilter::Only(Sex::Female),
        _ => SexFilter::All,
    };

    let dept_input = read_line("Departments (names, comma-separated, blank for all): ");
    if !dept_input.is_empty() {
        let mut selected = BTreeSet::new();
        for name in dept_input.split(',') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if lookup.code_for(name).is_some() {
                selected.insert(name.to_string());
            } else {
                println!("Unknown department {:?}, ignoring.", name);
            }
        }
        criteria.departments = selected;
    }

    let mode = match read_line("Display mode (c=count, p=proportion): ").to_lowercase().as_str() {
        "p" => DisplayMode::Proportion,
        _ => DisplayMode::Count,
    };

    (criteria, mode)
}

fn parse_year_range(input: &str) -> Option<(i32, i32)> {
    let (lo, hi) = input.split_once('-')?;
    let lo = lo.trim().parse::<i32>().ok()?;
    let hi = hi.trim().parse::<i32>().ok()?;
    if lo > hi {
        return None;
    }
    Some((lo, hi))
}

/// Handle option [2]: run one query against the loaded snapshot and render
/// the three views.
fn handle_query() {
    let (store, lookup) = {
        let state = APP_STATE.lock().unwrap();
        match (&state.store, &state.lookup) {
            (Some(s), Some(l)) => (Arc::clone(s), Arc::clone(l)),
            _ => {
                println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
                return;
            }
        }
    };

    let (criteria, mode) = prompt_criteria(&store, &lookup);

    let outcome = match views::run_query(&store, &lookup, &criteria, mode) {
        Ok(o) => o,
        Err(e) => {
            // Totals come from a superset query, so this indicates a bug in
            // the pipeline rather than bad user input.
            eprintln!("Internal error: {}\n", e);
            return;
        }
    };

    println!();
    match &outcome {
        QueryOutcome::NoActiveQuery => {
            println!("No active query. Type a name to search.\n");
        }
        QueryOutcome::NoResults => {
            println!("No results for {:?} with the current filters.\n", criteria.name_pattern.trim());
        }
        QueryOutcome::Results(results) => {
            println!(
                "{} matching rows, {} occurrences across {} years and {} departments ({} mode).\n",
                util::format_int(results.summary.matched_rows as i64),
                util::format_int(results.summary.total_occurrences as i64),
                util::format_int(results.summary.distinct_years as i64),
                util::format_int(results.summary.distinct_departments as i64),
                mode.label()
            );
            output::preview_table(
                "Occurrences per year",
                &output::time_series_rows(&results.time_series, mode),
                15,
            );
            output::preview_table(
                "Top departments",
                &output::ranking_rows(&results.ranking, mode),
                views::RANKING_SIZE,
            );
            output::preview_table(
                "Choropleth values (per department code)",
                &output::choropleth_rows(results, &lookup, mode),
                10,
            );

            if read_line("Export results to CSV/JSON (Y/N): ").to_uppercase() == "Y" {
                export_results(results, &lookup, &criteria, &outcome, mode);
            }
        }
    }
}

fn export_results(
    results: &QueryResults,
    lookup: &RegionLookup,
    criteria: &FilterCriteria,
    outcome: &QueryOutcome,
    mode: DisplayMode,
) {
    let exports = [
        output::write_csv(
            "time_series.csv",
            &output::time_series_rows(&results.time_series, mode),
        ),
        output::write_csv(
            "department_ranking.csv",
            &output::ranking_rows(&results.ranking, mode),
        ),
        output::write_csv(
            "choropleth.csv",
            &output::choropleth_rows(results, lookup, mode),
        ),
        output::write_json(
            "query_summary.json",
            &QuerySummary {
                name_pattern: criteria.name_pattern.trim().to_string(),
                sex: criteria.sex.label().to_string(),
                year_range: criteria.year_range,
                departments: criteria.departments.iter().cloned().collect(),
                display_mode: mode.label().to_string(),
                status: outcome.status_label().to_string(),
                matched_rows: results.summary.matched_rows,
                total_occurrences: results.summary.total_occurrences,
                distinct_years: results.summary.distinct_years,
                distinct_departments: results.summary.distinct_departments,
                generated_at: chrono::Local::now(),
            },
        ),
    ];
    for result in exports {
        if let Err(e) = result {
            eprintln!("Write error: {}", e);
        }
    }
    println!("Exported time_series.csv, department_ranking.csv, choropleth.csv, query_summary.json\n");
}

fn main() {
    pretty_env_logger::init();
    loop {
        println!("First-name explorer:");
        println!("[1] Load the dataset");
        println!("[2] Run a query");
        match read_line("Enter choice: ").as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                handle_query();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
