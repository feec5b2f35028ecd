use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use log::{info, warn};

use crate::error::LoadError;
use crate::store::RegionLookup;
use crate::types::{BirthRecord, RawRow, Sex};
use crate::util::{normalize_department, parse_count, parse_year};

const REQUIRED_COLUMNS: [&str; 5] = ["preusuel", "sexe", "dpt", "annais", "nombre"];

/// What happened during a load, for diagnostics and logging.
///
/// Dropped rows are truly absent from every downstream aggregate; they are
/// never zero-filled into counts or totals.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub malformed: usize,
    pub bad_year: usize,
    pub bad_sex: usize,
    pub bad_count: usize,
}

impl LoadReport {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Load and normalize the registry export from a semicolon-delimited CSV.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<(Vec<BirthRecord>, LoadReport), LoadError> {
    let file = File::open(path)?;
    read_records(file)
}

/// Reader-based variant of [`load_records`], shared with tests.
///
/// Typing and validation per row:
/// - blank string cells become `""`, never a null sentinel;
/// - `annais` must parse as an integer (`XXXX` placeholders drop the row);
/// - `sexe` must be a known code;
/// - `nombre` must parse as a non-negative integer;
/// - department codes are normalized to the lookup's fixed width.
pub fn read_records<R: Read>(reader: R) -> Result<(Vec<BirthRecord>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.rows_read += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                report.malformed += 1;
                continue;
            }
        };

        let year = match parse_year(row.year.as_deref().unwrap_or("")) {
            Some(y) => y,
            None => {
                report.bad_year += 1;
                continue;
            }
        };
        let sex = match Sex::from_code(row.sex.as_deref().unwrap_or("")) {
            Some(s) => s,
            None => {
                report.bad_sex += 1;
                continue;
            }
        };
        let count = match parse_count(row.count.as_deref().unwrap_or("")) {
            Some(c) => c,
            None => {
                report.bad_count += 1;
                continue;
            }
        };

        let name = row.name.unwrap_or_default().trim().to_string();
        let department = normalize_department(row.department.as_deref().unwrap_or(""));

        records.push(BirthRecord {
            name,
            sex,
            department,
            year,
            count,
        });
        report.rows_kept += 1;
    }

    if records.is_empty() {
        return Err(LoadError::EmptyTable);
    }

    info!(
        "loaded {} of {} rows ({} dropped: {} malformed, {} bad year, {} bad sex, {} bad count)",
        report.rows_kept,
        report.rows_read,
        report.rows_dropped(),
        report.malformed,
        report.bad_year,
        report.bad_sex,
        report.bad_count
    );

    Ok((records, report))
}

/// Load the department code -> display name lookup from a two-column CSV
/// (`code,name`, with a header row). Boundary geometry is not parsed here;
/// the choropleth view emits codes and the map renderer joins them itself.
pub fn load_region_lookup<P: AsRef<Path>>(path: P) -> Result<RegionLookup, LoadError> {
    let file = File::open(path)?;
    read_region_lookup(file)
}

pub fn read_region_lookup<R: Read>(reader: R) -> Result<RegionLookup, LoadError> {
    let mut rdr = ReaderBuilder::new().delimiter(b',').from_reader(reader);

    let mut pairs = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let code = record
            .get(0)
            .ok_or_else(|| LoadError::MissingColumn("code".to_string()))?;
        let name = record
            .get(1)
            .ok_or_else(|| LoadError::MissingColumn("name".to_string()))?;
        let code = normalize_department(code);
        let name = name.trim().to_string();
        if code.is_empty() || name.is_empty() {
            warn!("skipping lookup row with blank code or name");
            continue;
        }
        pairs.push((code, name));
    }

    if pairs.is_empty() {
        return Err(LoadError::EmptyTable);
    }

    info!("region lookup: {} departments", pairs.len());
    Ok(RegionLookup::new(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
preusuel;sexe;dpt;annais;nombre
CAMILLE;1;75;2000;120
CAMILLE;2;75;2000;340
CAMILLE;2;13;2001;90
";

    #[test]
    fn reads_well_formed_rows() {
        let (records, report) = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.rows_kept, 3);
        assert_eq!(records[0].name, "CAMILLE");
        assert_eq!(records[0].sex, Sex::Male);
        assert_eq!(records[1].count, 340);
        assert_eq!(records[2].department, "13");
    }

    #[test]
    fn drops_rows_with_placeholder_year() {
        let input = "\
preusuel;sexe;dpt;annais;nombre
ALICE;2;35;XXXX;14
ALICE;2;35;2005;14
";
        let (records, report) = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2005);
        assert_eq!(report.bad_year, 1);
        assert_eq!(report.rows_dropped(), 1);
    }

    #[test]
    fn drops_rows_with_unknown_sex_code() {
        let input = "\
preusuel;sexe;dpt;annais;nombre
ALICE;9;35;2005;14
LOUIS;1;35;2005;3
";
        let (records, report) = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "LOUIS");
        assert_eq!(report.bad_sex, 1);
    }

    #[test]
    fn pads_single_digit_department_codes() {
        let input = "\
preusuel;sexe;dpt;annais;nombre
LOUIS;1;1;2005;3
";
        let (records, _) = read_records(input.as_bytes()).unwrap();
        assert_eq!(records[0].department, "01");
    }

    #[test]
    fn blank_name_becomes_empty_string() {
        let input = "\
preusuel;sexe;dpt;annais;nombre
;1;75;2005;3
";
        let (records, _) = read_records(input.as_bytes()).unwrap();
        assert_eq!(records[0].name, "");
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let input = "\
preusuel;sexe;dpt;annais
CAMILLE;1;75;2000
";
        match read_records(input.as_bytes()) {
            Err(LoadError::MissingColumn(col)) => assert_eq!(col, "nombre"),
            other => panic!("expected MissingColumn, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn empty_table_is_a_load_error() {
        let input = "preusuel;sexe;dpt;annais;nombre\n";
        assert!(matches!(
            read_records(input.as_bytes()),
            Err(LoadError::EmptyTable)
        ));
    }

    #[test]
    fn all_rows_dropped_is_a_load_error() {
        let input = "\
preusuel;sexe;dpt;annais;nombre
CAMILLE;1;75;XXXX;120
";
        assert!(matches!(
            read_records(input.as_bytes()),
            Err(LoadError::EmptyTable)
        ));
    }

    #[test]
    fn region_lookup_reads_code_name_pairs() {
        let input = "code,name\n35,Ille-et-Vilaine\n75,Paris\n2A,Corse-du-Sud\n";
        let lookup = read_region_lookup(input.as_bytes()).unwrap();
        assert_eq!(lookup.display_name("35"), Some("Ille-et-Vilaine"));
        assert_eq!(lookup.display_name("2A"), Some("Corse-du-Sud"));
        assert_eq!(lookup.code_for("Paris"), Some("75"));
        assert_eq!(lookup.display_name("99"), None);
    }
}
