#![allow(dead_code)]

use covidtrend::domain::case_row::{CaseKind, CaseRow};
use covidtrend::domain::country::{Country, CountryDirectory};
use covidtrend::domain::error::CovidError;
use covidtrend::ports::data_port::CaseDataPort;
use std::collections::HashMap;

/// In-memory rows per dataset; a kind without rows yields an empty dataset.
pub struct MockCaseDataPort {
    pub rows: HashMap<CaseKind, Vec<CaseRow>>,
    pub errors: HashMap<CaseKind, String>,
}

impl MockCaseDataPort {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_rows(mut self, kind: CaseKind, rows: Vec<CaseRow>) -> Self {
        self.rows.entry(kind).or_default().extend(rows);
        self
    }

    pub fn with_error(mut self, kind: CaseKind, reason: &str) -> Self {
        self.errors.insert(kind, reason.to_string());
        self
    }
}

impl CaseDataPort for MockCaseDataPort {
    fn fetch_rows(&self, kind: CaseKind) -> Result<Vec<CaseRow>, CovidError> {
        if let Some(reason) = self.errors.get(&kind) {
            return Err(CovidError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(self.rows.get(&kind).cloned().unwrap_or_default())
    }
}

/// Dates used as column headers by [`make_row`], starting 1/22/20.
pub const DATE_HEADERS: [&str; 7] = [
    "1/22/20", "1/23/20", "1/24/20", "1/25/20", "1/26/20", "1/27/20", "1/28/20",
];

/// Row with one cell per value, labelled from [`DATE_HEADERS`].
pub fn make_row(country: &str, province: Option<&str>, values: &[u64]) -> CaseRow {
    values
        .iter()
        .zip(DATE_HEADERS)
        .fold(CaseRow::new(country, province), |row, (v, header)| {
            row.with_cell(header, &v.to_string())
        })
}

pub fn directory() -> CountryDirectory {
    CountryDirectory::new(vec![
        Country::new("IT", "Italy", Some(60_000_000)),
        Country::new("AU", "Australia", Some(25_000_000)),
        Country::new("KR", "South Korea", Some(50_000_000)),
        Country::new("CN", "China", None),
    ])
    .with_default_aliases()
}

pub const COUNTRIES_CSV: &str = "code,name,population\n\
    IT,Italy,60000000\n\
    AU,Australia,25000000\n\
    KR,South Korea,50000000\n";

pub const CONFIRMED_CSV: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20\n\
    ,Italy,41.87,12.56,0,2,5,9\n\
    Victoria,Australia,-37.81,144.96,1,1,3,4\n\
    New South Wales,Australia,-33.86,151.20,0,2,2,6\n\
    ,\"Korea, South\",35.90,127.76,1,1,2,2\n\
    ,Atlantis,0,0,5,5,5,5\n";

pub const DEATHS_CSV: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20\n\
    ,Italy,41.87,12.56,0,0,1,1\n\
    Victoria,Australia,-37.81,144.96,0,0,0,1\n";

pub const RECOVERED_CSV: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20,1/25/20\n\
    ,Italy,41.87,12.56,0,0,0,2\n";
