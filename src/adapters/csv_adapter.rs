//! Wide-format time series CSV adapter.
//!
//! Reads the upstream layout: `Province/State,Country/Region,Lat,Long`
//! followed by one column per report date. One file per [`CaseKind`]; the
//! recovered file is optional since later upstream releases dropped it.

use crate::domain::case_row::{CaseKind, CaseRow};
use crate::domain::error::CovidError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::CaseDataPort;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const PROVINCE_HEADER: &str = "Province/State";
const COUNTRY_HEADER: &str = "Country/Region";
const LAT_HEADER: &str = "Lat";
const LONG_HEADERS: [&str; 2] = ["Long", "Long_"];

pub struct CsvAdapter {
    confirmed: PathBuf,
    recovered: Option<PathBuf>,
    deaths: PathBuf,
}

impl CsvAdapter {
    pub fn new(confirmed: PathBuf, recovered: Option<PathBuf>, deaths: PathBuf) -> Self {
        Self {
            confirmed,
            recovered,
            deaths,
        }
    }

    /// Paths from `[data]`, relative ones resolved against `base_dir`.
    pub fn from_config(config: &dyn ConfigPort, base_dir: &Path) -> Result<Self, CovidError> {
        let required = |key: &str| {
            config
                .get_string("data", key)
                .filter(|s| !s.trim().is_empty())
                .map(|s| base_dir.join(s.trim()))
                .ok_or_else(|| CovidError::ConfigMissing {
                    section: "data".into(),
                    key: key.into(),
                })
        };
        let recovered = config
            .get_string("data", "recovered")
            .filter(|s| !s.trim().is_empty())
            .map(|s| base_dir.join(s.trim()));

        Ok(Self::new(required("confirmed")?, recovered, required("deaths")?))
    }

    fn path_for(&self, kind: CaseKind) -> Option<&Path> {
        match kind {
            CaseKind::Confirmed => Some(&self.confirmed),
            CaseKind::Recovered => self.recovered.as_deref(),
            CaseKind::Deaths => Some(&self.deaths),
        }
    }
}

impl CaseDataPort for CsvAdapter {
    fn fetch_rows(&self, kind: CaseKind) -> Result<Vec<CaseRow>, CovidError> {
        let Some(path) = self.path_for(kind) else {
            tracing::info!(%kind, "no file configured, treating counts as zero");
            return Ok(Vec::new());
        };
        let file = File::open(path).map_err(|e| CovidError::DataLoad {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_rows(file).map_err(|e| match e {
            CovidError::DataLoad { reason } => CovidError::DataLoad {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }
}

/// Parse wide-format rows. Every column that is not a location column is
/// kept as a date cell; dates are parsed at ingest.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<CaseRow>, CovidError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| CovidError::DataLoad {
            reason: format!("CSV header error: {}", e),
        })?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let country_idx = position(COUNTRY_HEADER).ok_or_else(|| CovidError::DataLoad {
        reason: format!("missing {} column", COUNTRY_HEADER),
    })?;
    let province_idx = position(PROVINCE_HEADER);
    let lat_idx = position(LAT_HEADER);
    let long_idx = LONG_HEADERS.iter().find_map(|h| position(*h));

    let location_columns = [Some(country_idx), province_idx, lat_idx, long_idx];
    let date_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !location_columns.contains(&Some(*i)))
        .map(|(i, h)| (i, h.trim().to_string()))
        .collect();

    let coordinate = |record: &csv::StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .and_then(|v| v.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| CovidError::DataLoad {
            reason: format!("CSV parse error: {}", e),
        })?;

        let country = record.get(country_idx).unwrap_or("").trim();
        if country.is_empty() {
            continue;
        }
        let province = province_idx.and_then(|i| record.get(i));

        let mut row = CaseRow::new(country, province)
            .with_coordinates(coordinate(&record, lat_idx), coordinate(&record, long_idx));
        row.cells = date_columns
            .iter()
            .map(|(i, header)| (header.clone(), record.get(*i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use std::fs;
    use tempfile::TempDir;

    const CONFIRMED: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20\n\
        ,Italy,41.87,12.56,0,2,5\n\
        Victoria,Australia,-37.81,144.96,1,1,3\n\
        \"Bonaire, Sint Eustatius and Saba\",Netherlands,12.17,-68.24,,,1\n";

    #[test]
    fn parses_location_columns_and_cells() {
        let rows = parse_rows(CONFIRMED.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        let italy = &rows[0];
        assert_eq!(italy.country_region, "Italy");
        assert_eq!(italy.province, None);
        assert!((italy.lat - 41.87).abs() < f64::EPSILON);
        assert_eq!(
            italy.cells,
            vec![
                ("1/22/20".to_string(), "0".to_string()),
                ("1/23/20".to_string(), "2".to_string()),
                ("1/24/20".to_string(), "5".to_string()),
            ]
        );

        assert_eq!(rows[1].province.as_deref(), Some("Victoria"));
        assert!((rows[1].long - 144.96).abs() < f64::EPSILON);
        assert_eq!(
            rows[2].province.as_deref(),
            Some("Bonaire, Sint Eustatius and Saba")
        );
    }

    #[test]
    fn column_order_does_not_matter() {
        let csv = "Country/Region,Province/State,Long_,Lat,3/1/2020\nItaly,,12.5,41.8,7\n";
        let rows = parse_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].country_region, "Italy");
        assert!((rows[0].long - 12.5).abs() < f64::EPSILON);
        assert_eq!(rows[0].cells, vec![("3/1/2020".to_string(), "7".to_string())]);
    }

    #[test]
    fn missing_country_column_is_error() {
        let csv = "Province/State,Lat,Long,1/22/20\n,1,2,3\n";
        assert!(matches!(
            parse_rows(csv.as_bytes()),
            Err(CovidError::DataLoad { .. })
        ));
    }

    #[test]
    fn fetch_rows_reads_configured_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("confirmed.csv"), CONFIRMED).unwrap();
        fs::write(
            dir.path().join("deaths.csv"),
            "Province/State,Country/Region,Lat,Long,1/24/20\n,Italy,41.87,12.56,1\n",
        )
        .unwrap();

        let config = FileConfigAdapter::from_string(
            "[data]\nconfirmed = confirmed.csv\ndeaths = deaths.csv\ncountries = c.csv\n",
        )
        .unwrap();
        let adapter = CsvAdapter::from_config(&config, dir.path()).unwrap();

        assert_eq!(adapter.fetch_rows(CaseKind::Confirmed).unwrap().len(), 3);
        assert_eq!(adapter.fetch_rows(CaseKind::Deaths).unwrap().len(), 1);
        // recovered not configured
        assert!(adapter.fetch_rows(CaseKind::Recovered).unwrap().is_empty());
    }

    #[test]
    fn fetch_rows_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(
            dir.path().join("nope.csv"),
            None,
            dir.path().join("deaths.csv"),
        );
        let err = adapter.fetch_rows(CaseKind::Confirmed).unwrap_err();
        assert!(err.to_string().contains("nope.csv"));
    }

    #[test]
    fn from_config_requires_confirmed() {
        let config = FileConfigAdapter::from_string("[data]\ndeaths = d.csv\n").unwrap();
        assert!(matches!(
            CsvAdapter::from_config(&config, Path::new(".")),
            Err(CovidError::ConfigMissing { ref key, .. }) if key == "confirmed"
        ));
    }
}
