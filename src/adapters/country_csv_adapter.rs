//! Country metadata CSV adapter.
//!
//! Expects a header row `code,name,population`; population may be blank.

use crate::domain::country::{Country, CountryDirectory};
use crate::domain::error::CovidError;
use crate::ports::config_port::ConfigPort;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn parse_countries<R: Read>(reader: R) -> Result<Vec<Country>, CovidError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut countries = Vec::new();
    for result in rdr.deserialize() {
        let country: Country = result.map_err(|e| CovidError::DataLoad {
            reason: format!("country CSV parse error: {}", e),
        })?;
        countries.push(country);
    }
    Ok(countries)
}

pub fn load_countries(path: &Path) -> Result<Vec<Country>, CovidError> {
    let file = File::open(path).map_err(|e| CovidError::DataLoad {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;
    parse_countries(file)
}

/// Directory from `[data] countries`, with `[aliases]` when present and the
/// built-in alias table otherwise.
pub fn load_directory(
    config: &dyn ConfigPort,
    base_dir: &Path,
) -> Result<CountryDirectory, CovidError> {
    let path = config
        .get_string("data", "countries")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CovidError::ConfigMissing {
            section: "data".into(),
            key: "countries".into(),
        })?;
    let countries = load_countries(&base_dir.join(path.trim()))?;
    let directory = CountryDirectory::new(countries);

    let aliases = config.get_section("aliases");
    if aliases.is_empty() {
        Ok(directory.with_default_aliases())
    } else {
        Ok(directory.with_aliases(aliases))
    }
}
