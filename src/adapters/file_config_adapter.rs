//! INI file configuration adapter.
//!
//! Keys are case sensitive: the `[aliases]` section maps upstream country
//! names verbatim.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new_cs();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new_cs();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }

    fn get_section(&self, section: &str) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .config
            .get_map_ref()
            .get(section)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const SAMPLE: &str = r#"
[data]
confirmed = data/time_series_covid19_confirmed_global.csv
deaths = data/time_series_covid19_deaths_global.csv
countries = data/countries.csv

[metrics]
window_radius = 7
exclude_zero = yes

[aliases]
Korea, South = KR
Taiwan* = CN
Cote d'Ivoire = CI
"#;

    #[test]
    fn from_string_parses_config() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("data", "countries"),
            Some("data/countries.csv".to_string())
        );
        assert_eq!(adapter.get_int("metrics", "window_radius", 0), 7);
        assert!(adapter.get_bool("metrics", "exclude_zero", false));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nconfirmed = c.csv\n").unwrap();
        assert_eq!(adapter.get_string("data", "recovered"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[metrics]\nwindow_radius = wide\n").unwrap();
        assert_eq!(adapter.get_int("metrics", "window_radius", 3), 3);
    }

    #[test]
    fn get_bool_values() {
        let adapter =
            FileConfigAdapter::from_string("[metrics]\na = true\nb = no\nc = maybe\n").unwrap();
        assert!(adapter.get_bool("metrics", "a", false));
        assert!(!adapter.get_bool("metrics", "b", true));
        assert!(adapter.get_bool("metrics", "c", true));
    }

    #[test]
    fn get_section_keeps_key_case() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        let aliases = adapter.get_section("aliases");
        assert_eq!(
            aliases,
            vec![
                ("Cote d'Ivoire".to_string(), "CI".to_string()),
                ("Korea, South".to_string(), "KR".to_string()),
                ("Taiwan*".to_string(), "CN".to_string()),
            ]
        );
        assert!(adapter.get_section("missing").is_empty());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "confirmed"),
            Some("data/time_series_covid19_confirmed_global.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
