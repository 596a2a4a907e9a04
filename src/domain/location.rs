//! Reporting locations.

use std::fmt;

/// Identity of a reporting unit: country code plus optional province.
///
/// `province == None` is the country-level row for that code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationKey {
    pub country_code: String,
    pub province: Option<String>,
}

impl LocationKey {
    pub fn new(country_code: &str, province: Option<&str>) -> Self {
        Self {
            country_code: country_code.to_string(),
            province: province
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.province {
            Some(province) => write!(f, "{}-{}", self.country_code, province),
            None => write!(f, "{}", self.country_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub key: LocationKey,
    pub lat: f64,
    pub long: f64,
}

impl Location {
    pub fn new(key: LocationKey, lat: f64, long: f64) -> Self {
        Self { key, lat, long }
    }

    pub fn country_code(&self) -> &str {
        &self.key.country_code
    }

    pub fn province(&self) -> Option<&str> {
        self.key.province.as_deref()
    }
}
