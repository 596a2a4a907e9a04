//! Country metadata and name-to-code resolution.
//!
//! The alias table is configuration data: upstream names that do not match
//! a metadata display name are mapped by hand, and the mapping is kept
//! verbatim rather than corrected.

use crate::ports::country_port::CountryResolver;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub population: Option<u64>,
}

impl Country {
    pub fn new(code: &str, name: &str, population: Option<u64>) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            population,
        }
    }
}

/// Upstream name exceptions used when no `[aliases]` section is configured.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("Bahamas, The", "BS"),
    ("Cabo Verde", "CV"),
    ("Martinique", "FR"),
    ("Taiwan*", "CN"),
    ("Republic of the Congo", "CG"),
    ("Dem. Rep. Congo", "CG"),
    ("Congo (Brazzaville)", "CG"),
    ("Congo (Kinshasa)", "CG"),
    ("The Bahamas", "BS"),
    ("The Gambia", "GM"),
    ("Gambia, The", "GM"),
    ("US", "US"),
    ("China", "CN"),
    ("Netherlands", "NL"),
    ("Greenland", "DK"),
    ("Czechia", "CZ"),
    ("Cruise Ship", "JP"),
    ("Cote d'Ivoire", "CI"),
    ("Cyprus", "CY"),
    ("Holy See", "VA"),
    ("Korea, South", "KR"),
    ("Kosovo", "RS"),
];

#[derive(Debug, Clone, Default)]
pub struct CountryDirectory {
    by_code: HashMap<String, Country>,
    name_to_code: HashMap<String, String>,
    aliases: HashMap<String, String>,
}

impl CountryDirectory {
    pub fn new(countries: Vec<Country>) -> Self {
        let mut directory = Self::default();
        for country in countries {
            directory
                .name_to_code
                .insert(country.name.clone(), country.code.clone());
            directory.by_code.insert(country.code.clone(), country);
        }
        directory
    }

    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_default_aliases(self) -> Self {
        self.with_aliases(DEFAULT_ALIASES.iter().copied())
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.by_code.get(code)
    }

    pub fn population(&self, code: &str) -> Option<u64> {
        self.get(code).and_then(|c| c.population)
    }

    /// Exact display-name lookup, ignoring aliases.
    pub fn code_for_name(&self, name: &str) -> Option<&str> {
        self.name_to_code.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    pub fn countries(&self) -> Vec<&Country> {
        let mut countries: Vec<&Country> = self.by_code.values().collect();
        countries.sort_by(|a, b| a.code.cmp(&b.code));
        countries
    }
}

impl CountryResolver for CountryDirectory {
    /// Alias first, then display name. A code without metadata does not resolve.
    fn resolve(&self, name: &str) -> Option<String> {
        let name = name.trim();
        let code = match self.aliases.get(name) {
            Some(code) => code.as_str(),
            None => match self.code_for_name(name) {
                Some(code) => code,
                None => {
                    tracing::debug!(name, "no country code for name");
                    return None;
                }
            },
        };
        if !self.by_code.contains_key(code) {
            tracing::debug!(name, code, "country code has no metadata");
            return None;
        }
        Some(code.to_string())
    }
}
