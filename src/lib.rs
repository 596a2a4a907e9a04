//! covidtrend: COVID-19 case time series and derived epidemiological metrics.
//!
//! Hexagonal architecture: the series engine in [`domain`], collaborator
//! traits in [`ports`], CSV/INI implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
