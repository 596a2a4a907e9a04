//! Core domain types and the series derivation engine.

pub mod case_row;
pub mod day_record;
pub mod series;
pub mod metrics;
pub mod location;
pub mod country;
pub mod aggregation;
pub mod config_validation;
pub mod error;
