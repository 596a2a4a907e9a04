//! Concrete adapter implementations for ports.

pub mod country_csv_adapter;
pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
