//! Configuration validation.
//!
//! Checks the INI config before any data file is opened.

use crate::domain::error::CovidError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_WINDOW_RADIUS: usize = 3;
pub const MAX_WINDOW_RADIUS: i64 = 60;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), CovidError> {
    validate_data_paths(config)?;
    validate_window_radius(config)?;
    validate_exclude_zero(config)?;
    validate_aliases(config)?;
    Ok(())
}

fn validate_data_paths(config: &dyn ConfigPort) -> Result<(), CovidError> {
    for key in ["confirmed", "deaths", "countries"] {
        match config.get_string("data", key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => {
                return Err(CovidError::ConfigMissing {
                    section: "data".to_string(),
                    key: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn validate_window_radius(config: &dyn ConfigPort) -> Result<(), CovidError> {
    let Some(raw) = config.get_string("metrics", "window_radius") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if (0..=MAX_WINDOW_RADIUS).contains(&v) => Ok(()),
        _ => Err(CovidError::ConfigInvalid {
            section: "metrics".to_string(),
            key: "window_radius".to_string(),
            reason: format!("window_radius must be an integer between 0 and {MAX_WINDOW_RADIUS}"),
        }),
    }
}

fn validate_exclude_zero(config: &dyn ConfigPort) -> Result<(), CovidError> {
    let Some(raw) = config.get_string("metrics", "exclude_zero") else {
        return Ok(());
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "false" | "no" | "0" => Ok(()),
        _ => Err(CovidError::ConfigInvalid {
            section: "metrics".to_string(),
            key: "exclude_zero".to_string(),
            reason: "exclude_zero must be a boolean".to_string(),
        }),
    }
}

fn validate_aliases(config: &dyn ConfigPort) -> Result<(), CovidError> {
    for (name, code) in config.get_section("aliases") {
        if code.trim().is_empty() {
            return Err(CovidError::ConfigInvalid {
                section: "aliases".to_string(),
                key: name,
                reason: "alias must map to a country code".to_string(),
            });
        }
    }
    Ok(())
}

/// `[metrics] window_radius`, falling back to [`DEFAULT_WINDOW_RADIUS`].
pub fn window_radius(config: &dyn ConfigPort) -> usize {
    let radius = config.get_int("metrics", "window_radius", DEFAULT_WINDOW_RADIUS as i64);
    radius.clamp(0, MAX_WINDOW_RADIUS) as usize
}
