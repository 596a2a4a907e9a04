//! Raw wide-format case rows and report date handling.
//!
//! A row describes one location for one [`CaseKind`]; every column past the
//! location columns is a report date holding the cumulative count.

use crate::domain::day_record::MAX_COUNT;
use crate::domain::error::CovidError;
use chrono::NaiveDate;
use std::fmt;

/// Short-year format used by the upstream time series headers.
pub const SHORT_YEAR_FORMAT: &str = "%m/%d/%y";
/// Long-year fallback.
pub const LONG_YEAR_FORMAT: &str = "%m/%d/%Y";
/// Canonical key format for series maps.
pub const KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    Confirmed,
    Recovered,
    Deaths,
}

impl CaseKind {
    /// Ingestion order. Accumulation is order independent, this only fixes
    /// the order in which datasets are fetched.
    pub const ALL: [CaseKind; 3] = [CaseKind::Confirmed, CaseKind::Recovered, CaseKind::Deaths];
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseKind::Confirmed => write!(f, "confirmed"),
            CaseKind::Recovered => write!(f, "recovered"),
            CaseKind::Deaths => write!(f, "deaths"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseRow {
    /// Country/region name as reported upstream, resolved to a code on ingest.
    pub country_region: String,
    pub province: Option<String>,
    pub lat: f64,
    pub long: f64,
    /// `(date header, raw cell)` in column order.
    pub cells: Vec<(String, String)>,
}

impl CaseRow {
    pub fn new(country_region: &str, province: Option<&str>) -> Self {
        Self {
            country_region: country_region.to_string(),
            province: province
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            lat: 0.0,
            long: 0.0,
            cells: Vec::new(),
        }
    }

    pub fn with_coordinates(mut self, lat: f64, long: f64) -> Self {
        self.lat = lat;
        self.long = long;
        self
    }

    pub fn with_cell(mut self, date: &str, value: &str) -> Self {
        self.cells.push((date.to_string(), value.to_string()));
        self
    }

    /// Positive cells with parsed dates, in column order.
    ///
    /// Fails on the first positive cell whose date header cannot be parsed.
    /// Zero, empty and non-numeric cells are skipped before the date is
    /// looked at, so a row with no data never fails.
    pub fn positive_cells(&self) -> Result<Vec<(NaiveDate, u64)>, CovidError> {
        let mut out = Vec::with_capacity(self.cells.len());
        for (header, raw) in &self.cells {
            let Some(value) = parse_count(raw) else {
                let unusable = raw
                    .trim()
                    .parse::<f64>()
                    .map_or(true, |v| !v.is_finite() || v >= MAX_COUNT as f64);
                if !raw.trim().is_empty() && unusable {
                    tracing::debug!(
                        country = %self.country_region,
                        date = %header,
                        cell = %raw,
                        "ignoring non-numeric or out-of-range cell"
                    );
                }
                continue;
            };
            out.push((parse_report_date(header)?, value));
        }
        Ok(out)
    }
}

/// Parse a report date header, preferring `M/D/YY` and falling back to `M/D/YYYY`.
pub fn parse_report_date(value: &str) -> Result<NaiveDate, CovidError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, SHORT_YEAR_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, LONG_YEAR_FORMAT))
        .map_err(|_| CovidError::DateParse {
            value: value.to_string(),
        })
}

pub fn normalize_date(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), KEY_FORMAT).ok()
}

/// A strictly positive cumulative count, or `None` for "no data yet".
///
/// Values at or past [`MAX_COUNT`] are not counts and read as `None`.
pub fn parse_count(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value >= MAX_COUNT as f64 {
        return None;
    }
    let count = value.round() as u64;
    (count > 0).then_some(count)
}
