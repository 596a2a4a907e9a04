//! Per-date cumulative counts and link navigation.
//!
//! A [`DayRecord`] is plain data owned by a [`Series`]; its `previous`/`next`
//! slots are indices into that series, written only by [`crate::domain::series::link`].
//! [`Day`] is the read-only cursor handed to consumers: it pairs a record
//! with the series it lives in so links can be followed.

use crate::domain::case_row::CaseKind;
use crate::domain::error::CovidError;
use crate::domain::series::Series;
use chrono::NaiveDate;
use std::fmt;

/// Largest cumulative count a record holds, so signed differences between
/// counts never wrap.
pub const MAX_COUNT: u64 = i64::MAX as u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub confirmed: u64,
    pub recovered: u64,
    pub deaths: u64,
    pub(crate) previous: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl DayRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            confirmed: 0,
            recovered: 0,
            deaths: 0,
            previous: None,
            next: None,
        }
    }

    pub fn with_counts(date: NaiveDate, confirmed: u64, recovered: u64, deaths: u64) -> Self {
        Self {
            confirmed,
            recovered,
            deaths,
            ..Self::new(date)
        }
    }

    /// Accumulate `value` into the field selected by `kind`.
    ///
    /// Fails when the total would exceed [`MAX_COUNT`]; the record is left
    /// unchanged.
    pub fn add(&mut self, kind: CaseKind, value: u64) -> Result<(), CovidError> {
        let field = match kind {
            CaseKind::Confirmed => &mut self.confirmed,
            CaseKind::Recovered => &mut self.recovered,
            CaseKind::Deaths => &mut self.deaths,
        };
        *field = field
            .checked_add(value)
            .filter(|&total| total <= MAX_COUNT)
            .ok_or_else(|| CovidError::DataLoad {
                reason: format!("{} count on {} exceeds {}", kind, self.date, MAX_COUNT),
            })?;
        Ok(())
    }

    pub fn count(&self, kind: CaseKind) -> u64 {
        match kind {
            CaseKind::Confirmed => self.confirmed,
            CaseKind::Recovered => self.recovered,
            CaseKind::Deaths => self.deaths,
        }
    }

    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }
}

/// A record viewed through its series.
#[derive(Clone, Copy)]
pub struct Day<'a> {
    series: &'a Series,
    index: usize,
}

impl<'a> Day<'a> {
    pub(crate) fn new(series: &'a Series, index: usize) -> Self {
        Self { series, index }
    }

    pub fn record(&self) -> &'a DayRecord {
        &self.series.records()[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn date(&self) -> NaiveDate {
        self.record().date
    }

    pub fn confirmed(&self) -> u64 {
        self.record().confirmed
    }

    pub fn recovered(&self) -> u64 {
        self.record().recovered
    }

    pub fn deaths(&self) -> u64 {
        self.record().deaths
    }

    pub fn previous(&self) -> Option<Day<'a>> {
        self.record().previous.map(|i| Day::new(self.series, i))
    }

    pub fn next(&self) -> Option<Day<'a>> {
        self.record().next.map(|i| Day::new(self.series, i))
    }

    /// The record `n` link hops back, `None` if the chain is shorter.
    ///
    /// Hops follow links, not the calendar: a gap in the input is one hop.
    pub fn get_previous(&self, n: usize) -> Option<Day<'a>> {
        let mut current = *self;
        for _ in 0..n {
            current = current.previous()?;
        }
        Some(current)
    }

    /// The record `n` link hops forward, `None` if the chain is shorter.
    pub fn get_next(&self, n: usize) -> Option<Day<'a>> {
        let mut current = *self;
        for _ in 0..n {
            current = current.next()?;
        }
        Some(current)
    }
}

impl PartialEq for Day<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.series, other.series) && self.index == other.index
    }
}

impl Eq for Day<'_> {}

impl fmt::Debug for Day<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.record();
        f.debug_struct("Day")
            .field("index", &self.index)
            .field("date", &r.date)
            .field("confirmed", &r.confirmed)
            .field("recovered", &r.recovered)
            .field("deaths", &r.deaths)
            .finish()
    }
}
