//! Chronologically linked per-location series.

use crate::domain::case_row::parse_date_key;
use crate::domain::day_record::{Day, DayRecord};
use chrono::NaiveDate;
use std::collections::HashMap;

/// A sorted, linked, read-only run of [`DayRecord`]s.
///
/// Array order and link order always agree: record `i` links to `i - 1`
/// and `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    records: Vec<DayRecord>,
    date_index: HashMap<NaiveDate, usize>,
}

/// Sort `records` by date and link them into a [`Series`].
///
/// Any links already present are overwritten, so relinking the records of a
/// linked series yields the same series.
pub fn link(mut records: Vec<DayRecord>) -> Series {
    records.sort_by_key(|r| r.date);
    let len = records.len();
    for (i, record) in records.iter_mut().enumerate() {
        record.previous = i.checked_sub(1);
        record.next = (i + 1 < len).then_some(i + 1);
    }
    let date_index = records
        .iter()
        .enumerate()
        .map(|(i, record)| (record.date, i))
        .collect();
    Series {
        records,
        date_index,
    }
}

impl Series {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<DayRecord> {
        self.records
    }

    pub fn day(&self, index: usize) -> Option<Day<'_>> {
        (index < self.records.len()).then(|| Day::new(self, index))
    }

    pub fn first(&self) -> Option<Day<'_>> {
        self.day(0)
    }

    pub fn last(&self) -> Option<Day<'_>> {
        self.records.len().checked_sub(1).and_then(|i| self.day(i))
    }

    pub fn get(&self, date: NaiveDate) -> Option<Day<'_>> {
        self.date_index.get(&date).map(|&i| Day::new(self, i))
    }

    /// Look up by normalized `YYYY-MM-DD` key.
    pub fn get_by_key(&self, key: &str) -> Option<Day<'_>> {
        parse_date_key(key).and_then(|date| self.get(date))
    }

    pub fn days(&self) -> impl Iterator<Item = Day<'_>> + '_ {
        (0..self.records.len()).map(move |i| Day::new(self, i))
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.first()?.date(), self.last()?.date()))
    }
}
