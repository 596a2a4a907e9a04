//! Ingestion of raw rows into per-country, per-location and global series.
//!
//! [`CaseIndexBuilder`] accumulates counts keyed by normalized date string
//! across all three [`CaseKind`] datasets. [`CaseIndexBuilder::finalize`]
//! consumes it and links every map into a [`Series`], producing the
//! read-only [`CaseIndex`].

use crate::domain::case_row::{normalize_date, CaseKind, CaseRow};
use crate::domain::day_record::{Day, DayRecord};
use crate::domain::error::CovidError;
use crate::domain::location::{Location, LocationKey};
use crate::domain::series::{link, Series};
use crate::ports::country_port::CountryResolver;
use crate::ports::data_port::CaseDataPort;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Pseudo country code selecting the global aggregate.
pub const WORLD_CODE: &str = "WORLD";

type DayMap = HashMap<String, DayRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Row resolved; `cells` positive cells were accumulated.
    Ingested { cells: usize },
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub country_region: String,
    pub province: Option<String>,
    pub kind: CaseKind,
}

#[derive(Debug, Default)]
pub struct CaseIndexBuilder {
    countries: HashMap<String, DayMap>,
    global: DayMap,
    locations: HashMap<LocationKey, (Location, DayMap)>,
    dates: BTreeSet<NaiveDate>,
    skipped: Vec<SkippedRow>,
}

impl CaseIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row of the `kind` dataset into the country, global and
    /// location maps.
    ///
    /// Rows whose country cannot be resolved are skipped with a warning.
    /// A row without positive cells touches nothing, so no empty series is
    /// ever created. An unparseable date fails the call before anything is
    /// accumulated. A count overflowing
    /// [`MAX_COUNT`](crate::domain::day_record::MAX_COUNT) fails mid-row; the
    /// builder should then be discarded.
    pub fn ingest(
        &mut self,
        row: &CaseRow,
        kind: CaseKind,
        resolver: &dyn CountryResolver,
    ) -> Result<IngestOutcome, CovidError> {
        let Some(code) = resolver.resolve(&row.country_region) else {
            tracing::warn!(
                country = %row.country_region,
                province = ?row.province,
                %kind,
                "skipping row: country could not be resolved"
            );
            self.skipped.push(SkippedRow {
                country_region: row.country_region.clone(),
                province: row.province.clone(),
                kind,
            });
            return Ok(IngestOutcome::Skipped);
        };

        let cells = row.positive_cells()?;
        if cells.is_empty() {
            return Ok(IngestOutcome::Ingested { cells: 0 });
        }

        let key = LocationKey::new(&code, row.province.as_deref());
        let (_, location_map) = self
            .locations
            .entry(key.clone())
            .or_insert_with(|| (Location::new(key, row.lat, row.long), DayMap::new()));
        let country_map = self.countries.entry(code).or_default();

        for &(date, value) in &cells {
            let date_key = normalize_date(date);
            accumulate(&mut self.global, &date_key, date, kind, value)?;
            accumulate(country_map, &date_key, date, kind, value)?;
            accumulate(location_map, &date_key, date, kind, value)?;
            self.dates.insert(date);
        }

        Ok(IngestOutcome::Ingested { cells: cells.len() })
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Link every accumulated map. Ingestion ends here.
    pub fn finalize(self) -> CaseIndex {
        let countries: BTreeMap<String, Series> = self
            .countries
            .into_iter()
            .map(|(code, days)| (code, link(days.into_values().collect())))
            .collect();
        let global = link(self.global.into_values().collect());
        let locations: BTreeMap<LocationKey, LocationSeries> = self
            .locations
            .into_iter()
            .map(|(key, (location, days))| {
                let series = link(days.into_values().collect());
                (key, LocationSeries { location, series })
            })
            .collect();

        tracing::info!(
            countries = countries.len(),
            locations = locations.len(),
            days = global.len(),
            skipped = self.skipped.len(),
            "case index finalized"
        );

        CaseIndex {
            countries,
            global,
            locations,
            dates: self.dates.into_iter().collect(),
            skipped: self.skipped,
        }
    }
}

fn accumulate(
    map: &mut DayMap,
    key: &str,
    date: NaiveDate,
    kind: CaseKind,
    value: u64,
) -> Result<(), CovidError> {
    if let Some(record) = map.get_mut(key) {
        return record.add(kind, value);
    }
    let mut record = DayRecord::new(date);
    record.add(kind, value)?;
    map.insert(key.to_string(), record);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationSeries {
    pub location: Location,
    pub series: Series,
}

/// Finalized, read-only view over all series.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseIndex {
    countries: BTreeMap<String, Series>,
    global: Series,
    locations: BTreeMap<LocationKey, LocationSeries>,
    dates: Vec<NaiveDate>,
    skipped: Vec<SkippedRow>,
}

impl CaseIndex {
    pub fn has_country(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    /// Known country codes in ascending order.
    pub fn country_codes(&self) -> Vec<&str> {
        self.countries.keys().map(String::as_str).collect()
    }

    pub fn country(&self, code: &str) -> Result<&Series, CovidError> {
        self.countries
            .get(code)
            .ok_or_else(|| CovidError::CountryNotFound {
                code: code.to_string(),
            })
    }

    pub fn global(&self) -> &Series {
        &self.global
    }

    /// Country series, or the global one for [`WORLD_CODE`].
    pub fn series(&self, code: &str) -> Result<&Series, CovidError> {
        if code == WORLD_CODE {
            return Ok(&self.global);
        }
        self.country(code)
    }

    pub fn location(&self, key: &LocationKey) -> Result<&Series, CovidError> {
        self.locations
            .get(key)
            .map(|ls| &ls.series)
            .ok_or_else(|| CovidError::LocationNotFound {
                location: key.to_string(),
            })
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> + '_ {
        self.locations.values().map(|ls| &ls.location)
    }

    pub fn locations_for(&self, code: &str) -> Vec<&LocationSeries> {
        self.locations
            .values()
            .filter(|ls| ls.location.country_code() == code)
            .collect()
    }

    pub fn location_series(&self) -> impl Iterator<Item = &LocationSeries> + '_ {
        self.locations.values()
    }

    /// Record for `code` on the normalized `date_key`; `Ok(None)` when the
    /// country has no data for that date.
    pub fn day(&self, code: &str, date_key: &str) -> Result<Option<Day<'_>>, CovidError> {
        Ok(self.series(code)?.get_by_key(date_key))
    }

    pub fn last_day(&self, code: &str) -> Result<Option<Day<'_>>, CovidError> {
        Ok(self.series(code)?.last())
    }

    /// Every date that carried a positive count anywhere, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }
}

/// Fetch all three datasets, ingest every row and finalize.
///
/// Any ingest error aborts the load.
pub fn load_index(
    data_port: &dyn CaseDataPort,
    resolver: &dyn CountryResolver,
) -> Result<CaseIndex, CovidError> {
    let mut builder = CaseIndexBuilder::new();
    for kind in CaseKind::ALL {
        let rows = data_port.fetch_rows(kind)?;
        tracing::debug!(%kind, rows = rows.len(), "ingesting dataset");
        for row in &rows {
            builder.ingest(row, kind, resolver)?;
        }
    }
    Ok(builder.finalize())
}
