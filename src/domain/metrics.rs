//! Derived epidemiological metrics on a linked [`Day`].
//!
//! Every accessor is pure. `None` means "not computable" (missing links or
//! an absent prerequisite) and is never coerced to `0.0`; zero is only
//! returned for genuine zero results such as a death rate with no cases.

use crate::domain::day_record::Day;
use crate::domain::error::CovidError;
use std::fmt;
use std::str::FromStr;

/// Trailing window, in link hops, of the net reproduction number.
pub const INFECTIOUS_DAYS: usize = 14;

impl<'a> Day<'a> {
    /// confirmed - recovered - deaths
    ///
    /// Counts are capped at [`MAX_COUNT`](crate::domain::day_record::MAX_COUNT),
    /// so the casts are exact; the subtraction saturates.
    pub fn pending(&self) -> i64 {
        (self.confirmed() as i64)
            .saturating_sub(self.recovered() as i64)
            .saturating_sub(self.deaths() as i64)
    }

    /// deaths / confirmed, `0` when nothing is confirmed.
    pub fn death_rate(&self) -> f64 {
        if self.confirmed() == 0 {
            return 0.0;
        }
        self.deaths() as f64 / self.confirmed() as f64
    }

    /// recovered / confirmed, `0` when nothing is confirmed.
    pub fn recovered_rate(&self) -> f64 {
        if self.confirmed() == 0 {
            return 0.0;
        }
        self.recovered() as f64 / self.confirmed() as f64
    }

    pub fn growth(&self) -> Option<i64> {
        let previous = self.previous()?;
        Some(self.confirmed() as i64 - previous.confirmed() as i64)
    }

    pub fn pending_growth(&self) -> Option<i64> {
        let previous = self.previous()?;
        Some(self.pending() - previous.pending())
    }

    pub fn death_growth(&self) -> Option<i64> {
        let previous = self.previous()?;
        Some(self.deaths() as i64 - previous.deaths() as i64)
    }

    pub fn recovered_growth(&self) -> Option<i64> {
        let previous = self.previous()?;
        Some(self.recovered() as i64 - previous.recovered() as i64)
    }

    /// growth - previous.growth
    pub fn growth_change(&self) -> Option<i64> {
        let previous = self.previous()?;
        Some(self.growth()? - previous.growth()?)
    }

    /// growth / previous.growth, `0` when yesterday saw no growth.
    pub fn growth_change_rate(&self) -> Option<f64> {
        let previous = self.previous()?;
        let last_growth = previous.growth()?;
        if last_growth == 0 {
            return Some(0.0);
        }
        Some(self.growth()? as f64 / last_growth as f64)
    }

    /// Relative day-over-day change in pending cases.
    pub fn growth_percentage(&self) -> Option<f64> {
        let previous = self.previous()?;
        let last_pending = previous.pending();
        if last_pending == 0 {
            return Some(0.0);
        }
        Some((self.pending() - last_pending) as f64 / last_pending as f64)
    }

    pub fn growth_percentage_change(&self) -> Option<f64> {
        let previous = self.previous()?;
        Some(self.growth_percentage()? - previous.growth_percentage()?)
    }

    /// New confirmed cases over the pending caseload [`INFECTIOUS_DAYS`]
    /// hops back, clamped at zero.
    pub fn net_reproduction_number(&self) -> Option<f64> {
        let past = self.get_previous(INFECTIOUS_DAYS)?;
        let past_pending = past.pending();
        if past_pending == 0 {
            return Some(0.0);
        }
        let new_cases = self.confirmed() as f64 - past.confirmed() as f64;
        Some((new_cases / past_pending as f64).max(0.0))
    }

    /// Pending cases as a share of `population`, `None` without a positive
    /// population.
    pub fn pending_per_capita(&self, population: Option<u64>) -> Option<f64> {
        let population = population.filter(|&p| p > 0)?;
        Some(self.pending() as f64 / population as f64)
    }

    /// Linearly weighted average centered on this record.
    ///
    /// The center weighs `radius + 1`, the records `k` hops away on each side
    /// weigh `radius + 1 - k`. Near either end of the series there is no full
    /// window and the result is `None`. With `exclude_zero`, a sampled value
    /// of exactly `0` also yields `None`.
    pub fn moving_average_centered<F>(
        &self,
        accessor: F,
        radius: usize,
        exclude_zero: bool,
    ) -> Option<f64>
    where
        F: Fn(&Day<'a>) -> Option<f64>,
    {
        let sample = |day: &Day<'a>| accessor(day).filter(|&v| !(exclude_zero && v == 0.0));

        let center_weight = (radius + 1) as f64;
        let mut weighted_sum = sample(self)? * center_weight;
        let mut weight_sum = center_weight;

        let mut back = *self;
        let mut forward = *self;
        for i in 0..radius {
            back = back.previous()?;
            forward = forward.next()?;
            let weight = (radius - i) as f64;
            weighted_sum += weight * (sample(&back)? + sample(&forward)?);
            weight_sum += 2.0 * weight;
        }

        Some(weighted_sum / weight_sum)
    }

    /// Linearly weighted average over this record and `window` records back.
    ///
    /// This record weighs `window + 1`, decaying by one per hop. `None` when
    /// fewer than `window` earlier records exist.
    pub fn moving_average<F>(&self, accessor: F, window: usize) -> Option<f64>
    where
        F: Fn(&Day<'a>) -> Option<f64>,
    {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut current = *self;
        for k in 0..=window {
            if k > 0 {
                current = current.previous()?;
            }
            let weight = (window + 1 - k) as f64;
            weighted_sum += weight * accessor(&current)?;
            weight_sum += weight;
        }
        Some(weighted_sum / weight_sum)
    }

    /// Median of this record and `radius` records on each side.
    ///
    /// Same full-window and zero-exclusion rules as
    /// [`Day::moving_average_centered`].
    pub fn moving_median_centered<F>(
        &self,
        accessor: F,
        radius: usize,
        exclude_zero: bool,
    ) -> Option<f64>
    where
        F: Fn(&Day<'a>) -> Option<f64>,
    {
        let sample = |day: &Day<'a>| accessor(day).filter(|&v| !(exclude_zero && v == 0.0));

        let mut values = Vec::with_capacity(2 * radius + 1);
        values.push(sample(self)?);
        for k in 1..=radius {
            values.push(sample(&self.get_previous(k)?)?);
            values.push(sample(&self.get_next(k)?)?);
        }
        median(&mut values)
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Named per-day metric, usable as a moving-average accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Confirmed,
    Recovered,
    Deaths,
    Pending,
    DeathRate,
    RecoveredRate,
    Growth,
    PendingGrowth,
    DeathGrowth,
    RecoveredGrowth,
    GrowthChange,
    GrowthChangeRate,
    GrowthPercentage,
    GrowthPercentageChange,
    NetReproductionNumber,
}

impl Metric {
    pub const ALL: [Metric; 15] = [
        Metric::Confirmed,
        Metric::Recovered,
        Metric::Deaths,
        Metric::Pending,
        Metric::DeathRate,
        Metric::RecoveredRate,
        Metric::Growth,
        Metric::PendingGrowth,
        Metric::DeathGrowth,
        Metric::RecoveredGrowth,
        Metric::GrowthChange,
        Metric::GrowthChangeRate,
        Metric::GrowthPercentage,
        Metric::GrowthPercentageChange,
        Metric::NetReproductionNumber,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Recovered => "recovered",
            Metric::Deaths => "deaths",
            Metric::Pending => "pending",
            Metric::DeathRate => "death-rate",
            Metric::RecoveredRate => "recovered-rate",
            Metric::Growth => "growth",
            Metric::PendingGrowth => "pending-growth",
            Metric::DeathGrowth => "death-growth",
            Metric::RecoveredGrowth => "recovered-growth",
            Metric::GrowthChange => "growth-change",
            Metric::GrowthChangeRate => "growth-change-rate",
            Metric::GrowthPercentage => "growth-percentage",
            Metric::GrowthPercentageChange => "growth-percentage-change",
            Metric::NetReproductionNumber => "net-reproduction-number",
        }
    }

    pub fn value(self, day: &Day<'_>) -> Option<f64> {
        match self {
            Metric::Confirmed => Some(day.confirmed() as f64),
            Metric::Recovered => Some(day.recovered() as f64),
            Metric::Deaths => Some(day.deaths() as f64),
            Metric::Pending => Some(day.pending() as f64),
            Metric::DeathRate => Some(day.death_rate()),
            Metric::RecoveredRate => Some(day.recovered_rate()),
            Metric::Growth => day.growth().map(|v| v as f64),
            Metric::PendingGrowth => day.pending_growth().map(|v| v as f64),
            Metric::DeathGrowth => day.death_growth().map(|v| v as f64),
            Metric::RecoveredGrowth => day.recovered_growth().map(|v| v as f64),
            Metric::GrowthChange => day.growth_change().map(|v| v as f64),
            Metric::GrowthChangeRate => day.growth_change_rate(),
            Metric::GrowthPercentage => day.growth_percentage(),
            Metric::GrowthPercentageChange => day.growth_percentage_change(),
            Metric::NetReproductionNumber => day.net_reproduction_number(),
        }
    }

    /// Cumulative counts other than confirmed show reporting gaps as zero;
    /// smoothing skips windows that touch one.
    pub fn smoothing_excludes_zero(self) -> bool {
        matches!(self, Metric::Recovered | Metric::Deaths | Metric::Pending)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = CovidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| CovidError::UnknownMetric {
                name: s.to_string(),
            })
    }
}
