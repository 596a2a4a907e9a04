//! Report generation port trait.

use crate::domain::error::CovidError;
use crate::domain::metrics::Metric;
use crate::domain::series::Series;

/// Smoothing applied to each reported metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smoothing {
    pub radius: usize,
    /// Forces zero exclusion for every metric, on top of
    /// [`Metric::smoothing_excludes_zero`].
    pub exclude_zero: bool,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            radius: 3,
            exclude_zero: false,
        }
    }
}

/// Port for writing per-day metric reports.
pub trait ReportPort {
    fn write(
        &self,
        series: &Series,
        metrics: &[Metric],
        smoothing: Smoothing,
        output_path: &str,
    ) -> Result<(), CovidError>;
}
