//! Per-day metric report written as CSV.

use crate::domain::day_record::Day;
use crate::domain::error::CovidError;
use crate::domain::metrics::Metric;
use crate::domain::series::Series;
use crate::ports::report_port::{ReportPort, Smoothing};

pub struct CsvReportAdapter;

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        series: &Series,
        metrics: &[Metric],
        smoothing: Smoothing,
        output_path: &str,
    ) -> Result<(), CovidError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| CovidError::DataLoad {
            reason: format!("failed to create {}: {}", output_path, e),
        })?;
        let write_err = |e: csv::Error| CovidError::DataLoad {
            reason: format!("failed to write {}: {}", output_path, e),
        };

        wtr.write_record(report_header(metrics))
            .map_err(write_err)?;
        for day in series.days() {
            wtr.write_record(report_row(&day, metrics, smoothing))
                .map_err(write_err)?;
        }
        wtr.flush()?;

        tracing::info!(rows = series.len(), path = output_path, "report written");
        Ok(())
    }
}

/// `date`, then each metric, then each metric's centered average.
pub fn report_header(metrics: &[Metric]) -> Vec<String> {
    let mut header = Vec::with_capacity(1 + 2 * metrics.len());
    header.push("date".to_string());
    header.extend(metrics.iter().map(|m| m.name().to_string()));
    header.extend(metrics.iter().map(|m| format!("{}_avg", m.name())));
    header
}

pub fn report_row(day: &Day<'_>, metrics: &[Metric], smoothing: Smoothing) -> Vec<String> {
    let mut row = Vec::with_capacity(1 + 2 * metrics.len());
    row.push(day.date().format("%Y-%m-%d").to_string());
    row.extend(metrics.iter().map(|m| format_cell(m.value(day))));
    row.extend(metrics.iter().map(|&m| {
        let exclude_zero = smoothing.exclude_zero || m.smoothing_excludes_zero();
        format_cell(day.moving_average_centered(|d| m.value(d), smoothing.radius, exclude_zero))
    }));
    row
}

/// Absent values become empty cells.
pub fn format_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => format!("{:.6}", v),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::day_record::DayRecord;
    use crate::domain::series::link;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn series(confirmed: &[u64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        link(
            confirmed
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    DayRecord::with_counts(start + chrono::Days::new(i as u64), c, 0, 0)
                })
                .collect(),
        )
    }

    #[test]
    fn header_lists_values_then_averages() {
        assert_eq!(
            report_header(&[Metric::Confirmed, Metric::Growth]),
            vec!["date", "confirmed", "growth", "confirmed_avg", "growth_avg"]
        );
    }

    #[test]
    fn format_cell_variants() {
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(12.0)), "12");
        assert_eq!(format_cell(Some(-3.0)), "-3");
        assert_eq!(format_cell(Some(0.5)), "0.500000");
    }

    #[test]
    fn first_row_has_no_growth() {
        let s = series(&[1, 3, 6]);
        let smoothing = Smoothing {
            radius: 1,
            exclude_zero: false,
        };
        let first = report_row(&s.first().unwrap(), &[Metric::Growth], smoothing);
        assert_eq!(first, vec!["2020-03-01", "", ""]);

        let middle = report_row(&s.day(1).unwrap(), &[Metric::Confirmed], smoothing);
        // (1 + 2*3 + 6) / 4
        assert_eq!(middle, vec!["2020-03-02", "3", "3.250000"]);
    }

    #[test]
    fn writes_csv_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");
        let s = series(&[1, 3, 6]);

        CsvReportAdapter
            .write(
                &s,
                &[Metric::Confirmed, Metric::Growth],
                Smoothing {
                    radius: 1,
                    exclude_zero: false,
                },
                path.to_str().unwrap(),
            )
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "date,confirmed,growth,confirmed_avg,growth_avg");
        assert_eq!(lines[1], "2020-03-01,1,,,");
        assert_eq!(lines[2], "2020-03-02,3,2,3.250000,");
        assert_eq!(lines[3], "2020-03-03,6,3,,");
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let s = series(&[1]);
        let err = CsvReportAdapter
            .write(
                &s,
                &[Metric::Confirmed],
                Smoothing::default(),
                "/nonexistent/dir/report.csv",
            )
            .unwrap_err();
        assert!(matches!(err, CovidError::DataLoad { .. }));
    }
}
