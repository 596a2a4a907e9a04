//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::country_csv_adapter::load_directory;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::{
    format_cell, report_header, report_row, CsvReportAdapter,
};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregation::{load_index, CaseIndex, WORLD_CODE};
use crate::domain::config_validation::{validate_config, window_radius};
use crate::domain::country::CountryDirectory;
use crate::domain::error::CovidError;
use crate::domain::metrics::Metric;
use crate::domain::series::Series;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{ReportPort, Smoothing};

/// Metrics shown when no `--metric` is given.
pub const DEFAULT_METRICS: [Metric; 4] = [
    Metric::Confirmed,
    Metric::Growth,
    Metric::Pending,
    Metric::NetReproductionNumber,
];

#[derive(Parser, Debug)]
#[command(name = "covidtrend", about = "COVID-19 case trend analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List countries with data
    Countries {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print per-day metrics for a country (or WORLD)
    Show {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        country: String,
        #[arg(short, long = "metric")]
        metrics: Vec<String>,
        #[arg(short, long)]
        window: Option<usize>,
    },
    /// List reporting locations
    Locations {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        country: Option<String>,
    },
    /// Write a per-day metric report as CSV
    Export {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        country: String,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long = "metric")]
        metrics: Vec<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Countries { config } => run_countries(&config),
        Command::Show {
            config,
            country,
            metrics,
            window,
        } => run_show(&config, &country, &metrics, window),
        Command::Locations { config, country } => run_locations(&config, country.as_deref()),
        Command::Export {
            config,
            country,
            output,
            metrics,
        } => run_export(&config, &country, &output, &metrics),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = CovidError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Directory that relative `[data]` paths are resolved against.
pub fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Country metadata plus the finalized case index.
pub struct Dataset {
    pub directory: CountryDirectory,
    pub index: CaseIndex,
}

pub fn load_dataset(config: &dyn ConfigPort, base_dir: &Path) -> Result<Dataset, CovidError> {
    validate_config(config)?;
    let directory = load_directory(config, base_dir)?;
    let data_port = CsvAdapter::from_config(config, base_dir)?;
    let index = load_index(&data_port, &directory)?;
    Ok(Dataset { directory, index })
}

pub fn parse_metrics(names: &[String]) -> Result<Vec<Metric>, CovidError> {
    if names.is_empty() {
        return Ok(DEFAULT_METRICS.to_vec());
    }
    names.iter().map(|n| n.parse()).collect()
}

pub fn smoothing(config: &dyn ConfigPort, window_override: Option<usize>) -> Smoothing {
    Smoothing {
        radius: window_override.unwrap_or_else(|| window_radius(config)),
        exclude_zero: config.get_bool("metrics", "exclude_zero", false),
    }
}

/// One line per country: code, name, latest confirmed and pending per capita.
/// A zero share is left blank. The global series is listed last as `WORLD`.
pub fn country_lines(dataset: &Dataset) -> Vec<String> {
    let mut lines: Vec<String> = dataset
        .index
        .country_codes()
        .into_iter()
        .map(|code| {
            let name = dataset
                .directory
                .get(code)
                .map(|c| c.name.as_str())
                .unwrap_or(code);
            let population = dataset.directory.population(code);
            let last = dataset.index.series(code).ok().and_then(Series::last);
            let confirmed = last.map(|d| d.confirmed()).unwrap_or(0);
            let per_capita = last
                .and_then(|d| d.pending_per_capita(population))
                .filter(|&share| share != 0.0);
            format!("{}\t{}\t{}\t{}", code, name, confirmed, format_cell(per_capita))
        })
        .collect();

    let world = dataset.index.global().last();
    lines.push(format!(
        "{}\tWorld\t{}\t",
        WORLD_CODE,
        world.map(|d| d.confirmed()).unwrap_or(0)
    ));
    lines
}

/// Tab-separated table with the same columns as the CSV report.
pub fn table_lines(series: &Series, metrics: &[Metric], smoothing: Smoothing) -> Vec<String> {
    let mut lines = Vec::with_capacity(series.len() + 1);
    lines.push(report_header(metrics).join("\t"));
    lines.extend(
        series
            .days()
            .map(|day| report_row(&day, metrics, smoothing).join("\t")),
    );
    lines
}

pub fn location_lines(index: &CaseIndex, country: Option<&str>) -> Vec<String> {
    index
        .location_series()
        .filter(|ls| country.is_none_or(|c| ls.location.country_code() == c))
        .map(|ls| {
            format!(
                "{}\t{}\t{:.4}\t{:.4}\t{}",
                ls.location.country_code(),
                ls.location.province().unwrap_or("-"),
                ls.location.lat,
                ls.location.long,
                ls.series.len(),
            )
        })
        .collect()
}

fn load(config_path: &Path) -> Result<(FileConfigAdapter, Dataset), ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    let dataset = load_dataset(&config, &base_dir(config_path)).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })?;

    let skipped = dataset.index.skipped().len();
    if skipped > 0 {
        eprintln!("warning: skipped {} rows with unknown countries", skipped);
    }
    eprintln!(
        "Loaded {} countries over {} dates",
        dataset.index.country_codes().len(),
        dataset.index.dates().len()
    );
    Ok((config, dataset))
}

fn run_countries(config_path: &Path) -> ExitCode {
    let (_, dataset) = match load(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };
    for line in country_lines(&dataset) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

fn run_show(
    config_path: &Path,
    country: &str,
    metric_names: &[String],
    window: Option<usize>,
) -> ExitCode {
    let metrics = match parse_metrics(metric_names) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let (config, dataset) = match load(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let code = country.trim().to_uppercase();
    let series = match dataset.index.series(&code) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for line in table_lines(series, &metrics, smoothing(&config, window)) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

fn run_locations(config_path: &Path, country: Option<&str>) -> ExitCode {
    let (_, dataset) = match load(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let code = country.map(|c| c.trim().to_uppercase());
    if let Some(c) = &code {
        if !dataset.index.has_country(c) {
            let err = CovidError::CountryNotFound { code: c.clone() };
            eprintln!("error: {err}");
            return (&err).into();
        }
    }

    for line in location_lines(&dataset.index, code.as_deref()) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

fn run_export(
    config_path: &Path,
    country: &str,
    output: &Path,
    metric_names: &[String],
) -> ExitCode {
    let metrics = match parse_metrics(metric_names) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let (config, dataset) = match load(config_path) {
        Ok(loaded) => loaded,
        Err(code) => return code,
    };

    let code = country.trim().to_uppercase();
    let result = dataset.index.series(&code).and_then(|series| {
        CsvReportAdapter.write(
            series,
            &metrics,
            smoothing(&config, None),
            &output.to_string_lossy(),
        )
    });

    match result {
        Ok(()) => {
            eprintln!("Report written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let aliases = config.get_section("aliases");
    eprintln!("  window_radius: {}", window_radius(&config));
    eprintln!(
        "  exclude_zero:  {}",
        config.get_bool("metrics", "exclude_zero", false)
    );
    if aliases.is_empty() {
        eprintln!("  aliases:       built-in table");
    } else {
        eprintln!("  aliases:       {} configured", aliases.len());
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
