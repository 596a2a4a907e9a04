//! Domain error types.

/// Top-level error type for covidtrend.
///
/// Metric absence is never an error: accessors return `None` for
/// "not computable" and this enum only covers structural failures.
#[derive(Debug, thiserror::Error)]
pub enum CovidError {
    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error("could not parse date {value:?} (expected M/D/YY or M/D/YYYY)")]
    DateParse { value: String },

    #[error("no data found for {code}")]
    CountryNotFound { code: String },

    #[error("no data found for location {location}")]
    LocationNotFound { location: String },

    #[error("unknown metric: {name}")]
    UnknownMetric { name: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CovidError> for std::process::ExitCode {
    fn from(err: &CovidError) -> Self {
        let code: u8 = match err {
            CovidError::Io(_) => 1,
            CovidError::ConfigParse { .. }
            | CovidError::ConfigMissing { .. }
            | CovidError::ConfigInvalid { .. } => 2,
            CovidError::DataLoad { .. } | CovidError::DateParse { .. } => 3,
            CovidError::CountryNotFound { .. }
            | CovidError::LocationNotFound { .. }
            | CovidError::UnknownMetric { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
