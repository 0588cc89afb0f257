use std::num::ParseFloatError;
use thiserror::Error;

/// Failures of the external forecast source. Never fatal: the environment
/// builder degrades to the standard atmosphere on any of these.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("HTTP request failed with status {0}")]
    HttpStatus(u16),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Float parsing error: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[error("Forecast data is missing: {0}")]
    MissingForecastData(String),

    #[error("Forecast download disabled")]
    Disabled,
}
