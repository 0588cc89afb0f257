use crate::derive::DesignError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlightError {
    #[error(transparent)]
    Design(#[from] DesignError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
