//! Error handling for the indicator pipeline
//!
//! Only two conditions stop a run: an input window that cannot be resolved and
//! an aligned table with no usable rows. Remote source failures are modelled by
//! [`SourceError`] but never leave the fetcher; they degrade to an empty series.

use chrono::NaiveDate;
use thiserror::Error;

/// Why a user-supplied window string could not be turned into a [`crate::window::Window`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("'{0}' is neither a month count (12, 24, ..., 120) nor a start month like 'jun/24'")]
    Unrecognized(String),

    #[error("'{input}' starts in {today_month} or later; pick a month before the current one")]
    NonPositive { input: String, today_month: String },
}

/// Terminal conditions of a pipeline run, surfaced to the user as blocking warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] WindowError),

    #[error("insufficient data: no month has values for every indicator")]
    InsufficientData,
}

impl PipelineError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }
}

/// Soft failures of a single remote fetch. Absorbed by the fetcher.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("source returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("no observations between {from} and {to}")]
    Empty { from: NaiveDate, to: NaiveDate },
}

/// Result type alias for shell and binary code
pub type Result<T> = anyhow::Result<T>;
