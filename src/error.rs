use crate::oracle::error::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateOddsError {
    // Every request of the batch failed or came back without a value.
    #[error("No valid data retrieved.")]
    NoValidData,

    #[error("Invalid calendar day {month:02}-{day:02}")]
    InvalidCalendarDay { month: u32, day: u32 },

    #[error("Invalid year range {start}..={end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("Grid step must be a positive number, got {0}")]
    InvalidGridStep(f64),

    #[error("Grid contains no points")]
    EmptyGrid,

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
