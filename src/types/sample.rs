//! One oracle request and what became of it.

use crate::oracle::error::OracleError;
use crate::types::location::LatLon;
use crate::types::period::CalendarDay;
use serde::{Deserialize, Serialize};

/// Identifies one remote request: one location on one calendar day of one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryKey {
    pub year: i32,
    pub location: LatLon,
    pub day: CalendarDay,
}

impl QueryKey {
    pub fn new(year: i32, location: LatLon, day: CalendarDay) -> Self {
        Self {
            year,
            location,
            day,
        }
    }

    /// The `YYYYMMDD` string used as both start and end of the request.
    pub fn date_key(&self) -> String {
        self.day.date_key(self.year)
    }
}

/// Result of a single oracle request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleOutcome {
    /// The oracle returned a usable value for the exact date.
    Observed { value: f64 },
    /// The oracle was reached and reported no value for the date.
    Missing,
    /// Timeout, transport error, non-success status or malformed body.
    Failed,
}

impl SampleOutcome {
    pub fn observed(&self) -> Option<f64> {
        match self {
            SampleOutcome::Observed { value } => Some(*value),
            _ => None,
        }
    }
}

impl From<&Result<Option<f64>, OracleError>> for SampleOutcome {
    fn from(result: &Result<Option<f64>, OracleError>) -> Self {
        match result {
            Ok(Some(value)) => SampleOutcome::Observed { value: *value },
            Ok(None) => SampleOutcome::Missing,
            Err(_) => SampleOutcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_oracle_result() {
        let observed: Result<Option<f64>, OracleError> = Ok(Some(1.5));
        assert_eq!(
            SampleOutcome::from(&observed),
            SampleOutcome::Observed { value: 1.5 }
        );
        let missing: Result<Option<f64>, OracleError> = Ok(None);
        assert_eq!(SampleOutcome::from(&missing), SampleOutcome::Missing);
        let failed: Result<Option<f64>, OracleError> = Err(OracleError::MalformedValue {
            code: "T2M".into(),
            date: "20200101".into(),
        });
        assert_eq!(SampleOutcome::from(&failed), SampleOutcome::Failed);
        assert_eq!(SampleOutcome::Missing.observed(), None);
    }

    #[test]
    fn key_formats_request_date() {
        let day = CalendarDay::new(7, 4).unwrap();
        let key = QueryKey::new(2001, LatLon(0.0, 0.0), day);
        assert_eq!(key.date_key(), "20010704");
    }
}
