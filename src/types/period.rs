use crate::error::ClimateOddsError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

// Any leap year works, it only has to admit 02-29.
const VALIDATION_YEAR: i32 = 2000;

/// A recurring month/day, queried once per year of a [`YearRange`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDay {
    month: u32,
    day: u32,
}

impl CalendarDay {
    /// Validates that `month`/`day` exists in at least one year. `02-29` is accepted;
    /// in non-leap years the oracle is asked for the date anyway and reports it absent.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::InvalidCalendarDay`] for dates such as `04-31` or `13-01`.
    pub fn new(month: u32, day: u32) -> Result<Self, ClimateOddsError> {
        NaiveDate::from_ymd_opt(VALIDATION_YEAR, month, day)
            .map(|_| Self { month, day })
            .ok_or(ClimateOddsError::InvalidCalendarDay { month, day })
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn day(self) -> u32 {
        self.day
    }

    /// The oracle's date key for this day in `year`, e.g. `20240105`.
    pub fn date_key(self, year: i32) -> String {
        format!("{:04}{:02}{:02}", year, self.month, self.day)
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Inclusive range of calendar years. Its length is the fixed denominator of
/// the reference probability policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::InvalidYearRange`] when `end < start`.
    pub fn new(start: i32, end: i32) -> Result<Self, ClimateOddsError> {
        if end < start {
            return Err(ClimateOddsError::InvalidYearRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(self) -> i32 {
        self.start
    }

    pub fn end(self) -> i32 {
        self.end
    }

    pub fn len(self) -> usize {
        let span = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(span).unwrap_or(usize::MAX)
    }

    pub fn contains(self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    pub fn iter(self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }

    pub(crate) const fn from_const(start: i32, end: i32) -> Self {
        Self { start, end }
    }
}

impl Display for YearRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.start, self.end)
    }
}
