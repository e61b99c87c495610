//! One parameterized sampling-and-classification pipeline.
//!
//! Supporting a new variable means building a [`Pipeline`] with its oracle
//! code, aggregation rule, threshold table and year range; the control flow in
//! [`crate::ClimateOdds`] stays the same.

use crate::aggregate::{self, Aggregation, Denominator, GridSummary, ProbabilityDistribution};
use crate::error::ClimateOddsError;
use crate::sampler::{build_keys, Sampler};
use crate::thresholds::ThresholdTable;
use crate::types::location::Grid;
use crate::types::period::{CalendarDay, YearRange};
use crate::types::variable::Variable;
use bon::Builder;
use log::warn;
use std::time::Duration;

/// Batch deadline for single-point queries.
pub const DEFAULT_POINT_BATCH_TIMEOUT: Duration = Duration::from_secs(20);
/// Batch deadline for grid summaries, which fan out to more keys.
pub const DEFAULT_GRID_BATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration of one pipeline. Immutable once built and shared freely
/// between calls; nothing is cached between runs.
///
/// # Examples
///
/// ```
/// use climate_odds::{Aggregation, Category, Pipeline, ThresholdTable, YearRange};
/// use climate_odds::Band;
///
/// # fn run() -> Result<(), climate_odds::ClimateOddsError> {
/// // Surface pressure in kPa, classified into two bands.
/// let pressure = Pipeline::builder()
///     .code("PS")
///     .aggregation(Aggregation::Mean)
///     .thresholds(ThresholdTable::new(
///         vec![(Band::below(100.0), Category::Low)],
///         Category::High,
///     ))
///     .years(YearRange::new(2000, 2020)?)
///     .build();
/// assert_eq!(pressure.code(), "PS");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Pipeline {
    #[builder(into)]
    code: String,
    #[builder(default)]
    aggregation: Aggregation,
    thresholds: ThresholdTable,
    years: YearRange,
    #[builder(default)]
    denominator: Denominator,
    #[builder(default = DEFAULT_POINT_BATCH_TIMEOUT)]
    batch_timeout: Duration,
}

impl Pipeline {
    /// The built-in point-query preset for `variable`.
    pub fn for_variable(variable: Variable) -> Self {
        Self::builder()
            .code(variable.code())
            .aggregation(variable.aggregation())
            .thresholds(variable.thresholds())
            .years(variable.default_years())
            .build()
    }

    /// The built-in grid-summary preset for `variable`, with the longer batch deadline.
    pub fn grid_for_variable(variable: Variable) -> Self {
        Self {
            batch_timeout: DEFAULT_GRID_BATCH_TIMEOUT,
            ..Self::for_variable(variable)
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn denominator(&self) -> Denominator {
        self.denominator
    }

    pub fn batch_timeout(&self) -> Duration {
        self.batch_timeout
    }

    pub fn with_years(self, years: YearRange) -> Self {
        Self { years, ..self }
    }

    pub fn with_denominator(self, denominator: Denominator) -> Self {
        Self {
            denominator,
            ..self
        }
    }

    pub fn with_batch_timeout(self, batch_timeout: Duration) -> Self {
        Self {
            batch_timeout,
            ..self
        }
    }

    /// Samples every year at every grid point and returns the category distribution.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::EmptyGrid`] before sampling if `grid` has no
    /// points, and [`ClimateOddsError::NoValidData`] if not a single request
    /// produced an observation.
    pub async fn probabilities(
        &self,
        sampler: &Sampler,
        grid: &Grid,
        day: CalendarDay,
    ) -> Result<ProbabilityDistribution, ClimateOddsError> {
        if grid.is_empty() {
            return Err(ClimateOddsError::EmptyGrid);
        }
        let keys = build_keys(grid, self.years, day);
        let batch = sampler.sample(&self.code, keys, self.batch_timeout).await;
        if batch.stats.observed == 0 {
            warn!(
                "No {} observations for {} across {}",
                self.code, day, self.years
            );
        }
        aggregate::distribution(
            &batch.outcomes,
            &self.thresholds,
            self.aggregation,
            self.years.len(),
            self.denominator,
        )
    }

    /// Samples every year at every grid point and returns the per-year
    /// categories with the most frequent one.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::EmptyGrid`] if `grid` has no points. A batch
    /// without observations is not an error; it summarizes as `NO DATA`.
    pub async fn summary(
        &self,
        sampler: &Sampler,
        grid: &Grid,
        day: CalendarDay,
    ) -> Result<GridSummary, ClimateOddsError> {
        if grid.is_empty() {
            return Err(ClimateOddsError::EmptyGrid);
        }
        let keys = build_keys(grid, self.years, day);
        let batch = sampler.sample(&self.code, keys, self.batch_timeout).await;
        Ok(aggregate::summarize(
            &batch.outcomes,
            &self.thresholds,
            self.aggregation,
            self.years.len(),
            self.denominator,
        ))
    }
}
