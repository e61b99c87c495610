//! This module provides the main entry point: a client that answers "how likely
//! is each severity band on this calendar day" for a point or a grid.

use crate::aggregate::{Denominator, GridSummary, ProbabilityDistribution};
use crate::error::ClimateOddsError;
use crate::oracle::power::PowerClient;
use crate::oracle::PointOracle;
use crate::pipeline::Pipeline;
use crate::sampler::{Sampler, DEFAULT_MAX_CONCURRENCY};
use crate::types::location::{Grid, LatLon};
use crate::types::period::{CalendarDay, YearRange};
use crate::types::variable::Variable;
use bon::bon;
use std::sync::Arc;
use std::time::Duration;

/// The main client for computing historical band probabilities.
///
/// Every call samples the oracle from scratch: one request per year and
/// location, issued concurrently, then classified and reduced. No state is
/// kept between calls, so a single client can serve concurrent requests.
///
/// Create an instance with [`ClimateOdds::builder()`] to talk to NASA POWER,
/// or [`ClimateOdds::with_oracle()`] to supply another [`PointOracle`].
///
/// # Examples
///
/// ```rust
/// # use climate_odds::{ClimateOdds, ClimateOddsError};
/// # fn run() -> Result<(), ClimateOddsError> {
/// let client = ClimateOdds::builder().build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClimateOdds {
    sampler: Sampler,
}

#[bon]
impl ClimateOdds {
    /// Creates a client backed by [`PowerClient`].
    ///
    /// # Arguments
    ///
    /// * `.base_url(String)`: Optional. POWER daily point endpoint.
    /// * `.request_timeout(Duration)`: Optional. Per-request timeout, default 10 s.
    /// * `.max_concurrency(usize)`: Optional. In-flight request ceiling, default 200.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::Oracle`] if the HTTP client cannot be built.
    #[builder]
    pub fn new(
        #[builder(into)] base_url: Option<String>,
        request_timeout: Option<Duration>,
        max_concurrency: Option<usize>,
    ) -> Result<Self, ClimateOddsError> {
        let power = PowerClient::builder()
            .maybe_base_url(base_url)
            .maybe_request_timeout(request_timeout)
            .build()?;
        Ok(Self::with_oracle(
            Arc::new(power),
            max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
        ))
    }

    /// Creates a client over any oracle.
    pub fn with_oracle(oracle: Arc<dyn PointOracle>, max_concurrency: usize) -> Self {
        Self {
            sampler: Sampler::with_max_concurrency(oracle, max_concurrency),
        }
    }

    /// Probability of each band of `variable` at a point on a calendar day.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.variable(Variable)`: **Required.** Which preset to run.
    /// * `.location(LatLon)`: **Required.** The point to sample.
    /// * `.day(CalendarDay)`: **Required.** Month and day, sampled in every year.
    /// * `.years(YearRange)`: Optional. Overrides the preset's year range.
    /// * `.denominator(Denominator)`: Optional. Defaults to the configured year count.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::NoValidData`] if no request produced a value.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use climate_odds::{CalendarDay, Category, ClimateOdds, ClimateOddsError, LatLon, Variable};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), ClimateOddsError> {
    /// let client = ClimateOdds::builder().build()?;
    /// let odds = client
    ///     .probabilities()
    ///     .variable(Variable::Rainfall)
    ///     .location(LatLon(23.81, 90.41))
    ///     .day(CalendarDay::new(7, 15)?)
    ///     .call()
    ///     .await?;
    /// println!("Heavy rain on July 15th: {:.0}%", odds.probability(Category::High) * 100.0);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn probabilities(
        &self,
        variable: Variable,
        location: LatLon,
        day: CalendarDay,
        years: Option<YearRange>,
        denominator: Option<Denominator>,
    ) -> Result<ProbabilityDistribution, ClimateOddsError> {
        let pipeline = customize(Pipeline::for_variable(variable), years, denominator);
        self.run_probabilities(&pipeline, &Grid::point(location), day)
            .await
    }

    /// Per-year bands over a grid, with the most frequent band and its share.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.day(CalendarDay)`: **Required.** Month and day, sampled in every year.
    /// * `.variable(Variable)`: Optional. Defaults to [`Variable::Humidity`].
    /// * `.grid(Grid)`: Optional. Defaults to [`Grid::default_humidity`].
    /// * `.years(YearRange)`: Optional. Overrides the preset's year range.
    /// * `.denominator(Denominator)`: Optional. Defaults to the configured year count.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::EmptyGrid`] for a grid without points. A batch
    /// without data is reported as `NO DATA` rather than an error.
    #[builder]
    pub async fn grid_summary(
        &self,
        day: CalendarDay,
        variable: Option<Variable>,
        grid: Option<Grid>,
        years: Option<YearRange>,
        denominator: Option<Denominator>,
    ) -> Result<GridSummary, ClimateOddsError> {
        let variable = variable.unwrap_or(Variable::Humidity);
        let grid = grid.unwrap_or_else(Grid::default_humidity);
        let pipeline = customize(Pipeline::grid_for_variable(variable), years, denominator);
        self.run_summary(&pipeline, &grid, day).await
    }

    /// Runs an arbitrary pipeline in distribution mode.
    pub async fn run_probabilities(
        &self,
        pipeline: &Pipeline,
        grid: &Grid,
        day: CalendarDay,
    ) -> Result<ProbabilityDistribution, ClimateOddsError> {
        pipeline.probabilities(&self.sampler, grid, day).await
    }

    /// Runs an arbitrary pipeline in summary mode.
    pub async fn run_summary(
        &self,
        pipeline: &Pipeline,
        grid: &Grid,
        day: CalendarDay,
    ) -> Result<GridSummary, ClimateOddsError> {
        pipeline.summary(&self.sampler, grid, day).await
    }
}

fn customize(
    pipeline: Pipeline,
    years: Option<YearRange>,
    denominator: Option<Denominator>,
) -> Pipeline {
    let pipeline = match years {
        Some(years) => pipeline.with_years(years),
        None => pipeline,
    };
    match denominator {
        Some(denominator) => pipeline.with_denominator(denominator),
        None => pipeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ModalLevel;
    use crate::oracle::error::OracleError;
    use crate::types::category::Category;
    use crate::types::sample::QueryKey;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed values per (year, longitude in hundredths); anything else is missing.
    #[derive(Default)]
    struct TableOracle {
        values: HashMap<(i32, i64), f64>,
        failing_years: Vec<i32>,
        calls: AtomicUsize,
    }

    impl TableOracle {
        fn with(mut self, year: i32, lon: f64, value: f64) -> Self {
            self.values.insert((year, (lon * 100.0).round() as i64), value);
            self
        }

        fn failing(mut self, year: i32) -> Self {
            self.failing_years.push(year);
            self
        }
    }

    #[async_trait]
    impl PointOracle for TableOracle {
        async fn fetch(&self, code: &str, key: &QueryKey) -> Result<Option<f64>, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_years.contains(&key.year) {
                return Err(OracleError::MalformedValue {
                    code: code.to_string(),
                    date: key.date_key(),
                });
            }
            let lon = (key.location.lon() * 100.0).round() as i64;
            Ok(self.values.get(&(key.year, lon)).copied())
        }
    }

    fn day() -> CalendarDay {
        CalendarDay::new(8, 20).unwrap()
    }

    #[tokio::test]
    async fn rainfall_probabilities_for_a_point() -> Result<(), ClimateOddsError> {
        let oracle = TableOracle::default()
            .with(2000, 90.0, 1.0)
            .with(2001, 90.0, 2.0)
            .with(2002, 90.0, 9.0);
        let client = ClimateOdds::with_oracle(Arc::new(oracle), 8);

        let odds = client
            .probabilities()
            .variable(Variable::Rainfall)
            .location(LatLon(23.8, 90.0))
            .day(day())
            .years(YearRange::new(2000, 2002)?)
            .call()
            .await?;

        assert!((odds.probability(Category::Low) - 2.0 / 3.0).abs() < 1e-12);
        assert!((odds.probability(Category::High) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(odds.probability(Category::Medium), 0.0);
        assert_eq!(odds.probability(Category::None), 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn temperature_rounds_before_classifying() -> Result<(), ClimateOddsError> {
        let oracle = TableOracle::default().with(2010, 0.0, 14.5);
        let client = ClimateOdds::with_oracle(Arc::new(oracle), 8);
        let odds = client
            .probabilities()
            .variable(Variable::Temperature)
            .location(LatLon(0.0, 0.0))
            .day(day())
            .years(YearRange::new(2010, 2010)?)
            .call()
            .await?;
        assert_eq!(odds.probability(Category::Medium), 1.0);
        assert_eq!(odds.probability(Category::Low), 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn failures_shrink_numerators_not_denominator() -> Result<(), ClimateOddsError> {
        let oracle = TableOracle::default()
            .with(2000, 0.0, 70.0)
            .with(2001, 0.0, 70.0)
            .failing(2002);
        let client = ClimateOdds::with_oracle(Arc::new(oracle), 8);
        let odds = client
            .probabilities()
            .variable(Variable::Humidity)
            .location(LatLon(0.0, 0.0))
            .day(day())
            .years(YearRange::new(2000, 2003)?)
            .call()
            .await?;
        assert_eq!(odds.denominator(), 4);
        assert_eq!(odds.probability(Category::High), 0.5);
        assert!(odds.total_probability() < 1.0);
        Ok(())
    }

    #[tokio::test]
    async fn all_failed_is_no_valid_data() -> Result<(), ClimateOddsError> {
        let oracle = TableOracle::default().failing(2000).failing(2001);
        let client = ClimateOdds::with_oracle(Arc::new(oracle), 8);
        let result = client
            .probabilities()
            .variable(Variable::AirDensity)
            .location(LatLon(0.0, 0.0))
            .day(day())
            .years(YearRange::new(2000, 2001)?)
            .call()
            .await;
        let err = result.unwrap_err();
        assert!(matches!(err, ClimateOddsError::NoValidData));
        assert_eq!(err.to_string(), "No valid data retrieved.");
        Ok(())
    }

    #[tokio::test]
    async fn grid_summary_averages_cells_per_year() -> Result<(), ClimateOddsError> {
        // Default grid samples longitudes 90.0, 90.25 and 90.5.
        let oracle = Arc::new(
            TableOracle::default()
                .with(2000, 90.0, 20.0)
                .with(2000, 90.25, 40.0) // mean 30 -> LOW
                .with(2001, 90.5, 80.0) // HIGH
                .with(2002, 90.0, 60.0)
                .with(2002, 90.5, 70.0), // HIGH
        );
        let client = ClimateOdds::with_oracle(oracle.clone(), 8);
        let summary = client
            .grid_summary()
            .day(day())
            .years(YearRange::new(2000, 2003)?)
            .call()
            .await?;

        assert_eq!(oracle.calls.load(Ordering::SeqCst), 12);
        assert_eq!(
            summary.levels,
            vec![Category::Low, Category::High, Category::High]
        );
        assert_eq!(summary.most_frequent_level, ModalLevel::Level(Category::High));
        assert_eq!(summary.probability_percent, 50.0);
        Ok(())
    }

    #[tokio::test]
    async fn grid_summary_without_data() -> Result<(), ClimateOddsError> {
        let client = ClimateOdds::with_oracle(Arc::new(TableOracle::default()), 8);
        let summary = client.grid_summary().day(day()).call().await?;
        assert_eq!(summary.most_frequent_level, ModalLevel::NoData);
        assert_eq!(summary.probability_percent, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_grid_is_rejected() -> Result<(), ClimateOddsError> {
        let client = ClimateOdds::with_oracle(Arc::new(TableOracle::default()), 8);
        let result = client
            .grid_summary()
            .day(day())
            .grid(Grid::from_points(Vec::new()))
            .call()
            .await;
        assert!(matches!(result, Err(ClimateOddsError::EmptyGrid)));
        Ok(())
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() -> Result<(), ClimateOddsError> {
        let oracle = TableOracle::default()
            .with(2000, 0.0, 0.9)
            .with(2001, 0.0, 1.1)
            .with(2002, 0.0, 1.3);
        let client = ClimateOdds::with_oracle(Arc::new(oracle), 2);
        let pipeline =
            Pipeline::for_variable(Variable::AirDensity).with_years(YearRange::new(2000, 2002)?);
        let grid = Grid::point(LatLon(0.0, 0.0));
        let first = client.run_probabilities(&pipeline, &grid, day()).await?;
        let second = client.run_probabilities(&pipeline, &grid, day()).await?;
        assert_eq!(first, second);
        assert_eq!(first.count(Category::Low), 1);
        assert_eq!(first.count(Category::Medium), 1);
        assert_eq!(first.count(Category::High), 1);
        Ok(())
    }
}
