mod aggregate;
mod climate_odds;
mod error;
mod oracle;
mod pipeline;
mod sampler;
mod thresholds;
mod types;

pub use climate_odds::*;
pub use error::ClimateOddsError;

pub use aggregate::{
    classify_years, distribution, summarize, yearly_aggregates, Aggregation, Denominator,
    GridSummary, ModalLevel, ProbabilityDistribution, YearAggregate,
};
pub use pipeline::{Pipeline, DEFAULT_GRID_BATCH_TIMEOUT, DEFAULT_POINT_BATCH_TIMEOUT};
pub use sampler::{build_keys, BatchStats, SampleBatch, Sampler, DEFAULT_MAX_CONCURRENCY};
pub use thresholds::{Band, Limit, ThresholdTable};

pub use oracle::error::OracleError;
pub use oracle::power::{parse_point_value, PowerClient, FILL_VALUE};
pub use oracle::PointOracle;

pub use types::category::Category;
pub use types::location::{BoundingBox, Grid, LatLon};
pub use types::period::{CalendarDay, YearRange};
pub use types::sample::{QueryKey, SampleOutcome};
pub use types::variable::{Variable, DEFAULT_YEARS, TEMPERATURE_YEARS};
