//! Fans one request per [`QueryKey`] out to a [`PointOracle`] with bounded
//! concurrency and a batch-wide deadline, and folds every per-request result
//! into a [`SampleOutcome`].

use crate::oracle::PointOracle;
use crate::types::location::Grid;
use crate::types::period::{CalendarDay, YearRange};
use crate::types::sample::{QueryKey, SampleOutcome};
use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

pub const DEFAULT_MAX_CONCURRENCY: usize = 200;

/// Builds the key space: every year crossed with every grid point.
pub fn build_keys(grid: &Grid, years: YearRange, day: CalendarDay) -> Vec<QueryKey> {
    years
        .iter()
        .flat_map(|year| {
            grid.points()
                .iter()
                .map(move |&location| QueryKey::new(year, location, day))
        })
        .collect()
}

/// Counts per outcome kind for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub observed: usize,
    pub missing: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn total(&self) -> usize {
        self.observed + self.missing + self.failed
    }

    /// Share of requests that produced an observation, `0.0` for an empty batch.
    pub fn completeness(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.observed as f64 / total as f64,
        }
    }
}

/// Every key of a batch paired with its outcome, in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    pub outcomes: Vec<(QueryKey, SampleOutcome)>,
    pub stats: BatchStats,
}

impl SampleBatch {
    fn new(outcomes: Vec<(QueryKey, SampleOutcome)>) -> Self {
        let mut stats = BatchStats::default();
        for (_, outcome) in &outcomes {
            match outcome {
                SampleOutcome::Observed { .. } => stats.observed += 1,
                SampleOutcome::Missing => stats.missing += 1,
                SampleOutcome::Failed => stats.failed += 1,
            }
        }
        Self { outcomes, stats }
    }
}

/// Issues batches of single-shot oracle requests.
#[derive(Clone)]
pub struct Sampler {
    oracle: Arc<dyn PointOracle>,
    max_concurrency: usize,
}

impl Sampler {
    pub fn new(oracle: Arc<dyn PointOracle>) -> Self {
        Self::with_max_concurrency(oracle, DEFAULT_MAX_CONCURRENCY)
    }

    /// A ceiling of zero is raised to one.
    pub fn with_max_concurrency(oracle: Arc<dyn PointOracle>, max_concurrency: usize) -> Self {
        Self {
            oracle,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Requests `code` for every key, at most `max_concurrency` at a time.
    ///
    /// Never fails: per-request errors become [`SampleOutcome::Failed`]. When
    /// `batch_timeout` elapses, requests still in flight or not yet started are
    /// dropped and reported as `Failed`; outcomes collected so far are kept.
    /// A timeout such as [`Duration::MAX`] that overflows the clock waits for
    /// every request.
    pub async fn sample(
        &self,
        code: &str,
        keys: Vec<QueryKey>,
        batch_timeout: Duration,
    ) -> SampleBatch {
        // A timeout too large to add to the clock means no deadline.
        let deadline = Instant::now().checked_add(batch_timeout);
        let mut outcomes: Vec<(QueryKey, SampleOutcome)> = keys
            .iter()
            .map(|key| (*key, SampleOutcome::Failed))
            .collect();
        let expected = keys.len();

        let mut pending = stream::iter(keys.into_iter().enumerate())
            .map(|(index, key)| async move {
                let result = self.oracle.fetch(code, &key).await;
                match &result {
                    Err(e) => debug!(
                        "Request for {} at {:?} on {} failed: {}",
                        code,
                        key.location,
                        key.date_key(),
                        e
                    ),
                    Ok(None) => debug!(
                        "No {} value at {:?} on {}",
                        code,
                        key.location,
                        key.date_key()
                    ),
                    Ok(Some(_)) => {}
                }
                (index, SampleOutcome::from(&result))
            })
            .buffer_unordered(self.max_concurrency);

        let mut settled = 0;
        loop {
            let next = match deadline {
                Some(deadline) => timeout_at(deadline, pending.next()).await,
                None => Ok(pending.next().await),
            };
            match next {
                Ok(Some((index, outcome))) => {
                    outcomes[index].1 = outcome;
                    settled += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        "Batch deadline of {:?} reached for {}, abandoning {} of {} requests",
                        batch_timeout,
                        code,
                        expected - settled,
                        expected
                    );
                    break;
                }
            }
        }

        let batch = SampleBatch::new(outcomes);
        info!(
            "Sampled {} for {} keys: {} observed, {} missing, {} failed ({:.0}% complete)",
            code,
            batch.stats.total(),
            batch.stats.observed,
            batch.stats.missing,
            batch.stats.failed,
            batch.stats.completeness() * 100.0
        );
        batch
    }
}
