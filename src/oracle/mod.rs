//! The point-climatology oracle: one variable, one location, one date per request.

pub mod error;
pub mod power;

use crate::oracle::error::OracleError;
use crate::types::sample::QueryKey;
use async_trait::async_trait;

/// A remote service answering "what was `code` at this location on this date".
///
/// `Ok(Some(v))` is an observation, `Ok(None)` means the service was reached and
/// has no value for the date. Any `Err` is treated as a failed sample by the
/// [`crate::Sampler`]; implementations should not retry.
#[async_trait]
pub trait PointOracle: Send + Sync {
    async fn fetch(&self, code: &str, key: &QueryKey) -> Result<Option<f64>, OracleError>;
}
