//! Geographic locations sampled by a batch: a single point, or a regular
//! latitude/longitude grid expanded from a bounding box.

use crate::error::ClimateOddsError;
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are decimal degrees.
///
/// # Examples
///
/// ```
/// use climate_odds::LatLon;
///
/// let dhaka = LatLon(23.8103, 90.4125);
/// assert_eq!(dhaka.lat(), 23.8103);
/// assert_eq!(dhaka.lon(), 90.4125);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn lat(self) -> f64 {
        self.0
    }

    pub fn lon(self) -> f64 {
        self.1
    }
}

/// Axis-aligned box in degrees. The corners need not be ordered; each axis is
/// expanded independently from its `min` value towards `max + step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

/// A regular set of sample points. Every point is queried once per year and the
/// observed values of one year are averaged together before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    points: Vec<LatLon>,
}

impl Grid {
    /// Grid consisting of exactly one point.
    pub fn point(location: LatLon) -> Self {
        Self {
            points: vec![location],
        }
    }

    /// Builds an explicit grid from arbitrary points.
    pub fn from_points(points: Vec<LatLon>) -> Self {
        Self { points }
    }

    /// Expands a bounding box into a lat-major grid.
    ///
    /// Each axis yields `min, min + step, ...` for every value strictly below
    /// `max + step`. When `max` lies below `min` the axis still produces `min`
    /// as long as it is within one step, so a degenerate box collapses to a
    /// row or a column instead of vanishing.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateOddsError::InvalidGridStep`] if `step` is not a positive finite number.
    pub fn from_bounds(bounds: BoundingBox, step: f64) -> Result<Self, ClimateOddsError> {
        if !(step.is_finite() && step > 0.0) {
            return Err(ClimateOddsError::InvalidGridStep(step));
        }
        let lats = axis(bounds.lat_min, bounds.lat_max, step);
        let lons = axis(bounds.lon_min, bounds.lon_max, step);
        let points = lats
            .iter()
            .flat_map(|&lat| lons.iter().map(move |&lon| LatLon(lat, lon)))
            .collect();
        Ok(Self { points })
    }

    /// The small grid the humidity summary samples by default.
    pub fn default_humidity() -> Self {
        let bounds = BoundingBox {
            lon_min: 90.0,
            lat_min: -23.8,
            lon_max: 90.5,
            lat_max: -23.9,
        };
        // Step is a positive constant, the error branch is unreachable.
        Self::from_bounds(bounds, 0.25).unwrap_or_else(|_| Self::from_points(Vec::new()))
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<LatLon> for Grid {
    fn from(location: LatLon) -> Self {
        Self::point(location)
    }
}

// Tolerance keeps 90.0 + 3 * 0.25 from producing a fourth value through rounding noise.
const AXIS_EPSILON: f64 = 1e-9;

fn axis(min: f64, max: f64, step: f64) -> Vec<f64> {
    let span = (max + step - min) / step;
    let count = (span - AXIS_EPSILON).ceil();
    if count <= 0.0 {
        return Vec::new();
    }
    (0..count as usize).map(|i| min + i as f64 * step).collect()
}
