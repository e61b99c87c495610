//! Threshold tables mapping an aggregated value to a [`Category`].
//!
//! A table is an ordered list of bands followed by a catch-all category. Bands
//! are tested in order and the first match wins; a value no band claims (NaN
//! included) falls through to the catch-all. Tables are therefore total by
//! construction.

use crate::types::category::Category;
use serde::{Deserialize, Serialize};

/// One side of a [`Band`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Limit {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

/// A possibly half-open interval on the real line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lower: Limit,
    pub upper: Limit,
}

impl Band {
    /// `value == x`
    pub fn exactly(x: f64) -> Self {
        Self {
            lower: Limit::Inclusive(x),
            upper: Limit::Inclusive(x),
        }
    }

    /// `value <= x`
    pub fn at_most(x: f64) -> Self {
        Self {
            lower: Limit::Unbounded,
            upper: Limit::Inclusive(x),
        }
    }

    /// `value < x`
    pub fn below(x: f64) -> Self {
        Self {
            lower: Limit::Unbounded,
            upper: Limit::Exclusive(x),
        }
    }

    pub fn between(lower: Limit, upper: Limit) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        let above_lower = match self.lower {
            Limit::Unbounded => true,
            Limit::Inclusive(x) => value >= x,
            Limit::Exclusive(x) => value > x,
        };
        let below_upper = match self.upper {
            Limit::Unbounded => true,
            Limit::Inclusive(x) => value <= x,
            Limit::Exclusive(x) => value < x,
        };
        above_lower && below_upper
    }
}

/// Ordered band rules plus a catch-all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    rules: Vec<(Band, Category)>,
    otherwise: Category,
}

impl ThresholdTable {
    pub fn new(rules: Vec<(Band, Category)>, otherwise: Category) -> Self {
        Self { rules, otherwise }
    }

    pub fn classify(&self, value: f64) -> Category {
        self.rules
            .iter()
            .find(|(band, _)| band.contains(value))
            .map(|(_, category)| *category)
            .unwrap_or(self.otherwise)
    }

    /// Every category this table can produce, highest severity first.
    pub fn categories(&self) -> Vec<Category> {
        Category::BY_SEVERITY
            .into_iter()
            .filter(|c| *c == self.otherwise || self.rules.iter().any(|(_, rc)| rc == c))
            .collect()
    }

    /// Rainfall and snowfall, mm/day: `=0` NONE, `(0, 2.5]` LOW, `(2.5, 7.5]` MEDIUM, else HIGH.
    pub fn precipitation() -> Self {
        Self::new(
            vec![
                (Band::exactly(0.0), Category::None),
                (
                    Band::between(Limit::Exclusive(0.0), Limit::Inclusive(2.5)),
                    Category::Low,
                ),
                (
                    Band::between(Limit::Exclusive(2.5), Limit::Inclusive(7.5)),
                    Category::Medium,
                ),
            ],
            Category::High,
        )
    }

    /// Air density, kg/m³: `<= 1.00` LOW, `(1.00, 1.25]` MEDIUM, else HIGH.
    pub fn air_density() -> Self {
        Self::new(
            vec![
                (Band::at_most(1.00), Category::Low),
                (
                    Band::between(Limit::Exclusive(1.00), Limit::Inclusive(1.25)),
                    Category::Medium,
                ),
            ],
            Category::High,
        )
    }

    /// Relative humidity, %: `<= 30` LOW, `(30, 59)` MEDIUM, else HIGH.
    pub fn humidity() -> Self {
        Self::new(
            vec![
                (Band::at_most(30.0), Category::Low),
                (
                    Band::between(Limit::Exclusive(30.0), Limit::Exclusive(59.0)),
                    Category::Medium,
                ),
            ],
            Category::High,
        )
    }

    /// Temperature, °C after rounding: `< 15` LOW, `[15, 25]` MEDIUM, else HIGH.
    pub fn temperature() -> Self {
        Self::new(
            vec![
                (Band::below(15.0), Category::Low),
                (
                    Band::between(Limit::Inclusive(15.0), Limit::Inclusive(25.0)),
                    Category::Medium,
                ),
            ],
            Category::High,
        )
    }

    /// Wind speed at 2 m, m/s: `<= 5.0` LOW, `(5.0, 10.0]` MEDIUM, else HIGH.
    pub fn wind_speed() -> Self {
        Self::new(
            vec![
                (Band::at_most(5.0), Category::Low),
                (
                    Band::between(Limit::Exclusive(5.0), Limit::Inclusive(10.0)),
                    Category::Medium,
                ),
            ],
            Category::High,
        )
    }
}
