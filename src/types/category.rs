//! Defines the ordinal severity bands a year's aggregated value is classified into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal severity band.
///
/// Variants are ordered by severity, so `Category::None < Category::High`.
/// Not every variable produces [`Category::None`]; only the precipitation
/// tables carry an explicit "nothing fell" band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    None,
    Low,
    Medium,
    High,
}

impl Category {
    /// All categories, highest severity first. This is also the preference
    /// order when two categories share the largest count.
    pub const BY_SEVERITY: [Category; 4] = [
        Category::High,
        Category::Medium,
        Category::Low,
        Category::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::None => "NONE",
            Category::Low => "LOW",
            Category::Medium => "MEDIUM",
            Category::High => "HIGH",
        }
    }
}

/// # Examples
///
/// ```
/// use climate_odds::Category;
///
/// assert_eq!(Category::Medium.to_string(), "MEDIUM");
/// ```
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
