//! Reduces a batch of sample outcomes to per-year means, classifies each year
//! and turns the resulting categories into a probability distribution or a
//! most-frequent-category summary.

use crate::error::ClimateOddsError;
use crate::thresholds::ThresholdTable;
use crate::types::category::Category;
use crate::types::sample::{QueryKey, SampleOutcome};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// How the observed values of one year are reduced to a single number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Arithmetic mean rounded to the nearest integer, halves away from zero.
    RoundedMean,
}

impl Aggregation {
    fn reduce(self, sum: f64, count: usize) -> f64 {
        let mean = sum / count as f64;
        match self {
            Aggregation::Mean => mean,
            Aggregation::RoundedMean => mean.round(),
        }
    }
}

/// What probabilities are divided by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Denominator {
    /// Length of the configured year range, whether or not each year produced
    /// data. Probabilities of sparse batches then sum to less than one.
    #[default]
    ConfiguredYears,
    /// Number of years that produced at least one observation.
    ObservedYears,
}

impl Denominator {
    fn resolve(self, configured_years: usize, observed_years: usize) -> usize {
        match self {
            Denominator::ConfiguredYears => configured_years,
            Denominator::ObservedYears => observed_years,
        }
    }
}

/// The aggregated value of one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearAggregate {
    pub year: i32,
    pub value: f64,
    /// Observed samples that went into `value`.
    pub samples: usize,
}

/// Groups observed values by year and reduces each group. Years without a
/// single observation are absent. Sorted by year.
pub fn yearly_aggregates(
    outcomes: &[(QueryKey, SampleOutcome)],
    aggregation: Aggregation,
) -> Vec<YearAggregate> {
    let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for (key, outcome) in outcomes {
        if let Some(value) = outcome.observed() {
            let entry = by_year.entry(key.year).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    by_year
        .into_iter()
        .map(|(year, (sum, samples))| YearAggregate {
            year,
            value: aggregation.reduce(sum, samples),
            samples,
        })
        .collect()
}

/// Classifies every aggregate, keeping year order.
pub fn classify_years(
    aggregates: &[YearAggregate],
    table: &ThresholdTable,
) -> Vec<(i32, Category)> {
    aggregates
        .iter()
        .map(|agg| (agg.year, table.classify(agg.value)))
        .collect()
}

fn count_categories(
    classified: &[(i32, Category)],
    categories: &[Category],
) -> BTreeMap<Category, usize> {
    let mut counts: BTreeMap<Category, usize> = categories.iter().map(|c| (*c, 0)).collect();
    for (_, category) in classified {
        *counts.entry(*category).or_insert(0) += 1;
    }
    counts
}

/// Category counts over a fixed denominator.
///
/// Serializes as a map from category name to probability, highest severity
/// first, listing every category the variable's table can produce:
/// `{"HIGH": 0.1, "MEDIUM": 0.5, "LOW": 0.4}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityDistribution {
    counts: BTreeMap<Category, usize>,
    denominator: usize,
}

impl ProbabilityDistribution {
    pub fn count(&self, category: Category) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// `count / denominator`; categories the table cannot produce have probability zero.
    pub fn probability(&self, category: Category) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.denominator as f64
    }

    pub fn denominator(&self) -> usize {
        self.denominator
    }

    /// Number of years that were classified.
    pub fn classified_years(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn total_probability(&self) -> f64 {
        self.counts
            .keys()
            .map(|category| self.probability(*category))
            .sum()
    }

    /// `(category, probability)` pairs, highest severity first.
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.counts
            .keys()
            .rev()
            .map(|category| (*category, self.probability(*category)))
    }
}

impl Serialize for ProbabilityDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (category, probability) in self.iter() {
            map.serialize_entry(category.as_str(), &probability)?;
        }
        map.end()
    }
}

/// Builds the per-category distribution of one batch.
///
/// # Errors
///
/// Returns [`ClimateOddsError::NoValidData`] when no year produced an
/// observation; an all-zero distribution is never reported as valid.
pub fn distribution(
    outcomes: &[(QueryKey, SampleOutcome)],
    table: &ThresholdTable,
    aggregation: Aggregation,
    configured_years: usize,
    denominator: Denominator,
) -> Result<ProbabilityDistribution, ClimateOddsError> {
    let aggregates = yearly_aggregates(outcomes, aggregation);
    if aggregates.is_empty() {
        return Err(ClimateOddsError::NoValidData);
    }
    let classified = classify_years(&aggregates, table);
    Ok(ProbabilityDistribution {
        counts: count_categories(&classified, &table.categories()),
        denominator: denominator.resolve(configured_years, classified.len()),
    })
}

/// The most frequent category of a summary, or why there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalLevel {
    Level(Category),
    /// Every severity band the table can produce occurred equally often, and
    /// `NONE` no more often than they did.
    Tie,
    /// No year produced an observation.
    NoData,
}

impl fmt::Display for ModalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModalLevel::Level(category) => write!(f, "{}", category),
            ModalLevel::Tie => f.write_str("TIE (ALL)"),
            ModalLevel::NoData => f.write_str("NO DATA"),
        }
    }
}

impl Serialize for ModalLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Per-year categories plus the most frequent one and its share of the
/// denominator as a percentage.
///
/// The summary works for any variable, so the category list serializes as
/// `levels` rather than the humidity-only `humidity_levels` of the HTTP endpoint
/// this summary replaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    /// Categories in ascending year order.
    pub levels: Vec<Category>,
    #[serde(skip)]
    pub years: Vec<i32>,
    pub most_frequent_level: ModalLevel,
    /// Rounded to two decimals.
    pub probability_percent: f64,
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summarizes a batch as its most frequent category.
///
/// Never fails: a batch without observations yields [`ModalLevel::NoData`] at
/// 0%. Ties between some but not all categories go to the higher severity.
pub fn summarize(
    outcomes: &[(QueryKey, SampleOutcome)],
    table: &ThresholdTable,
    aggregation: Aggregation,
    configured_years: usize,
    denominator: Denominator,
) -> GridSummary {
    let classified = classify_years(&yearly_aggregates(outcomes, aggregation), table);
    let years = classified.iter().map(|(year, _)| *year).collect();
    let levels = classified.iter().map(|(_, category)| *category).collect();

    if classified.is_empty() {
        return GridSummary {
            levels,
            years,
            most_frequent_level: ModalLevel::NoData,
            probability_percent: 0.0,
        };
    }

    let candidates = table.categories();
    let counts = count_categories(&classified, &candidates);
    let count_of = |category: &Category| counts.get(category).copied().unwrap_or(0);
    let best = candidates.iter().map(count_of).max().unwrap_or(0);

    // NONE never takes part in a tie; the severity bands the table can produce do.
    let bands: Vec<Category> = candidates
        .iter()
        .copied()
        .filter(|c| *c != Category::None)
        .collect();
    let tie = !bands.is_empty() && bands.iter().all(|c| count_of(c) == best);
    let most_frequent_level = if tie {
        ModalLevel::Tie
    } else {
        candidates
            .iter()
            .find(|c| count_of(*c) == best)
            .map(|c| ModalLevel::Level(*c))
            .unwrap_or(ModalLevel::Tie)
    };

    let share = match denominator.resolve(configured_years, classified.len()) {
        0 => 0.0,
        n => best as f64 / n as f64,
    };

    GridSummary {
        levels,
        years,
        most_frequent_level,
        probability_percent: round_to_hundredths(share * 100.0),
    }
}
