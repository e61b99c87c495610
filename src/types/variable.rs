//! Defines the physical variables with built-in presets: which NASA POWER
//! parameter they request, how a year's samples are reduced, which bands they
//! classify into and which years they sample by default.

use crate::aggregate::Aggregation;
use crate::thresholds::ThresholdTable;
use crate::types::period::YearRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Years sampled by every preset except temperature.
pub const DEFAULT_YEARS: YearRange = YearRange::from_const(1995, 2024);
/// Temperature samples a shorter, more recent window.
pub const TEMPERATURE_YEARS: YearRange = YearRange::from_const(2010, 2024);

/// A weather variable with a built-in pipeline preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Wind speed at 2 m, m/s.
    WindSpeed,
    /// Bias-corrected total precipitation, mm/day.
    Rainfall,
    /// Snowfall, mm/day water equivalent.
    Snowfall,
    /// Air temperature at 2 m, °C.
    Temperature,
    /// Surface air density, kg/m³.
    AirDensity,
    /// Relative humidity at 2 m, %.
    Humidity,
}

impl Variable {
    pub const ALL: [Variable; 6] = [
        Variable::WindSpeed,
        Variable::Rainfall,
        Variable::Snowfall,
        Variable::Temperature,
        Variable::AirDensity,
        Variable::Humidity,
    ];

    /// The oracle parameter code.
    pub fn code(&self) -> &'static str {
        match self {
            Variable::WindSpeed => "WS2M",
            Variable::Rainfall => "PRECTOTCORR",
            Variable::Snowfall => "PRECSNO",
            Variable::Temperature => "T2M",
            Variable::AirDensity => "RHOA",
            Variable::Humidity => "RH2M",
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        match self {
            Variable::Temperature => Aggregation::RoundedMean,
            _ => Aggregation::Mean,
        }
    }

    pub fn thresholds(&self) -> ThresholdTable {
        match self {
            Variable::WindSpeed => ThresholdTable::wind_speed(),
            Variable::Rainfall | Variable::Snowfall => ThresholdTable::precipitation(),
            Variable::Temperature => ThresholdTable::temperature(),
            Variable::AirDensity => ThresholdTable::air_density(),
            Variable::Humidity => ThresholdTable::humidity(),
        }
    }

    pub fn default_years(&self) -> YearRange {
        match self {
            Variable::Temperature => TEMPERATURE_YEARS,
            _ => DEFAULT_YEARS,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variable::WindSpeed => "windspeed",
            Variable::Rainfall => "rainfall",
            Variable::Snowfall => "snowfall",
            Variable::Temperature => "temperature",
            Variable::AirDensity => "airdensity",
            Variable::Humidity => "humidity",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn presets_match_reference_setup() {
        assert_eq!(Variable::Temperature.default_years().len(), 15);
        assert_eq!(Variable::Humidity.default_years().len(), 30);
        assert_eq!(Variable::Temperature.aggregation(), Aggregation::RoundedMean);
        assert_eq!(Variable::Rainfall.aggregation(), Aggregation::Mean);
    }

    #[test]
    fn only_precipitation_has_none_band() {
        for variable in Variable::ALL {
            let has_none = variable.thresholds().categories().contains(&Category::None);
            let expected = matches!(variable, Variable::Rainfall | Variable::Snowfall);
            assert_eq!(has_none, expected, "{variable}");
        }
    }
}
