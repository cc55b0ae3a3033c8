use crate::error::CoreError;
use crate::metric::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dividend yields strictly above this fraction score as `High`.
pub const HIGH_YIELD_THRESHOLD: f64 = 0.04;

/// The outcome of the moving-average trend rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    Buy,
    Sell,
    Hold,
    InsufficientData,
}

impl TrendSignal {
    /// Human-readable label shown next to the decision.
    pub fn label(&self) -> &'static str {
        match self {
            TrendSignal::Buy => "Buy / strong uptrend",
            TrendSignal::Sell => "Sell / strong downtrend",
            TrendSignal::Hold => "Hold / unclear trend",
            TrendSignal::InsufficientData => "insufficient data",
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Two-bin classification of a dividend yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DividendScore {
    Low,
    High,
}

impl DividendScore {
    pub fn from_yield(dividend_yield: f64) -> Self {
        if dividend_yield > HIGH_YIELD_THRESHOLD {
            DividendScore::High
        } else {
            DividendScore::Low
        }
    }

    /// Scores an optional yield; a missing yield has no score.
    pub fn from_metric(dividend_yield: Metric<f64>) -> Metric<Self> {
        dividend_yield.map(Self::from_yield)
    }
}

impl fmt::Display for DividendScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DividendScore::Low => f.write_str("Low"),
            DividendScore::High => f.write_str("High"),
        }
    }
}

/// The analysis window a user can pick for a single stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lookback {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl Lookback {
    pub const ALL: [Lookback; 6] = [
        Lookback::OneMonth,
        Lookback::ThreeMonths,
        Lookback::SixMonths,
        Lookback::OneYear,
        Lookback::TwoYears,
        Lookback::FiveYears,
    ];

    /// Length of the window in calendar days.
    pub fn days(&self) -> i64 {
        match self {
            Lookback::OneMonth => 30,
            Lookback::ThreeMonths => 90,
            Lookback::SixMonths => 180,
            Lookback::OneYear => 365,
            Lookback::TwoYears => 730,
            Lookback::FiveYears => 1825,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lookback::OneMonth => "1M",
            Lookback::ThreeMonths => "3M",
            Lookback::SixMonths => "6M",
            Lookback::OneYear => "1Y",
            Lookback::TwoYears => "2Y",
            Lookback::FiveYears => "5Y",
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lookback {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Lookback::ALL
            .into_iter()
            .find(|l| l.code() == wanted)
            .ok_or_else(|| {
                CoreError::InvalidInput(
                    "lookback".to_string(),
                    format!("'{}' is not one of 1M, 3M, 6M, 1Y, 2Y, 5Y", s),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dividend_threshold_is_strict() {
        assert_eq!(DividendScore::from_yield(0.05), DividendScore::High);
        assert_eq!(DividendScore::from_yield(0.03), DividendScore::Low);
        assert_eq!(DividendScore::from_yield(0.04), DividendScore::Low);
        assert!(DividendScore::from_metric(Metric::Undefined).is_undefined());
    }

    #[test]
    fn lookback_parses_codes() {
        assert_eq!("6m".parse::<Lookback>().unwrap(), Lookback::SixMonths);
        assert_eq!("5Y".parse::<Lookback>().unwrap().days(), 1825);
        assert!("7D".parse::<Lookback>().is_err());
    }

    #[test]
    fn lookback_defaults_to_six_months() {
        assert_eq!(Lookback::default(), Lookback::SixMonths);
        assert_eq!(Lookback::default().days(), 180);
    }
}
