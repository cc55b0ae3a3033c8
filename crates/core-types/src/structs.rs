use crate::enums::DividendScore;
use crate::error::CoreError;
use crate::metric::Metric;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    fn check(&self) -> Result<(), CoreError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidValue {
                    date: self.date,
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// An ordered run of daily observations for one ticker.
///
/// Dates are strictly increasing and every value is finite and non-negative;
/// `PriceSeries::new` is the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, CoreError> {
        for bar in &bars {
            bar.check()?;
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::UnorderedDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Builds a series with one flat bar per consecutive calendar day.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, CoreError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let date = start.checked_add_days(Days::new(i as u64)).ok_or_else(|| {
                    CoreError::InvalidInput("date".to_string(), format!("{} + {} days", start, i))
                })?;
                Ok(Bar {
                    date,
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 0.0,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Self::new(symbol, bars)
    }

    /// The observations dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> PriceSeries {
        let from = self.bars.partition_point(|b| b.date < start);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[from..].to_vec(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

/// A ticker in the configured market universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub name: String,
}

/// Company fundamentals as reported by the supplier.
///
/// Ratios are fractions (0.12 is 12%); presentation decides on percent formatting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub pe_ratio: Metric<f64>,
    pub return_on_equity: Metric<f64>,
    pub return_on_assets: Metric<f64>,
    pub dividend_yield: Metric<f64>,
    pub payout_ratio: Metric<f64>,
    pub dividend_score: Metric<DividendScore>,
}

impl FinancialSnapshot {
    /// Builds a snapshot, deriving the dividend score from the yield.
    pub fn new(
        pe_ratio: Metric<f64>,
        return_on_equity: Metric<f64>,
        return_on_assets: Metric<f64>,
        dividend_yield: Metric<f64>,
        payout_ratio: Metric<f64>,
    ) -> Self {
        Self {
            pe_ratio,
            return_on_equity,
            return_on_assets,
            dividend_yield,
            payout_ratio,
            dividend_score: DividendScore::from_metric(dividend_yield),
        }
    }
}

/// Per-observation moving averages aligned to the series' dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: Metric<f64>,
    pub sma_long: Metric<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub beta: Metric<f64>,
    pub volatility: Metric<f64>,
    pub sharpe_ratio: Metric<f64>,
    pub max_drawdown: Metric<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub annualized_return: Metric<f64>,
    pub alpha: Metric<f64>,
    pub information_ratio: Metric<f64>,
    pub tracking_error: Metric<f64>,
}
