use crate::error::AnalyticsError;
use crate::report::StockReport;
use crate::stats::{
    align_closes, annualized_growth, mean, sample_std_dev, simple_returns, slope, trailing_mean,
};
use chrono::NaiveDate;
use core_types::{
    DividendScore, Metric, PortfolioMetrics, PriceSeries, RiskMetrics, TechnicalIndicatorRow,
    TrendSignal,
};
use serde::{Deserialize, Serialize};

/// Market conventions used to annualize daily statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conventions {
    /// Number of trading sessions in a year, used to annualize daily figures.
    pub trading_days_per_year: f64,
    /// Annual risk-free rate as a fraction (0.05 is 5%).
    pub risk_free_rate: f64,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252.0,
            risk_free_rate: 0.0,
        }
    }
}

/// Window lengths, in observations, for the moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorWindows {
    /// Short SMA in the technical indicator table.
    pub short: usize,
    /// Long SMA in the technical indicator table.
    pub long: usize,
    /// Fast SMA of the trend rule.
    pub trend_fast: usize,
    /// Slow SMA of the trend rule. Also the minimum history for a decision.
    pub trend_slow: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            short: 20,
            long: 50,
            trend_fast: 50,
            trend_slow: 200,
        }
    }
}

/// A stateless calculator for the dashboard's descriptive statistics.
///
/// Every method is a pure function of its arguments and the engine's parameters,
/// so calling it twice with the same series yields bit-identical output.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    conventions: Conventions,
    windows: IndicatorWindows,
}

impl AnalyticsEngine {
    pub fn new(
        conventions: Conventions,
        windows: IndicatorWindows,
    ) -> Result<Self, AnalyticsError> {
        let days = conventions.trading_days_per_year;
        if !days.is_finite() || days <= 0.0 {
            return Err(AnalyticsError::InvalidParameters(format!(
                "trading_days_per_year must be positive, got {}",
                days
            )));
        }
        if !conventions.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidParameters(
                "risk_free_rate must be a finite number".to_string(),
            ));
        }
        for window in [windows.short, windows.long, windows.trend_fast, windows.trend_slow] {
            if window == 0 {
                return Err(AnalyticsError::InvalidWindow(window));
            }
        }
        if windows.trend_fast >= windows.trend_slow {
            return Err(AnalyticsError::InvalidParameters(format!(
                "trend_fast ({}) must be shorter than trend_slow ({})",
                windows.trend_fast, windows.trend_slow
            )));
        }
        Ok(Self {
            conventions,
            windows,
        })
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    pub fn windows(&self) -> &IndicatorWindows {
        &self.windows
    }

    /// Trailing simple moving average of closes, aligned to the series' dates.
    ///
    /// Positions before index `window - 1` are `Undefined`; a series shorter than
    /// the window is undefined everywhere.
    pub fn moving_average(
        &self,
        series: &PriceSeries,
        window: usize,
    ) -> Result<Vec<(NaiveDate, Metric<f64>)>, AnalyticsError> {
        if window == 0 {
            return Err(AnalyticsError::InvalidWindow(window));
        }
        let closes = series.closes();
        Ok(series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, sma_at(&closes, i, window)))
            .collect())
    }

    /// Applies the moving-average trend rule at the latest observation.
    pub fn trend_decision(&self, series: &PriceSeries) -> TrendSignal {
        let closes = series.closes();
        let Some(last) = closes.len().checked_sub(1) else {
            return TrendSignal::InsufficientData;
        };
        if closes.len() < self.windows.trend_slow {
            return TrendSignal::InsufficientData;
        }
        let (Some(fast), Some(slow)) = (
            trailing_mean(&closes, last, self.windows.trend_fast),
            trailing_mean(&closes, last, self.windows.trend_slow),
        ) else {
            return TrendSignal::InsufficientData;
        };
        let price = closes[last];

        tracing::debug!(
            symbol = series.symbol(),
            price,
            fast,
            slow,
            "Evaluating trend rule"
        );

        if price > fast && fast > slow {
            TrendSignal::Buy
        } else if price < fast && fast < slow {
            TrendSignal::Sell
        } else {
            TrendSignal::Hold
        }
    }

    /// Annualized sample standard deviation of daily returns.
    ///
    /// `Undefined` with fewer than two returns or when prices never move.
    pub fn volatility(&self, series: &PriceSeries) -> Metric<f64> {
        let returns = simple_returns(&series.closes());
        self.annualized_std(&returns)
            .and_then(|v| if v == 0.0 { Metric::Undefined } else { Metric::Value(v) })
    }

    /// Most negative fractional decline from the running peak close.
    pub fn max_drawdown(&self, series: &PriceSeries) -> Metric<f64> {
        if series.is_empty() {
            return Metric::Undefined;
        }
        let mut peak = f64::MIN;
        let mut worst = 0.0_f64;
        for close in series.closes() {
            peak = peak.max(close);
            if peak > 0.0 {
                worst = worst.min(close / peak - 1.0);
            }
        }
        Metric::finite(worst)
    }

    /// Annualized excess return per unit of annualized volatility.
    pub fn sharpe_ratio(&self, series: &PriceSeries) -> Metric<f64> {
        let returns = simple_returns(&series.closes());
        let excess = match mean(&returns) {
            Some(m) => m * self.conventions.trading_days_per_year - self.conventions.risk_free_rate,
            None => return Metric::Undefined,
        };
        self.volatility(series)
            .and_then(|vol| Metric::finite(excess / vol))
    }

    /// Slope of the asset's returns on the benchmark's, over their shared dates.
    pub fn beta(&self, series: &PriceSeries, benchmark: &PriceSeries) -> Metric<f64> {
        let (asset, bench) = align_closes(series, benchmark);
        aligned_beta(&asset, &bench)
    }

    /// Compound annual growth rate of the close price.
    pub fn annualized_return(&self, series: &PriceSeries) -> Metric<f64> {
        self.growth(&series.closes())
    }

    /// Jensen's alpha of the asset against the benchmark.
    pub fn alpha(&self, series: &PriceSeries, benchmark: &PriceSeries) -> Metric<f64> {
        let (asset, bench) = align_closes(series, benchmark);
        let rf = self.conventions.risk_free_rate;
        let beta = aligned_beta(&asset, &bench);
        match (beta, self.growth(&asset), self.growth(&bench)) {
            (Metric::Value(beta), Metric::Value(ra), Metric::Value(rb)) => {
                Metric::finite(ra - (rf + beta * (rb - rf)))
            }
            _ => Metric::Undefined,
        }
    }

    /// Annualized standard deviation of the per-period active return.
    ///
    /// Zero is a legitimate value here (an asset tracking its benchmark exactly).
    pub fn tracking_error(&self, series: &PriceSeries, benchmark: &PriceSeries) -> Metric<f64> {
        let active = active_returns(series, benchmark);
        self.annualized_std(&active)
    }

    /// Annualized mean active return per unit of tracking error.
    pub fn information_ratio(&self, series: &PriceSeries, benchmark: &PriceSeries) -> Metric<f64> {
        let active = active_returns(series, benchmark);
        let Some(active_mean) = mean(&active) else {
            return Metric::Undefined;
        };
        self.annualized_std(&active).and_then(|te| {
            if te == 0.0 {
                Metric::Undefined
            } else {
                Metric::finite(active_mean * self.conventions.trading_days_per_year / te)
            }
        })
    }

    pub fn dividend_score(&self, dividend_yield: f64) -> DividendScore {
        DividendScore::from_yield(dividend_yield)
    }

    /// Short and long SMAs for every observation.
    pub fn technical_indicators(&self, series: &PriceSeries) -> Vec<TechnicalIndicatorRow> {
        let closes = series.closes();
        series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| TechnicalIndicatorRow {
                date: bar.date,
                close: bar.close,
                sma_short: sma_at(&closes, i, self.windows.short),
                sma_long: sma_at(&closes, i, self.windows.long),
            })
            .collect()
    }

    pub fn risk_metrics(&self, series: &PriceSeries, benchmark: &PriceSeries) -> RiskMetrics {
        RiskMetrics {
            beta: self.beta(series, benchmark),
            volatility: self.volatility(series),
            sharpe_ratio: self.sharpe_ratio(series),
            max_drawdown: self.max_drawdown(series),
        }
    }

    pub fn portfolio_metrics(
        &self,
        series: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> PortfolioMetrics {
        PortfolioMetrics {
            annualized_return: self.annualized_return(series),
            alpha: self.alpha(series, benchmark),
            information_ratio: self.information_ratio(series, benchmark),
            tracking_error: self.tracking_error(series, benchmark),
        }
    }

    /// Everything the engine derives for one stock in a single pass.
    pub fn report(&self, series: &PriceSeries, benchmark: &PriceSeries) -> StockReport {
        let report = StockReport {
            symbol: series.symbol().to_string(),
            observations: series.len(),
            latest_close: series.last().map(|b| b.close).into(),
            decision: self.trend_decision(series),
            indicators: self.technical_indicators(series),
            risk: self.risk_metrics(series, benchmark),
            portfolio: self.portfolio_metrics(series, benchmark),
        };
        tracing::debug!(
            symbol = %report.symbol,
            observations = report.observations,
            decision = %report.decision,
            "Computed stock report"
        );
        report
    }

    fn annualized_std(&self, returns: &[f64]) -> Metric<f64> {
        Metric::from(sample_std_dev(returns))
            .and_then(|sd| Metric::finite(sd * self.conventions.trading_days_per_year.sqrt()))
    }

    fn growth(&self, closes: &[f64]) -> Metric<f64> {
        Metric::from(annualized_growth(closes, self.conventions.trading_days_per_year))
            .and_then(Metric::finite)
    }
}

fn sma_at(closes: &[f64], index: usize, window: usize) -> Metric<f64> {
    Metric::from(trailing_mean(closes, index, window)).and_then(Metric::finite)
}

fn aligned_beta(asset: &[f64], bench: &[f64]) -> Metric<f64> {
    if asset.len() < 2 {
        return Metric::Undefined;
    }
    let ra = simple_returns(asset);
    let rb = simple_returns(bench);
    Metric::from(slope(&ra, &rb)).and_then(Metric::finite)
}

fn active_returns(series: &PriceSeries, benchmark: &PriceSeries) -> Vec<f64> {
    let (asset, bench) = align_closes(series, benchmark);
    simple_returns(&asset)
        .into_iter()
        .zip(simple_returns(&bench))
        .map(|(a, b)| a - b)
        .collect()
}
