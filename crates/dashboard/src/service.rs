use crate::error::DashboardError;
use crate::view::{DecisionView, MarketOverview, OverviewRow, PricePoint, StockView};
use analytics::{AnalyticsEngine, Conventions, IndicatorWindows};
use api_client::MarketDataClient;
use api_client::error::ApiError;
use chrono::{Days, NaiveDate};
use configuration::settings::Config;
use configuration::Universe;
use core_types::{FinancialSnapshot, Listing, Lookback, TrendSignal};
use futures::future::join_all;

/// History used for the buy/sell/hold rule. Long enough for a 200-session SMA.
const DECISION_LOOKBACK: Lookback = Lookback::OneYear;

/// Builds view-models by pairing the data supplier with the analytics engine.
///
/// Every call fetches fresh data and computes from scratch; nothing is kept
/// between requests, so one `Dashboard` can serve concurrent callers.
pub struct Dashboard<C> {
    client: C,
    engine: AnalyticsEngine,
    universe: Universe,
}

impl<C: MarketDataClient> Dashboard<C> {
    pub fn new(client: C, engine: AnalyticsEngine, universe: Universe) -> Self {
        Self {
            client,
            engine,
            universe,
        }
    }

    /// Wires the engine parameters and the universe from the application config.
    pub fn from_config(client: C, config: &Config) -> Result<Self, DashboardError> {
        let conventions = Conventions {
            trading_days_per_year: config.market.trading_days_per_year,
            risk_free_rate: config.market.risk_free_rate,
        };
        let windows = IndicatorWindows {
            short: config.indicators.short_window,
            long: config.indicators.long_window,
            trend_fast: config.indicators.trend_fast_window,
            trend_slow: config.indicators.trend_slow_window,
        };
        let engine = AnalyticsEngine::new(conventions, windows)?;
        Ok(Self::new(client, engine, config.universe.clone()))
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn listing(&self, symbol: &str) -> Result<&Listing, DashboardError> {
        self.universe
            .find(symbol)
            .ok_or_else(|| DashboardError::UnknownSymbol(symbol.to_string()))
    }

    /// Builds the single-stock screen for the `lookback` window ending `today`.
    ///
    /// The asset series, the benchmark series and the fundamentals are fetched
    /// concurrently. Any supplier failure fails the whole view.
    pub async fn stock_view(
        &self,
        symbol: &str,
        lookback: Lookback,
        today: NaiveDate,
    ) -> Result<StockView, DashboardError> {
        let listing = self.listing(symbol)?.clone();
        let start = window_start(today, lookback);
        // The asset history must also cover the trend rule's window.
        let fetch_from = start.min(window_start(today, DECISION_LOOKBACK));
        let benchmark = self.universe.benchmark.as_str();

        tracing::info!(symbol = %listing.symbol, %lookback, %start, %today, "Building stock view");

        let (full, bench, fundamentals) = futures::try_join!(
            async {
                self.client
                    .fetch(&listing.symbol, fetch_from, today)
                    .await
                    .map_err(|e| DashboardError::supplier(&listing.symbol, e))
            },
            async {
                self.client
                    .fetch(benchmark, start, today)
                    .await
                    .map_err(|e| DashboardError::supplier(benchmark, e))
            },
            async {
                self.client
                    .fetch_fundamentals(&listing.symbol)
                    .await
                    .map_err(|e| DashboardError::supplier(&listing.symbol, e))
            },
        )?;

        let series = full.since(start);
        let report = self.engine.report(&series, &bench);
        let history = series
            .bars()
            .iter()
            .map(|b| PricePoint {
                date: b.date,
                close: b.close,
                volume: b.volume,
            })
            .collect();

        Ok(StockView {
            listing,
            benchmark: benchmark.to_string(),
            lookback,
            start,
            end: today,
            latest_close: report.latest_close,
            decision: self.engine.trend_decision(&full),
            fundamentals,
            history,
            indicators: report.indicators,
            risk: report.risk,
            portfolio: report.portfolio,
        })
    }

    /// Runs the moving-average trend rule over the last year of prices.
    ///
    /// A ticker for which the supplier has no prices at all gets
    /// `TrendSignal::InsufficientData`; other supplier failures are errors.
    pub async fn decision(
        &self,
        symbol: &str,
        today: NaiveDate,
    ) -> Result<DecisionView, DashboardError> {
        let listing = self.listing(symbol)?.clone();
        let start = window_start(today, DECISION_LOOKBACK);

        let (signal, observations) = match self.client.fetch(&listing.symbol, start, today).await {
            Ok(series) => (self.engine.trend_decision(&series), series.len()),
            Err(ApiError::NoData(_)) => {
                tracing::warn!(symbol = %listing.symbol, "No price history available");
                (TrendSignal::InsufficientData, 0)
            }
            Err(e) => return Err(DashboardError::supplier(&listing.symbol, e)),
        };

        Ok(DecisionView {
            listing,
            as_of: today,
            observations,
            signal,
            label: signal.label(),
        })
    }

    /// Fetches fundamentals for every listing concurrently.
    ///
    /// A failing listing does not fail the table: its row carries the error
    /// message and undefined fundamentals.
    pub async fn market_overview(&self) -> MarketOverview {
        let requests = self.universe.listings.iter().map(|listing| async move {
            match self.client.fetch_fundamentals(&listing.symbol).await {
                Ok(fundamentals) => OverviewRow {
                    listing: listing.clone(),
                    fundamentals,
                    failure: None,
                },
                Err(e) => {
                    tracing::warn!(
                        symbol = %listing.symbol,
                        error = %e,
                        "Fundamentals unavailable"
                    );
                    OverviewRow {
                        listing: listing.clone(),
                        fundamentals: FinancialSnapshot::default(),
                        failure: Some(e.to_string()),
                    }
                }
            }
        });

        let overview = MarketOverview {
            rows: join_all(requests).await,
        };
        tracing::info!(
            listings = overview.rows.len(),
            failures = overview.failures(),
            "Market overview assembled"
        );
        overview
    }
}

fn window_start(today: NaiveDate, lookback: Lookback) -> NaiveDate {
    today
        .checked_sub_days(Days::new(lookback.days().unsigned_abs()))
        .unwrap_or(NaiveDate::MIN)
}
