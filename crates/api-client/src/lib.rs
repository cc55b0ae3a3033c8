use crate::auth::CrumbStore;
use crate::error::ApiError;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use configuration::ProviderSettings;
use core_types::{FinancialSnapshot, PriceSeries};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

mod auth;
pub mod error;
pub mod responses;

// --- Public API ---
pub use responses::{ChartResponse, QuoteSummaryResponse};

/// The interface the dashboard uses to obtain market data.
///
/// Implementations return either a complete result or a single failure. They are
/// free to retry or cache internally; callers never do.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Daily observations for `ticker` between `start` and `end`, inclusive.
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError>;

    /// The latest company fundamentals for `ticker`.
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FinancialSnapshot, ApiError>;
}

/// A `MarketDataClient` backed by the public Yahoo Finance query API.
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
    cookie_url: String,
    crumb: CrumbStore,
}

impl YahooClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cookie_url: settings.cookie_url.clone(),
            crumb: CrumbStore::default(),
        })
    }

    /// Sends a GET request and decodes the body as `T`.
    ///
    /// Yahoo reports unknown tickers with a JSON error body on a 404, so the body
    /// is decoded before the status is judged.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<T>(&text) {
            Ok(body) => Ok(body),
            Err(_) if status == StatusCode::UNAUTHORIZED => {
                Err(ApiError::Unauthorized(truncate(&text)))
            }
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&text),
            }),
            Err(e) => Err(ApiError::Deserialization(e.to_string())),
        }
    }
}

#[async_trait]
impl MarketDataClient for YahooClient {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(ticker)
        );
        let period1 = day_start_timestamp(start)?;
        // period2 is exclusive, so ask for midnight after the last wanted day.
        let period2 = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ApiError::InvalidData(format!("end date {} out of range", end)))
            .and_then(day_start_timestamp)?;

        tracing::info!(ticker, %start, %end, "Fetching daily prices");
        let response: ChartResponse = self
            .get_json(
                &url,
                &[
                    ("period1", period1.to_string()),
                    ("period2", period2.to_string()),
                    ("interval", "1d".to_string()),
                    ("includePrePost", "false".to_string()),
                ],
            )
            .await?;

        let series = response.into_series(ticker)?;
        tracing::debug!(ticker, observations = series.len(), "Daily prices received");
        Ok(series)
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<FinancialSnapshot, ApiError> {
        let crumb = self
            .crumb
            .get(&self.client, &self.cookie_url, &self.base_url)
            .await?;
        let url = format!(
            "{}/v10/finance/quoteSummary/{}",
            self.base_url,
            urlencoding::encode(ticker)
        );

        tracing::info!(ticker, "Fetching fundamentals");
        let result: Result<QuoteSummaryResponse, ApiError> = self
            .get_json(
                &url,
                &[
                    ("modules", "summaryDetail,financialData".to_string()),
                    ("crumb", crumb),
                ],
            )
            .await;

        match result {
            Ok(response) => response.into_snapshot(ticker),
            Err(e @ ApiError::Unauthorized(_)) => {
                tracing::warn!(ticker, "Crumb rejected; the next request will renew it");
                self.crumb.invalidate().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

fn day_start_timestamp(day: NaiveDate) -> Result<i64, ApiError> {
    day.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| ApiError::InvalidData(format!("invalid date {}", day)))
}

fn truncate(text: &str) -> String {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
