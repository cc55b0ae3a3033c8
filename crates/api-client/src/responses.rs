use crate::error::ApiError;
use chrono::{DateTime, NaiveDate};
use core_types::{Bar, FinancialSnapshot, Metric, PriceSeries};
use serde::Deserialize;
use std::collections::BTreeMap;

// Yahoo wraps every payload in a `{ result, error }` envelope keyed by endpoint name.

/// Body of `GET /v8/finance/chart/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Envelope<ChartResult>,
}

/// Body of `GET /v10/finance/quoteSummary/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: Envelope<QuoteSummaryResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub result: Option<Vec<T>>,
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub symbol: String,
    /// Exchange offset from UTC in seconds (10800 for Tadawul).
    #[serde(default, rename = "gmtoffset")]
    pub gmt_offset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    #[serde(default)]
    pub summary_detail: Option<SummaryDetail>,
    #[serde(default)]
    pub financial_data: Option<FinancialData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(default, rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    #[serde(default)]
    pub dividend_yield: Option<RawValue>,
    #[serde(default)]
    pub payout_ratio: Option<RawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(default)]
    pub return_on_equity: Option<RawValue>,
    #[serde(default)]
    pub return_on_assets: Option<RawValue>,
}

/// Yahoo's `{ "raw": 0.05, "fmt": "5.00%" }` wrapper. Missing fields arrive as `{}`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawValue {
    #[serde(default)]
    pub raw: Option<f64>,
}

fn metric(value: Option<RawValue>) -> Metric<f64> {
    Metric::from(value.and_then(|v| v.raw)).and_then(Metric::finite)
}

fn first_result<T>(envelope: Envelope<T>, symbol: &str) -> Result<T, ApiError> {
    if let Some(error) = envelope.error {
        return Err(ApiError::Provider {
            code: error.code,
            description: error.description,
        });
    }
    envelope
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::NoData(symbol.to_string()))
}

impl ChartResponse {
    /// Converts the chart payload into a validated daily series.
    ///
    /// Timestamps are shifted by the exchange offset before taking the calendar
    /// day. Observations with a missing price are dropped, and when two
    /// timestamps fall on the same day the later one wins.
    pub fn into_series(self, symbol: &str) -> Result<PriceSeries, ApiError> {
        let result = first_result(self.chart, symbol)?;
        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
        let offset = result.meta.gmt_offset;

        let mut days: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
        let mut skipped = 0usize;
        for (i, ts) in timestamps.into_iter().enumerate() {
            let at = |column: &Vec<Option<f64>>| column.get(i).copied().flatten();
            let (Some(open), Some(high), Some(low), Some(close)) =
                (at(&quote.open), at(&quote.high), at(&quote.low), at(&quote.close))
            else {
                skipped += 1;
                continue;
            };
            let date = DateTime::from_timestamp(ts + offset, 0)
                .ok_or_else(|| ApiError::InvalidData(format!("timestamp {} out of range", ts)))?
                .date_naive();
            days.insert(
                date,
                Bar {
                    date,
                    open,
                    high,
                    low,
                    close,
                    volume: at(&quote.volume).unwrap_or(0.0),
                },
            );
        }

        if skipped > 0 {
            tracing::debug!(symbol, skipped, "Dropped incomplete observations");
        }
        if days.is_empty() {
            return Err(ApiError::NoData(symbol.to_string()));
        }

        PriceSeries::new(result.meta.symbol, days.into_values().collect())
            .map_err(|e| ApiError::InvalidData(e.to_string()))
    }
}

impl QuoteSummaryResponse {
    pub fn into_snapshot(self, symbol: &str) -> Result<FinancialSnapshot, ApiError> {
        let result = first_result(self.quote_summary, symbol)?;
        let detail = result.summary_detail.unwrap_or_default();
        let financial = result.financial_data.unwrap_or_default();

        Ok(FinancialSnapshot::new(
            metric(detail.trailing_pe),
            metric(financial.return_on_equity),
            metric(financial.return_on_assets),
            metric(detail.dividend_yield),
            metric(detail.payout_ratio),
        ))
    }
}
