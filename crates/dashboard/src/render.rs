//! Terminal rendering of view-models.
//!
//! Undefined metrics are shown as `N/A`. Fractions are shown as percentages.

use crate::view::{DecisionView, MarketOverview, StockView};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::{DividendScore, Metric};

/// Number of trailing price and indicator rows printed under a stock view.
const TABLE_TAIL: usize = 10;

const NOT_AVAILABLE: &str = "N/A";

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub(crate) fn percent(metric: Metric<f64>) -> String {
    match metric {
        Metric::Value(v) => format!("{:.2}%", v * 100.0),
        Metric::Undefined => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn number(metric: Metric<f64>) -> String {
    match metric {
        Metric::Value(v) => format!("{:.2}", v),
        Metric::Undefined => NOT_AVAILABLE.to_string(),
    }
}

fn score(metric: Metric<DividendScore>) -> String {
    match metric {
        Metric::Value(score) => score.to_string(),
        Metric::Undefined => NOT_AVAILABLE.to_string(),
    }
}

pub fn render_overview(overview: &MarketOverview) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Symbol",
        "Company",
        "P/E",
        "ROE",
        "ROA",
        "Dividend Yield",
        "Payout Ratio",
        "Dividend Score",
    ]);

    for row in &overview.rows {
        let f = &row.fundamentals;
        table.add_row(vec![
            row.listing.symbol.clone(),
            row.listing.name.clone(),
            number(f.pe_ratio),
            percent(f.return_on_equity),
            percent(f.return_on_assets),
            percent(f.dividend_yield),
            percent(f.payout_ratio),
            score(f.dividend_score),
        ]);
    }

    let mut out = table.to_string();
    for row in &overview.rows {
        if let Some(reason) = &row.failure {
            out.push_str(&format!("\n{}: {}", row.listing.symbol, reason));
        }
    }
    out
}

pub fn render_stock_view(view: &StockView) -> String {
    let mut summary = new_table();
    summary.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Period", format!("{} ({} to {})", view.lookback, view.start, view.end)),
        ("Last Close", number(view.latest_close)),
        ("Decision", view.decision.to_string()),
        ("Beta", number(view.risk.beta)),
        ("Volatility", percent(view.risk.volatility)),
        ("Sharpe Ratio", number(view.risk.sharpe_ratio)),
        ("Max Drawdown", percent(view.risk.max_drawdown)),
        ("Annualized Return", percent(view.portfolio.annualized_return)),
        ("Alpha", percent(view.portfolio.alpha)),
        ("Information Ratio", number(view.portfolio.information_ratio)),
        ("Tracking Error", percent(view.portfolio.tracking_error)),
        ("P/E", number(view.fundamentals.pe_ratio)),
        ("ROE", percent(view.fundamentals.return_on_equity)),
        ("ROA", percent(view.fundamentals.return_on_assets)),
        ("Dividend Yield", percent(view.fundamentals.dividend_yield)),
        ("Payout Ratio", percent(view.fundamentals.payout_ratio)),
        ("Dividend Score", score(view.fundamentals.dividend_score)),
    ];
    for (label, value) in rows {
        summary.add_row(vec![label.to_string(), value]);
    }

    let mut prices = new_table();
    prices.set_header(vec!["Date", "Close", "Volume"]);
    let skip = view.history.len().saturating_sub(TABLE_TAIL);
    for point in view.history.iter().skip(skip) {
        prices.add_row(vec![
            point.date.to_string(),
            format!("{:.2}", point.close),
            format!("{:.0}", point.volume),
        ]);
    }

    let mut indicators = new_table();
    indicators.set_header(vec!["Date", "Close", "SMA Short", "SMA Long"]);
    let skip = view.indicators.len().saturating_sub(TABLE_TAIL);
    for row in view.indicators.iter().skip(skip) {
        indicators.add_row(vec![
            row.date.to_string(),
            format!("{:.2}", row.close),
            number(row.sma_short),
            number(row.sma_long),
        ]);
    }

    format!(
        "{} ({}) vs {}\n{}\n{}\n{}",
        view.listing.name, view.listing.symbol, view.benchmark, summary, prices, indicators
    )
}

pub fn render_decision(view: &DecisionView) -> String {
    format!(
        "{} ({}) as of {}: {} [{} observations]",
        view.listing.name, view.listing.symbol, view.as_of, view.label, view.observations
    )
}
