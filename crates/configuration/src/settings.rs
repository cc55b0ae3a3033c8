use core_types::{Listing, Lookback};
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty `config.toml` yields a working
/// dashboard over the ten largest Tadawul listings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub market: MarketSettings,
    pub indicators: IndicatorSettings,
    pub provider: ProviderSettings,
    pub universe: Universe,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Market conventions used to annualize daily statistics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketSettings {
    /// Trading sessions per year. 252 is the usual equity-market convention.
    pub trading_days_per_year: f64,
    /// Annual risk-free rate as a fraction (e.g., 0.05 for 5%).
    pub risk_free_rate: f64,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252.0,
            risk_free_rate: 0.0,
        }
    }
}

/// Window lengths, in trading sessions, for the moving averages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub short_window: usize,
    pub long_window: usize,
    /// Fast moving average of the buy/sell/hold rule.
    pub trend_fast_window: usize,
    /// Slow moving average of the buy/sell/hold rule.
    pub trend_slow_window: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            short_window: 20,
            long_window: 50,
            trend_fast_window: 50,
            trend_slow_window: 200,
        }
    }
}

/// Where and how market data is fetched.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the Yahoo Finance query API.
    pub base_url: String,
    /// URL visited once to obtain the session cookie for fundamentals.
    pub cookie_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) tadawul-dashboard/0.1".to_string(),
        }
    }
}

/// The tickers the dashboard covers and the index they are measured against.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Universe {
    /// Benchmark used for beta, alpha and tracking error.
    pub benchmark: String,
    pub default_lookback: Lookback,
    pub listings: Vec<Listing>,
}

impl Universe {
    pub fn find(&self, symbol: &str) -> Option<&Listing> {
        self.listings
            .iter()
            .find(|l| l.symbol.eq_ignore_ascii_case(symbol))
    }
}

impl Default for Universe {
    fn default() -> Self {
        let listings = [
            ("2222.SR", "Saudi Aramco"),
            ("1180.SR", "Al Rajhi Bank"),
            ("2350.SR", "Saudi Telecom Co"),
            ("1010.SR", "SABIC"),
            ("1150.SR", "Alinma Bank"),
            ("2310.SR", "Zain KSA"),
            ("2380.SR", "Mobily"),
            ("1050.SR", "Saudi National Bank"),
            ("2001.SR", "ACWA Power"),
            ("2330.SR", "Advanced"),
        ]
        .into_iter()
        .map(|(symbol, name)| Listing {
            symbol: symbol.to_string(),
            name: name.to_string(),
        })
        .collect();

        Self {
            benchmark: "^TASI.SR".to_string(),
            default_lookback: Lookback::default(),
            listings,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000)),
        }
    }
}

/// Optional file logging. Console logging is always on.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for daily-rolling log files. `None` disables file output.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "tadawul.log".to_string(),
        }
    }
}
