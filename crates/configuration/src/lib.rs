use crate::error::ConfigError;
use crate::settings::Config;
use std::collections::HashSet;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    IndicatorSettings, LoggingSettings, MarketSettings, ProviderSettings, ServerSettings, Universe,
};

/// Prefix for environment overrides, e.g. `TADAWUL__MARKET__RISK_FREE_RATE=0.055`.
pub const ENV_PREFIX: &str = "TADAWUL";

/// Loads the application configuration from a TOML file plus environment overrides.
///
/// The file is optional: when it does not exist the built-in defaults apply.
/// The merged result is validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    tracing::debug!(
        path = %path.display(),
        listings = config.universe.listings.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Parses and validates configuration from an in-memory TOML document.
pub fn load_config_from_str(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Checks the cross-field rules that serde cannot express.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let market = &config.market;
    if !market.trading_days_per_year.is_finite() || market.trading_days_per_year <= 0.0 {
        return Err(ConfigError::ValidationError(
            "market.trading_days_per_year must be a positive number".to_string(),
        ));
    }
    if !market.risk_free_rate.is_finite() {
        return Err(ConfigError::ValidationError(
            "market.risk_free_rate must be a finite number".to_string(),
        ));
    }

    let ind = &config.indicators;
    let windows = [
        ("short_window", ind.short_window),
        ("long_window", ind.long_window),
        ("trend_fast_window", ind.trend_fast_window),
        ("trend_slow_window", ind.trend_slow_window),
    ];
    if let Some((name, _)) = windows.iter().find(|(_, w)| *w == 0) {
        return Err(ConfigError::ValidationError(format!(
            "indicators.{} must be at least 1",
            name
        )));
    }
    if ind.trend_fast_window >= ind.trend_slow_window {
        return Err(ConfigError::ValidationError(
            "indicators.trend_fast_window must be shorter than trend_slow_window".to_string(),
        ));
    }

    if config.provider.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "provider.timeout_secs must be at least 1".to_string(),
        ));
    }

    let universe = &config.universe;
    if universe.benchmark.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "universe.benchmark must name a ticker".to_string(),
        ));
    }
    if universe.listings.is_empty() {
        return Err(ConfigError::ValidationError(
            "universe.listings must contain at least one ticker".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for listing in &universe.listings {
        if !seen.insert(listing.symbol.to_ascii_uppercase()) {
            return Err(ConfigError::ValidationError(format!(
                "universe.listings contains {} more than once",
                listing.symbol
            )));
        }
    }

    Ok(())
}
