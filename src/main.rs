use anyhow::Context;
use api_client::YahooClient;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use configuration::settings::Config;
use configuration::{load_config, LoggingSettings};
use core_types::Lookback;
use dashboard::{render_decision, render_overview, render_stock_view, Dashboard};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// The main entry point for the Tadawul stock dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    // Held until exit so buffered file logs are flushed.
    let _guard = init_tracing(&config.logging)?;
    tracing::debug!(
        config = %cli.config.display(),
        listings = config.universe.listings.len(),
        benchmark = %config.universe.benchmark,
        "Configuration loaded"
    );

    let client = YahooClient::new(&config.provider).context("Failed to build the HTTP client")?;
    let dashboard = Dashboard::from_config(client, &config)?;
    let today = Utc::now().date_naive();

    match cli.command {
        Commands::Overview => handle_overview(&dashboard, cli.json).await,
        Commands::Analyze(args) => handle_analyze(&dashboard, &config, args, today, cli.json).await,
        Commands::Decide(args) => handle_decide(&dashboard, args, today, cli.json).await,
        Commands::Serve(args) => {
            let addr = args.addr.unwrap_or(config.server.addr);
            web_server::run_server(addr, dashboard).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Fundamentals, risk metrics and trend signals for Tadawul-listed stocks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Built-in defaults apply when it is missing.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print view-models as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the fundamentals of every listing in the universe.
    Overview,
    /// Risk, return and moving-average analysis of one stock.
    Analyze(AnalyzeArgs),
    /// Buy/sell/hold decision from the 50/200-session moving averages.
    Decide(DecideArgs),
    /// Serve the dashboard as a JSON API.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The ticker to analyze (e.g., "2222.SR").
    #[arg(long)]
    symbol: String,

    /// The analysis window: 1M, 3M, 6M, 1Y, 2Y or 5Y.
    #[arg(long)]
    period: Option<Lookback>,
}

#[derive(Parser)]
struct DecideArgs {
    /// The ticker to evaluate (e.g., "1180.SR").
    #[arg(long)]
    symbol: String,
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on. Overrides `server.addr` from the configuration.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_overview(dashboard: &Dashboard<YahooClient>, json: bool) -> anyhow::Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!(
        "Fetching fundamentals for {} listings...",
        dashboard.universe().listings.len()
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let overview = dashboard.market_overview().await;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        println!("{}", render_overview(&overview));
    }
    Ok(())
}

async fn handle_analyze(
    dashboard: &Dashboard<YahooClient>,
    config: &Config,
    args: AnalyzeArgs,
    today: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    let lookback = args.period.unwrap_or(config.universe.default_lookback);
    let view = dashboard
        .stock_view(&args.symbol, lookback, today)
        .await
        .with_context(|| format!("Failed to analyze {}", args.symbol))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_stock_view(&view));
    }
    Ok(())
}

async fn handle_decide(
    dashboard: &Dashboard<YahooClient>,
    args: DecideArgs,
    today: NaiveDate,
    json: bool,
) -> anyhow::Result<()> {
    let view = dashboard
        .decision(&args.symbol, today)
        .await
        .with_context(|| format!("Failed to evaluate {}", args.symbol))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_decision(&view));
    }
    Ok(())
}

/// Installs the global subscriber: stderr always, plus a daily rolling file
/// when `logging.directory` is set. `RUST_LOG` overrides the `info` default.
fn init_tracing(logging: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
