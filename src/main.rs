use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use confluence::config::{Config, StoragePaths};
use confluence::services::{publish_scan, run_report, universe, Enricher, PositionGuard, Scanner};
use confluence::sources::{ScreenerClient, TelegramNotifier, YahooFinanceClient};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding the CSV inputs and outputs (overrides DATA_DIR)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the candidate list and publish graded setups
    Scan {
        /// Maximum number of symbols to read from the candidate list
        #[arg(long)]
        top_n: Option<usize>,
    },

    /// Merge fundamentals into the saved candidates
    Enrich,

    /// Generate commentary and alert on entry candidates
    Report,

    /// Check held positions for MACD weakening
    Guard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.storage = StoragePaths::new(dir);
    }

    match cli.command {
        Commands::Scan { top_n } => {
            let notifier = TelegramNotifier::new(config.telegram()?)?;
            let provider = Arc::new(YahooFinanceClient::new(config.scan.symbol_suffix.clone())?);

            let symbols = universe::scan_universe(&config.storage, top_n.unwrap_or(config.scan.top_n));
            let scanner = Scanner::new(provider, config.scan.clone(), config.thresholds.clone());
            let report = scanner.run(&symbols).await;
            publish_scan(&report, &config.storage, &notifier).await?;
        }
        Commands::Enrich => {
            let provider = Arc::new(ScreenerClient::new(&config.enrichment)?);
            let enricher = Enricher::new(provider, config.enrichment.request_delay());
            let count = enricher.run(&config.storage).await?;
            info!("Enriched {} records", count);
        }
        Commands::Report => {
            let notifier = TelegramNotifier::new(config.telegram()?)?;
            run_report(&config.storage, &config.thresholds, &notifier).await?;
        }
        Commands::Guard => {
            let notifier = TelegramNotifier::new(config.telegram()?)?;
            let provider = Arc::new(YahooFinanceClient::new(config.scan.symbol_suffix.clone())?);

            let positions = universe::load_positions(&config.storage)?;
            let guard = PositionGuard::new(provider, &config.scan, config.guard.clone());
            guard.run(&positions, &notifier).await;
        }
    }

    Ok(())
}
