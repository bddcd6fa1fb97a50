use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use subscription_sync::app::SyncSubscriptionsUseCase;
use subscription_sync::common::constants::DEFAULT_CONFIG_PATH;
use subscription_sync::config::Config;
use subscription_sync::infra::http_client::ReqwestHttp;
use subscription_sync::observability::init_logging;
use subscription_sync::pipeline::ingestion::SheetResponse;
use subscription_sync::pipeline::processing::normalize::FieldNormalizer;
use subscription_sync::{StatusTally, SubscriptionRecord, SyncPipeline};

#[derive(Parser)]
#[command(name = "subscription_sync")]
#[command(about = "Synchronize subscription rows from the sheet backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory for rotated log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the subscription sheet and print the derived records
    Sync {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Run the pipeline over a saved sheet response instead of fetching
    Normalize {
        /// JSON file shaped like the backend response ({"success", "data"})
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Records as a JSON array
    Json,
    /// Per-status counts
    Summary,
}

fn print_output(records: &[SubscriptionRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Summary => {
            let tally = StatusTally::from_records(records);
            println!("📊 Subscriptions: {}", tally.total);
            for (status, count) in tally.by_name() {
                println!("   {status}: {count}");
            }
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Commands::Sync { format } => {
            let http = ReqwestHttp::new(config.source.timeout()).map_err(anyhow::Error::msg)?;
            let use_case = SyncSubscriptionsUseCase::from_config(&config, Arc::new(http))?;
            let outcome = use_case.run().await?;
            info!(
                received = outcome.rows_received,
                records = outcome.records.len(),
                "Sync finished"
            );
            print_output(&outcome.records, format)?;
        }
        Commands::Normalize { input, format } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let rows = SheetResponse::from_slice(&bytes)?.into_rows()?;
            let pipeline = SyncPipeline::new(
                config.columns.clone(),
                FieldNormalizer::from_config(&config.normalize),
            );
            let records = pipeline.synchronize(&rows);
            print_output(&records, format)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_logging(&cli.log_dir);

    if let Err(e) = run(cli).await {
        error!("Sync failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
