use ak_birthdays::config::Config;
use ak_birthdays::infra::http_client::ReqwestPageFetcher;
use ak_birthdays::pipeline::Pipeline;
use ak_birthdays::{constants, logging, metrics};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "ak_birthdays")]
#[command(about = "Scrape the Arknights operator roster and export birthdays to CSV")]
#[command(version)]
struct Cli {
    /// Config file; built-in defaults are used when it does not exist
    #[arg(long, default_value = constants::CONFIG_FILE)]
    config: PathBuf,

    /// Where to write the CSV (overrides output.path)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of profile pages fetched at once (overrides enrichment.concurrency)
    #[arg(long)]
    concurrency: Option<usize>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_overrides(cli.output, cli.concurrency);
    config.validate().context("invalid configuration")?;

    let fetcher = ReqwestPageFetcher::new(&config.http).context("building HTTP client")?;
    let pipeline = Pipeline::new(config, Arc::new(fetcher));
    let result = pipeline.run().await?;

    info!(
        "📊 {} operators, {} birthdays found, {} failed -> {}",
        result.total_operators,
        result.birthdays_found,
        result.failed_operators.len(),
        result.output_file
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let log_guard = logging::init_logging();
    metrics::init_metrics();

    let cli = Cli::parse();
    let outcome = run(cli).await;
    metrics::log_snapshot();

    if let Err(e) = outcome {
        error!("❌ Run failed: {:#}", e);
        drop(log_guard);
        std::process::exit(1);
    }
}
