use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use courtside_cli::app;

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Courtside - fetch, save and explore the latest NBA statistics")]
#[command(version)]
struct Cli {
    /// LLM model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Directory for saved reports
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Fetch and save once, then exit
    #[arg(long)]
    once: bool,

    /// Look up stock ticker symbols for the given companies and exit
    #[arg(long, num_args = 1.., value_name = "COMPANY")]
    ticker: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = courtside_core::Settings::load();

    if let Some(model) = cli.model {
        settings.llm.model = model;
    }
    if let Some(dir) = cli.output_dir {
        settings.output.dir = dir;
    }
    settings.validate()?;

    if !cli.ticker.is_empty() {
        app::run_ticker_lookup(&settings, &cli.ticker).await?;
    } else if cli.once {
        app::run_once(&settings).await?;
    } else {
        app::run_interactive(&settings).await?;
    }

    Ok(())
}
