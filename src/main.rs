use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use wxbulletin::{
    BulletinConfig, BulletinError, BulletinPipeline, ChromiumRasterizer, DateContext,
    OpenAiProvider, Publisher, logging,
};

/// Daily severe weather risk bulletin generator
#[derive(Debug, Parser)]
#[command(name = "wxbulletin", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the report, image and redirect page
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Bulletin run failed: {:#}", err);
            match err.downcast_ref::<BulletinError>() {
                Some(bulletin_err) => {
                    eprintln!("{}", bulletin_err.user_message());
                    ExitCode::from(bulletin_err.exit_code())
                }
                None => {
                    eprintln!("Error: {err:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = BulletinConfig::load_from_path(cli.config.as_deref())
        .context("Loading configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    logging::init(&config.logging)?;

    // Missing credential is fatal before any filesystem or network work.
    let api_key = config.resolve_api_key()?;

    let dates = cli.date.map_or_else(DateContext::today, DateContext::for_date);

    let provider = OpenAiProvider::new(&config.provider, api_key)?;
    let rasterizer = ChromiumRasterizer::new(config.render.clone());
    let publisher = Publisher::new(config.output.directory.clone());

    let artifact = BulletinPipeline::new(provider, rasterizer, publisher)
        .run(&dates)
        .await?;

    tracing::info!(
        html = %artifact.html_path.display(),
        png = %artifact.png_path.display(),
        index = %artifact.index_path.display(),
        "Weather report generation completed successfully"
    );
    Ok(())
}
