use anyhow::Result;
use clap::Parser;
use dronz_cli::{parse_date, run, Config, RunOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Delivery date (YYYY-MM-DD)
    date: String,

    /// ILP REST service URL
    url: String,

    /// Directory for result files (overrides DRONZ_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Expanded-node budget per route search (overrides DRONZ_MAX_EXPANSIONS)
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Report moves that start at base as hovering
    #[arg(long)]
    hover_at_base: bool,
}

fn build_options(args: Args) -> Result<RunOptions> {
    let date = parse_date(&args.date)?;

    let mut config = Config::from_env();
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(max) = args.max_expansions.filter(|n| *n > 0) {
        config.max_expansions = max;
    }

    Ok(RunOptions {
        date,
        url: args.url,
        config,
        hover_at_base: args.hover_at_base,
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("dronz=info".parse()?))
        .init();

    let options = match build_options(Args::parse()) {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("{:#}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!("Planning deliveries for {} from {}", options.date, options.url);

    match run(&options).await {
        Ok(files) => {
            tracing::info!(
                "Results: {}, {}, {}",
                files.deliveries.display(),
                files.flightpath.display(),
                files.geojson.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
