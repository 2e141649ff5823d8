#![forbid(unsafe_code)]

//! Runs the ingestion pipeline once and prints the resulting payload, the same
//! JSON `GET /api/episodes` answers with.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::{fs, path::PathBuf, sync::Arc};
use voa_episodes::{
    config::{AppConfig, init_logger},
    pipeline::EpisodeService,
    transport::UreqTransport,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the current episode list as JSON.")]
struct Cli {
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Write to a file instead of stdout"
    )]
    output: Option<PathBuf>,
    #[arg(
        long = "fallback-only",
        help = "Skip YouTube and dump the built-in fallback list"
    )]
    fallback_only: bool,
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let mut config = AppConfig::load().context("loading configuration")?;
    if cli.fallback_only {
        config.pipeline.api_key = None;
    }

    let service = EpisodeService::new(&config.pipeline, Arc::new(UreqTransport::new()));
    let payload = service.payload();
    let json = serde_json::to_string_pretty(&payload).context("serializing episodes")?;

    match &cli.output {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                "wrote {} {} episodes to {}",
                payload.episodes.len(),
                payload.source.as_str(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
