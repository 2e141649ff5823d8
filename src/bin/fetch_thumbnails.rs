#![forbid(unsafe_code)]

//! Mirrors episode thumbnails into the local thumbnails directory so the
//! backend can serve them without hitting the image CDN.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use voa_episodes::{
    config::{AppConfig, init_logger},
    fallback::fallback_video_ids,
    thumbnails::{
        DEFAULT_THUMBNAIL_BASE, ThumbnailOptions, ThumbnailQuality, extract_video_id,
        fetch_thumbnails, read_id_list,
    },
    transport::UreqTransport,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Download episode thumbnails as <id>.jpg.")]
struct Cli {
    #[arg(
        value_name = "ID_OR_URL",
        help = "Video ids or watch URLs (default: the fallback episodes)"
    )]
    ids: Vec<String>,
    #[arg(
        long = "ids-file",
        value_name = "PATH",
        help = "Read ids from a file, one per line, # comments allowed"
    )]
    ids_file: Option<PathBuf>,
    #[arg(
        long = "dir",
        value_name = "PATH",
        help = "Output directory (default THUMBNAILS_DIR or public/thumbnails)"
    )]
    dir: Option<PathBuf>,
    #[arg(long = "quality", value_enum, default_value_t = ThumbnailQuality::MaxRes)]
    quality: ThumbnailQuality,
    #[arg(long = "base-url", value_name = "URL", default_value = DEFAULT_THUMBNAIL_BASE)]
    base_url: String,
}

fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();
    let config = AppConfig::load().context("loading configuration")?;

    let mut ids: Vec<String> = cli
        .ids
        .iter()
        .map(|raw| extract_video_id(raw).unwrap_or_else(|| raw.clone()))
        .collect();
    if let Some(path) = &cli.ids_file {
        ids.extend(read_id_list(path)?);
    }
    if ids.is_empty() {
        ids = fallback_video_ids();
    }

    let options = ThumbnailOptions {
        dir: cli.dir.unwrap_or(config.thumbnails_dir),
        base_url: cli.base_url,
        quality: cli.quality,
    };
    println!(
        "Fetching {} thumbnails into {}",
        ids.len(),
        options.dir.display()
    );

    let transport = UreqTransport::new();
    let report = fetch_thumbnails(&transport, &options, &ids)?;

    println!(
        "Done: {} downloaded, {} skipped, {} failed",
        report.downloaded,
        report.skipped,
        report.failed.len()
    );
    for (id, reason) in &report.failed {
        println!("  {id}: {reason}");
    }
    if !report.failed.is_empty() {
        bail!("{} thumbnails could not be fetched", report.failed.len());
    }
    Ok(())
}
