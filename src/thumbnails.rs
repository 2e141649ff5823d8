//! Pre-fetches video thumbnails into a local directory as `<id>.jpg`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::warn;
use regex::Regex;

use crate::transport::Transport;
use crate::upstream::is_video_id;

pub const DEFAULT_THUMBNAIL_BASE: &str = "https://img.youtube.com";

static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/(?:embed|shorts)/)([A-Za-z0-9_-]{11})",
    )
    .expect("valid video url pattern")
});

/// Image variants served under `/vi/<id>/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ThumbnailQuality {
    #[value(name = "default")]
    Default,
    #[value(name = "mqdefault")]
    Medium,
    #[value(name = "hqdefault")]
    High,
    #[value(name = "sddefault")]
    Standard,
    #[default]
    #[value(name = "maxresdefault")]
    MaxRes,
}

impl ThumbnailQuality {
    pub fn file_stem(self) -> &'static str {
        match self {
            ThumbnailQuality::Default => "default",
            ThumbnailQuality::Medium => "mqdefault",
            ThumbnailQuality::High => "hqdefault",
            ThumbnailQuality::Standard => "sddefault",
            ThumbnailQuality::MaxRes => "maxresdefault",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThumbnailOptions {
    pub dir: PathBuf,
    pub base_url: String,
    pub quality: ThumbnailQuality,
}

impl ThumbnailOptions {
    pub fn image_url(&self, video_id: &str) -> String {
        format!(
            "{}/vi/{video_id}/{}.jpg",
            self.base_url.trim_end_matches('/'),
            self.quality.file_stem()
        )
    }

    pub fn target_path(&self, video_id: &str) -> PathBuf {
        self.dir.join(format!("{video_id}.jpg"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThumbnailReport {
    pub downloaded: usize,
    pub skipped: usize,
    /// `(video id, reason)` per failure, in input order.
    pub failed: Vec<(String, String)>,
}

impl ThumbnailReport {
    fn record(&mut self, video_id: &str, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded => self.downloaded += 1,
            FetchOutcome::Skipped => self.skipped += 1,
            FetchOutcome::Failed(reason) => {
                self.failed.push((video_id.to_owned(), reason.clone()));
            }
        }
    }
}

/// Accepts a bare id or any of the usual watch/share/embed URLs.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(input.to_owned());
    }
    VIDEO_URL_RE
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_owned())
}

/// Reads one id (or URL) per line; blank lines and `#` comments are ignored.
/// Unrecognised lines are kept verbatim so they surface as failures.
pub fn read_id_list(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| extract_video_id(line).unwrap_or_else(|| line.to_owned()))
        .collect())
}

/// Downloads one thumbnail. Existing files are left untouched and a failed
/// download leaves no file behind.
pub fn fetch_thumbnail(
    transport: &dyn Transport,
    options: &ThumbnailOptions,
    video_id: &str,
) -> FetchOutcome {
    if !is_video_id(video_id) {
        return FetchOutcome::Failed("malformed video id".to_owned());
    }

    let target = options.target_path(video_id);
    if target.exists() {
        return FetchOutcome::Skipped;
    }

    let bytes = match transport.get_bytes(&options.image_url(video_id)) {
        Ok(bytes) if bytes.is_empty() => {
            return FetchOutcome::Failed("empty response body".to_owned());
        }
        Ok(bytes) => bytes,
        Err(err) => return FetchOutcome::Failed(err.to_string()),
    };

    let partial = options.dir.join(format!("{video_id}.jpg.part"));
    let written = fs::write(&partial, &bytes)
        .and_then(|()| fs::rename(&partial, &target))
        .with_context(|| format!("writing {}", target.display()));

    match written {
        Ok(()) => FetchOutcome::Downloaded,
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&partial)
                && partial.exists()
            {
                warn!("could not remove {}: {cleanup}", partial.display());
            }
            FetchOutcome::Failed(format!("{err:#}"))
        }
    }
}

/// Fetches every id in order, printing one progress line per id.
pub fn fetch_thumbnails(
    transport: &dyn Transport,
    options: &ThumbnailOptions,
    video_ids: &[String],
) -> Result<ThumbnailReport> {
    fs::create_dir_all(&options.dir)
        .with_context(|| format!("creating {}", options.dir.display()))?;

    let total = video_ids.len();
    let mut report = ThumbnailReport::default();
    for (index, video_id) in video_ids.iter().enumerate() {
        let position = index + 1;
        let outcome = fetch_thumbnail(transport, options, video_id);
        match &outcome {
            FetchOutcome::Downloaded => println!("[{position}/{total}] Downloaded {video_id}"),
            FetchOutcome::Skipped => println!("[{position}/{total}] Skipped {video_id} (exists)"),
            FetchOutcome::Failed(reason) => {
                warn!("[{position}/{total}] Failed {video_id}: {reason}")
            }
        }
        report.record(video_id, &outcome);
    }
    Ok(report)
}
