//! Episode ingestion: channel -> uploads playlist -> video details -> episodes.
//!
//! [`EpisodeService::ingest`] reports exactly why live data was not used, and
//! [`EpisodeService::episodes`] turns any such outcome into the static
//! fallback list. Callers never see an upstream failure.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::client::{DEFAULT_API_BASE, MAX_BATCH, YouTubeClient};
use crate::episode::Episode;
use crate::fallback::fallback_episodes;
use crate::mapper::map_video;
use crate::transport::Transport;
use crate::upstream::{UpstreamError, is_video_id};

/// Channel ingested when none is configured.
pub const DEFAULT_CHANNEL_ID: &str = "UCm3pV8kQ2sN7xR4tY6wZ1aB";
pub const DEFAULT_PLAYLIST_PAGES: u32 = 1;

/// Read-only inputs of the pipeline, built once at startup.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// `None` selects the fallback-only mode.
    pub api_key: Option<String>,
    pub channel_id: String,
    pub api_base: String,
    /// Upper bound on uploads playlist pages followed via `nextPageToken`.
    pub playlist_pages: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            channel_id: DEFAULT_CHANNEL_ID.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            playlist_pages: DEFAULT_PLAYLIST_PAGES,
        }
    }
}

/// Why the static list was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NotConfigured,
    ChannelNotFound(String),
    NoUploadsPlaylist(String),
    EmptyPlaylist,
    Upstream(UpstreamError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NotConfigured => f.write_str("no YouTube API key configured"),
            FallbackReason::ChannelNotFound(id) => write!(f, "channel {id} not found"),
            FallbackReason::NoUploadsPlaylist(id) => {
                write!(f, "channel {id} exposes no uploads playlist")
            }
            FallbackReason::EmptyPlaylist => f.write_str("uploads playlist contains no videos"),
            FallbackReason::Upstream(err) => write!(f, "{err}"),
        }
    }
}

impl From<UpstreamError> for FallbackReason {
    fn from(err: UpstreamError) -> Self {
        FallbackReason::Upstream(err)
    }
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ingestion {
    Live(Vec<Episode>),
    Fallback(FallbackReason),
}

/// Where the episodes handed to a consumer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeSource {
    YouTube,
    Fallback,
}

impl EpisodeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            EpisodeSource::YouTube => "youtube",
            EpisodeSource::Fallback => "fallback",
        }
    }
}

/// Body of `GET /api/episodes` and of the `dump_episodes` output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesPayload {
    pub source: EpisodeSource,
    pub generated_at: DateTime<Utc>,
    pub episodes: Vec<Episode>,
}

pub struct EpisodeService {
    client: Option<YouTubeClient>,
    channel_id: String,
    playlist_pages: u32,
}

impl EpisodeService {
    pub fn new(config: &PipelineConfig, transport: Arc<dyn Transport>) -> Self {
        let client = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| YouTubeClient::new(transport, config.api_base.as_str(), key));
        Self {
            client,
            channel_id: config.channel_id.clone(),
            playlist_pages: config.playlist_pages.max(1),
        }
    }

    /// Runs the pipeline once.
    pub fn ingest(&self) -> Ingestion {
        let Some(client) = &self.client else {
            return Ingestion::Fallback(FallbackReason::NotConfigured);
        };
        match self.run(client) {
            Ok(episodes) => Ingestion::Live(episodes),
            Err(reason) => Ingestion::Fallback(reason),
        }
    }

    /// Live episodes when ingestion succeeds, the static list otherwise.
    pub fn episodes(&self) -> (EpisodeSource, Vec<Episode>) {
        match self.ingest() {
            Ingestion::Live(episodes) => {
                info!("ingested {} episodes from YouTube", episodes.len());
                (EpisodeSource::YouTube, episodes)
            }
            Ingestion::Fallback(reason) => {
                if reason == FallbackReason::NotConfigured {
                    info!("serving fallback episodes: {reason}");
                } else {
                    warn!("serving fallback episodes: {reason}");
                }
                (EpisodeSource::Fallback, fallback_episodes())
            }
        }
    }

    pub fn payload(&self) -> EpisodesPayload {
        let (source, episodes) = self.episodes();
        EpisodesPayload {
            source,
            generated_at: Utc::now(),
            episodes,
        }
    }

    fn run(&self, client: &YouTubeClient) -> Result<Vec<Episode>, FallbackReason> {
        let channel = client
            .fetch_channel(&self.channel_id)?
            .ok_or_else(|| FallbackReason::ChannelNotFound(self.channel_id.clone()))?;
        let uploads = channel
            .uploads_playlist_id
            .ok_or_else(|| FallbackReason::NoUploadsPlaylist(channel.id.clone()))?;

        let video_ids = self.collect_video_ids(client, &uploads)?;
        if video_ids.is_empty() {
            return Err(FallbackReason::EmptyPlaylist);
        }

        let videos = client.fetch_video_details(&video_ids)?;
        if videos.is_empty() {
            return Err(FallbackReason::EmptyPlaylist);
        }

        Ok(videos
            .iter()
            .enumerate()
            .map(|(index, video)| map_video(video, index))
            .collect())
    }

    fn collect_video_ids(
        &self,
        client: &YouTubeClient,
        playlist_id: &str,
    ) -> Result<Vec<String>, UpstreamError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..self.playlist_pages {
            let page = client.fetch_playlist_page(playlist_id, MAX_BATCH, page_token.as_deref())?;
            for entry in page.entries {
                if is_video_id(&entry.video_id) {
                    ids.push(entry.video_id);
                } else {
                    warn!(
                        "skipping playlist entry with malformed video id {:?}",
                        entry.video_id
                    );
                }
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(ids)
    }
}
