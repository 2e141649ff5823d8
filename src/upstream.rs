//! Wire types for the YouTube Data API v3 responses we consume.
//!
//! Only the fields the pipeline reads are modelled. Everything beyond `id` is
//! optional or defaulted because the API omits keys rather than sending
//! nulls, and older uploads regularly lack tags or the larger thumbnails.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id pattern"));

/// Returns true for the 11 character tokens YouTube uses as video ids.
pub fn is_video_id(candidate: &str) -> bool {
    VIDEO_ID_RE.is_match(candidate)
}

/// Failure talking to the upstream API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("upstream request failed: {0}")]
    Transport(String),
    #[error("malformed upstream payload: {0}")]
    Decode(String),
    #[error("channel record is missing its id")]
    MissingChannelId,
}

impl UpstreamError {
    /// HTTP status reported by the upstream, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Common `{ items, pageInfo, nextPageToken }` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results_per_page: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// The resolution ladder YouTube attaches to channels and videos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// First non-empty URL in `maxres`, `high`, `medium`, `default` order.
    /// `standard` is never picked.
    pub fn best_url(&self) -> Option<&str> {
        [&self.maxres, &self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|thumb| thumb.url.as_str())
            .find(|url| !url.is_empty())
    }
}

// Channels

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
    #[serde(default)]
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

/// Counts arrive as decimal strings; they are passed through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPlaylists {
    #[serde(default)]
    pub uploads: Option<String>,
}

/// Validated channel record handed to the pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub statistics: ChannelStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads_playlist_id: Option<String>,
}

impl TryFrom<ChannelItem> for Channel {
    type Error = UpstreamError;

    fn try_from(item: ChannelItem) -> Result<Self, Self::Error> {
        let id = item
            .id
            .filter(|id| !id.is_empty())
            .ok_or(UpstreamError::MissingChannelId)?;
        let thumbnail = item.snippet.thumbnails.best_url().map(str::to_owned);
        Ok(Channel {
            id,
            title: item.snippet.title,
            description: item.snippet.description,
            custom_url: item.snippet.custom_url,
            thumbnail,
            statistics: item.statistics,
            uploads_playlist_id: item
                .content_details
                .related_playlists
                .uploads
                .filter(|uploads| !uploads.is_empty()),
        })
    }
}

// Playlist items

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: PlaylistItemSnippet,
    #[serde(default)]
    pub content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub resource_id: ResourceId,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub video_published_at: Option<String>,
}

/// One entry of an uploads playlist, reduced to what ingestion needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub position: Option<u32>,
    pub published_at: Option<String>,
}

impl PlaylistItem {
    /// `contentDetails.videoId` is authoritative; the snippet copy is used
    /// when the API was asked for `snippet` only.
    pub fn into_entry(self) -> Option<PlaylistEntry> {
        let video_id = self
            .content_details
            .video_id
            .or(self.snippet.resource_id.video_id)?;
        Some(PlaylistEntry {
            video_id,
            position: self.snippet.position,
            published_at: self
                .content_details
                .video_published_at
                .or(self.snippet.published_at),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
    pub total_results: Option<u64>,
}

// Videos

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub published_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<String>,
}

impl Video {
    pub fn tags(&self) -> &[String] {
        self.snippet.tags.as_deref().unwrap_or_default()
    }
}

// Search

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(default)]
    pub id: SearchId,
    #[serde(default)]
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchId {
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A channel matched by free-text search, before its details are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSearchHit {
    pub channel_id: String,
    pub title: String,
    pub description: String,
}

impl SearchItem {
    pub fn into_hit(self) -> Option<ChannelSearchHit> {
        let channel_id = self.id.channel_id.or(self.snippet.channel_id)?;
        Some(ChannelSearchHit {
            channel_id,
            title: self.snippet.title,
            description: self.snippet.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_pattern_accepts_only_eleven_char_tokens() {
        assert!(is_video_id("RdYh_JEVD7c"));
        assert!(is_video_id("a-b_c-d_e-f"));
        assert!(!is_video_id("short"));
        assert!(!is_video_id("RdYh_JEVD7c1"));
        assert!(!is_video_id("RdYh JEVD7c"));
    }

    #[test]
    fn best_url_prefers_maxres_then_high() {
        let thumbs: Thumbnails = serde_json::from_str(
            r#"{
                "default": {"url": "https://i.ytimg.com/d.jpg"},
                "high": {"url": "https://i.ytimg.com/h.jpg", "width": 480, "height": 360},
                "standard": {"url": "https://i.ytimg.com/s.jpg"}
            }"#,
        )
        .unwrap();
        assert_eq!(thumbs.best_url(), Some("https://i.ytimg.com/h.jpg"));

        let empty = Thumbnails::default();
        assert_eq!(empty.best_url(), None);
    }

    #[test]
    fn channel_without_id_is_rejected() {
        let item: ChannelItem =
            serde_json::from_str(r#"{"snippet": {"title": "No id"}}"#).unwrap();
        assert_eq!(
            Channel::try_from(item).unwrap_err(),
            UpstreamError::MissingChannelId
        );
    }

    #[test]
    fn channel_decodes_uploads_playlist() {
        let item: ChannelItem = serde_json::from_str(
            r#"{
                "id": "UCabc",
                "snippet": {"title": "Voice of Artist", "customUrl": "@voiceofartist"},
                "statistics": {"subscriberCount": "1200", "videoCount": "42"},
                "contentDetails": {"relatedPlaylists": {"uploads": "UUabc"}}
            }"#,
        )
        .unwrap();
        let channel = Channel::try_from(item).unwrap();
        assert_eq!(channel.uploads_playlist_id.as_deref(), Some("UUabc"));
        assert_eq!(channel.statistics.video_count.as_deref(), Some("42"));
        assert_eq!(channel.custom_url.as_deref(), Some("@voiceofartist"));
    }

    #[test]
    fn playlist_item_falls_back_to_snippet_resource_id() {
        let item: PlaylistItem = serde_json::from_str(
            r#"{"snippet": {"position": 3, "publishedAt": "2024-01-01T00:00:00Z",
                "resourceId": {"videoId": "RdYh_JEVD7c"}}}"#,
        )
        .unwrap();
        let entry = item.into_entry().unwrap();
        assert_eq!(entry.video_id, "RdYh_JEVD7c");
        assert_eq!(entry.position, Some(3));
    }

    #[test]
    fn video_envelope_tolerates_missing_fields() {
        let response: ListResponse<Video> = serde_json::from_str(
            r#"{"items": [{"id": "RdYh_JEVD7c", "snippet": {"title": "Painter's Expression"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.items.len(), 1);
        assert!(response.items[0].tags().is_empty());
        assert!(response.next_page_token.is_none());
    }

    #[test]
    fn status_is_exposed_only_for_http_failures() {
        let err = UpstreamError::Status {
            status: 403,
            message: "quotaExceeded".into(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(UpstreamError::Transport("reset".into()).status(), None);
    }
}
