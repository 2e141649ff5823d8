//! YouTube Data API v3 client.
//!
//! Each call is a single blocking GET (one per chunk for video details). The
//! client keeps no state between calls besides the transport and credentials.

use std::sync::Arc;

use log::debug;
use serde::de::DeserializeOwned;

use crate::transport::Transport;
use crate::upstream::{
    Channel, ChannelItem, ChannelSearchHit, ListResponse, PlaylistItem, PlaylistPage, SearchItem,
    UpstreamError, Video,
};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
/// Hard upstream limit for `maxResults` and for ids per `videos` call.
pub const MAX_BATCH: usize = 50;
const DETAIL_PARTS: &str = "snippet,statistics,contentDetails";

#[derive(Clone)]
pub struct YouTubeClient {
    transport: Arc<dyn Transport>,
    api_base: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        }
    }

    fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<ListResponse<T>, UpstreamError> {
        let url = format!("{}/{endpoint}", self.api_base);
        let mut query = params.to_vec();
        query.push(("key", self.api_key.as_str()));
        debug!("GET {url} {:?}", params);

        let body = self.transport.get_text(&url, &query)?;
        serde_json::from_str(&body)
            .map_err(|err| UpstreamError::Decode(format!("{endpoint} response: {err}")))
    }

    /// Looks up one channel by id. `Ok(None)` means the API knows no such
    /// channel.
    pub fn fetch_channel(&self, channel_id: &str) -> Result<Option<Channel>, UpstreamError> {
        let response: ListResponse<ChannelItem> =
            self.get("channels", &[("part", DETAIL_PARTS), ("id", channel_id)])?;
        response
            .items
            .into_iter()
            .next()
            .map(Channel::try_from)
            .transpose()
    }

    /// Fetches a single page of a playlist. `page_size` is clamped to
    /// [`MAX_BATCH`]; following `next_page_token` is up to the caller.
    pub fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, UpstreamError> {
        let max_results = page_size.clamp(1, MAX_BATCH).to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItem> = self.get("playlistItems", &params)?;
        Ok(PlaylistPage {
            total_results: response
                .page_info
                .as_ref()
                .and_then(|info| info.total_results),
            next_page_token: response.next_page_token,
            entries: response
                .items
                .into_iter()
                .filter_map(PlaylistItem::into_entry)
                .collect(),
        })
    }

    /// Fetches full details for `video_ids`, [`MAX_BATCH`] ids per request,
    /// preserving chunk order. The first failing chunk fails the whole call.
    pub fn fetch_video_details(&self, video_ids: &[String]) -> Result<Vec<Video>, UpstreamError> {
        let mut videos = Vec::with_capacity(video_ids.len());
        for chunk in video_ids.chunks(MAX_BATCH) {
            let ids = chunk.join(",");
            let response: ListResponse<Video> =
                self.get("videos", &[("part", DETAIL_PARTS), ("id", ids.as_str())])?;
            videos.extend(response.items);
        }
        Ok(videos)
    }

    /// Free-text channel search.
    pub fn search_channels(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<ChannelSearchHit>, UpstreamError> {
        let max_results = max_results.clamp(1, MAX_BATCH).to_string();
        let response: ListResponse<SearchItem> = self.get(
            "search",
            &[
                ("part", "snippet"),
                ("type", "channel"),
                ("q", query),
                ("maxResults", max_results.as_str()),
            ],
        )?;
        Ok(response
            .items
            .into_iter()
            .filter_map(SearchItem::into_hit)
            .collect())
    }

    /// Fetches details for several channels at once, in upstream order.
    pub fn fetch_channels(&self, channel_ids: &[String]) -> Result<Vec<Channel>, UpstreamError> {
        let mut channels = Vec::with_capacity(channel_ids.len());
        for chunk in channel_ids.chunks(MAX_BATCH) {
            let ids = chunk.join(",");
            let response: ListResponse<ChannelItem> =
                self.get("channels", &[("part", DETAIL_PARTS), ("id", ids.as_str())])?;
            for item in response.items {
                channels.push(Channel::try_from(item)?);
            }
        }
        Ok(channels)
    }
}
