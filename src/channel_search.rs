//! Channel finder behind `/api/youtube/search-channel`.
//!
//! Unlike the episode pipeline this flow is user initiated, so failures are
//! returned to the caller with a status code instead of being swallowed.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::client::YouTubeClient;
use crate::transport::Transport;
use crate::upstream::{Channel, UpstreamError};

/// Number of search hits expanded into full channel records.
pub const SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelSearchError {
    #[error("missing required query parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("no channel found for {0:?}")]
    NotFound(String),
    #[error("YouTube API request failed")]
    Upstream(#[from] UpstreamError),
}

impl ChannelSearchError {
    /// HTTP status the endpoint answers with.
    pub fn status(&self) -> u16 {
        match self {
            ChannelSearchError::MissingParameter(_) => 400,
            ChannelSearchError::NotFound(_) => 404,
            ChannelSearchError::Upstream(err) => err.status().unwrap_or(500),
        }
    }

    /// Extra context for the `details` field of the error body.
    pub fn details(&self) -> Option<String> {
        match self {
            ChannelSearchError::Upstream(err) => Some(err.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSuggestions {
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads_playlist_id: Option<String>,
    /// Line to paste into the env file to ingest this channel.
    pub env_line: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelSearchResponse {
    pub channels: Vec<Channel>,
    pub suggestions: ChannelSuggestions,
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ChannelSearchError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ChannelSearchError::MissingParameter(name))
}

/// Searches channels by name with the caller-supplied key and expands the top
/// hits into full channel records, first hit first.
pub fn search_channel(
    transport: Arc<dyn Transport>,
    api_base: &str,
    channel: Option<&str>,
    key: Option<&str>,
) -> Result<ChannelSearchResponse, ChannelSearchError> {
    let channel = required(channel, "channel")?;
    let key = required(key, "key")?;
    let client = YouTubeClient::new(transport, api_base, key);

    let hits = client.search_channels(channel, SEARCH_LIMIT)?;
    if hits.is_empty() {
        return Err(ChannelSearchError::NotFound(channel.to_owned()));
    }

    let ids: Vec<String> = hits.into_iter().map(|hit| hit.channel_id).collect();
    let mut channels = client.fetch_channels(&ids)?;
    // The channels endpoint does not promise to keep the requested order.
    channels.sort_by_key(|c| ids.iter().position(|id| *id == c.id).unwrap_or(usize::MAX));

    let first = channels
        .first()
        .ok_or_else(|| ChannelSearchError::NotFound(channel.to_owned()))?;
    let suggestions = ChannelSuggestions {
        channel_id: first.id.clone(),
        uploads_playlist_id: first.uploads_playlist_id.clone(),
        env_line: format!("YOUTUBE_CHANNEL_ID={}", first.id),
    };

    Ok(ChannelSearchResponse {
        channels,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::testing::FakeTransport;

    const BASE: &str = "https://api.test/youtube/v3";

    fn search_transport() -> Arc<FakeTransport> {
        Arc::new(FakeTransport::new(|request| {
            let body = match request.endpoint() {
                "search" => json!({"items": [
                    {"id": {"channelId": "UCfirst"}, "snippet": {"title": "Voice of Artist"}},
                    {"id": {"channelId": "UCsecond"}, "snippet": {"title": "Voice of Artists Club"}}
                ]}),
                "channels" => json!({"items": [
                    {"id": "UCsecond", "snippet": {"title": "Voice of Artists Club"},
                     "contentDetails": {"relatedPlaylists": {"uploads": "UUsecond"}}},
                    {"id": "UCfirst", "snippet": {"title": "Voice of Artist"},
                     "statistics": {"subscriberCount": "5400"},
                     "contentDetails": {"relatedPlaylists": {"uploads": "UUfirst"}}}
                ]}),
                other => panic!("unexpected endpoint {other}"),
            };
            Ok(body.to_string())
        }))
    }

    #[test]
    fn search_returns_channels_in_search_order_with_suggestions() {
        let transport = search_transport();
        let response = search_channel(
            transport.clone(),
            BASE,
            Some("voice of artist"),
            Some("user-key"),
        )
        .unwrap();

        let ids: Vec<&str> = response.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["UCfirst", "UCsecond"]);
        assert_eq!(response.suggestions.channel_id, "UCfirst");
        assert_eq!(response.suggestions.env_line, "YOUTUBE_CHANNEL_ID=UCfirst");
        assert_eq!(
            response.suggestions.uploads_playlist_id.as_deref(),
            Some("UUfirst")
        );

        let requests = transport.requests();
        assert!(requests.iter().all(|r| r.param("key") == Some("user-key")));
        assert_eq!(requests[1].param("id"), Some("UCfirst,UCsecond"));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["suggestions"]["envLine"], "YOUTUBE_CHANNEL_ID=UCfirst");
        assert_eq!(value["channels"][0]["statistics"]["subscriberCount"], "5400");
    }

    #[test]
    fn missing_parameters_are_rejected_before_any_request() {
        let transport = Arc::new(FakeTransport::unreachable());
        let err = search_channel(transport.clone(), BASE, None, Some("k")).unwrap_err();
        assert_eq!(err, ChannelSearchError::MissingParameter("channel"));
        assert_eq!(err.status(), 400);

        let err = search_channel(transport.clone(), BASE, Some("voa"), Some("  ")).unwrap_err();
        assert_eq!(err, ChannelSearchError::MissingParameter("key"));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn empty_search_is_not_found() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(r#"{"items": []}"#.to_owned())));
        let err = search_channel(transport, BASE, Some("nobody"), Some("k")).unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn upstream_status_is_passed_through() {
        let transport = Arc::new(FakeTransport::new(|_| {
            Err(UpstreamError::Status {
                status: 403,
                message: "API key not valid".into(),
            })
        }));
        let err = search_channel(transport, BASE, Some("voa"), Some("bad")).unwrap_err();
        assert_eq!(err.status(), 403);
        assert!(err.details().unwrap().contains("API key not valid"));

        let transport = Arc::new(FakeTransport::new(|_| {
            Err(UpstreamError::Transport("connection reset".into()))
        }));
        let err = search_channel(transport, BASE, Some("voa"), Some("k")).unwrap_err();
        assert_eq!(err.status(), 500);
    }
}
