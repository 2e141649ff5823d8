#![forbid(unsafe_code)]

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path as AxumPath, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use log::{info, warn};
use mime_guess::MimeGuess;
use serde::Deserialize;
use tokio::{fs::File, signal, task};
use tokio_util::io::ReaderStream;
use voa_episodes::{
    channel_search::{ChannelSearchError, ChannelSearchResponse, search_channel},
    config::{AppConfig, init_logger},
    episode::Episode,
    pipeline::{EpisodeService, EpisodesPayload},
    transport::{Transport, UreqTransport},
};

#[derive(Clone)]
struct AppState {
    episodes: Arc<EpisodeService>,
    transport: Arc<dyn Transport>,
    api_base: Arc<str>,
    thumbnails: Arc<PathBuf>,
}

impl AppState {
    fn new(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            episodes: Arc::new(EpisodeService::new(&config.pipeline, transport.clone())),
            transport,
            api_base: Arc::from(config.pipeline.api_base.as_str()),
            thumbnails: Arc::new(config.thumbnails_dir.clone()),
        }
    }

    /// Runs the blocking pipeline off the async workers. Never fails on
    /// upstream errors; those already resolved to the fallback list.
    async fn load_payload(&self) -> ApiResult<EpisodesPayload> {
        let service = self.episodes.clone();
        task::spawn_blocking(move || service.payload())
            .await
            .map_err(|err| ApiError::internal(format!("task join error: {err}")))
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }
}

impl From<ChannelSearchError> for ApiError {
    fn from(err: ChannelSearchError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: err.to_string(),
            details: err.details(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => serde_json::json!({
                "error": self.message,
                "details": details,
            }),
            None => serde_json::json!({
                "error": self.message,
            }),
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let config = AppConfig::load().context("loading configuration")?;
    if config.pipeline.api_key.is_none() {
        info!("YOUTUBE_API_KEY not set, /api/episodes will serve the fallback list");
    }

    let state = AppState::new(&config, Arc::new(UreqTransport::new()));
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/episodes", get(list_episodes))
        .route("/api/episodes/{slug}", get(get_episode))
        .route("/api/youtube/search-channel", get(search_youtube_channel))
        .route("/api/thumbnails/{file}", get(download_thumbnail))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", err);
    }
}

async fn list_episodes(State(state): State<AppState>) -> ApiResult<Json<EpisodesPayload>> {
    let payload = state.load_payload().await?;
    Ok(Json(payload))
}

async fn get_episode(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
) -> ApiResult<Json<Episode>> {
    let payload = state.load_payload().await?;
    let episode = payload
        .episodes
        .into_iter()
        .find(|episode| episode.slug == slug)
        .ok_or_else(|| ApiError::not_found("episode not found"))?;
    Ok(Json(episode))
}

#[derive(Debug, Default, Deserialize)]
struct SearchChannelQuery {
    channel: Option<String>,
    key: Option<String>,
}

async fn search_youtube_channel(
    State(state): State<AppState>,
    Query(query): Query<SearchChannelQuery>,
) -> ApiResult<Json<ChannelSearchResponse>> {
    let transport = state.transport.clone();
    let api_base = state.api_base.clone();
    let result = task::spawn_blocking(move || {
        search_channel(
            transport,
            &api_base,
            query.channel.as_deref(),
            query.key.as_deref(),
        )
    })
    .await
    .map_err(|err| ApiError::internal(format!("task join error: {err}")))?;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            if let ChannelSearchError::Upstream(upstream) = &err {
                warn!("channel search failed: {upstream}");
            }
            Err(err.into())
        }
    }
}

async fn download_thumbnail(
    State(state): State<AppState>,
    AxumPath(file): AxumPath<String>,
) -> ApiResult<Response> {
    if Path::new(&file).file_name() != Some(OsStr::new(&file)) {
        return Err(ApiError::not_found("file not found"));
    }
    stream_file(state.thumbnails.join(&file)).await
}

async fn stream_file(path: PathBuf) -> ApiResult<Response> {
    let file = File::open(&path)
        .await
        .map_err(|_| ApiError::not_found("file not found"))?;

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);
    let mut response = body.into_response();
    if let Some(mime) = MimeGuess::from_path(&path).first()
        && let Ok(value) = mime.to_string().parse()
    {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }

    Ok(response)
}
