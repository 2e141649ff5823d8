#![forbid(unsafe_code)]

//! Episode ingestion for the Voice of Artist site.
//!
//! The library turns a YouTube channel's uploads into [`episode::Episode`]
//! records, falling back to a hand-authored list whenever live data is
//! unavailable. The binaries share it: `backend` serves the episodes over
//! HTTP, `dump_episodes` snapshots them and `fetch_thumbnails` mirrors the
//! artwork locally.

pub mod channel_search;
pub mod classifier;
pub mod client;
pub mod config;
pub mod episode;
pub mod fallback;
pub mod mapper;
pub mod pipeline;
pub mod thumbnails;
pub mod transport;
pub mod upstream;
