//! Turns one upstream video into one [`Episode`].
//!
//! Everything here is a pure function of its inputs so the same video always
//! maps to a byte-identical episode.

use std::sync::LazyLock;

use regex::Regex;

use crate::classifier;
use crate::episode::{Episode, watch_url};
use crate::upstream::Video;

pub const EXCERPT_LIMIT: usize = 150;
/// How far back from the cut point we look for a space.
const EXCERPT_BACKTRACK: usize = 20;
const ELLIPSIS: &str = "...";
pub const MAX_TAGS: usize = 5;
const MAX_UPSTREAM_TAGS: usize = 3;
/// Number of leading results flagged as featured.
pub const FEATURED_COUNT: usize = 3;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S*").expect("valid url pattern"));
static NON_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));
static NON_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid tag pattern"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Keywords looked up in the lowercased title and description, in order.
static KEYWORD_TAGS: &[(&str, &str)] = &[
    ("interview", "interview"),
    ("conversation", "interview"),
    ("behind the scenes", "behind-the-scenes"),
    ("process", "creative-process"),
    ("studio", "studio"),
    ("painting", "painting"),
    ("music", "music"),
    ("film", "film"),
    ("photograph", "photography"),
    ("poetry", "poetry"),
    ("design", "design"),
    ("dance", "dance"),
    ("theater", "theater"),
    ("documentary", "documentary"),
    ("exhibition", "exhibition"),
    ("inspiration", "inspiration"),
    ("career", "career"),
    ("emerging", "emerging-artist"),
];

/// Maps `video` into an episode. `index` is its position in the result list;
/// the first [`FEATURED_COUNT`] positions are featured.
pub fn map_video(video: &Video, index: usize) -> Episode {
    let snippet = &video.snippet;
    Episode {
        id: video.id.clone(),
        title: snippet.title.clone(),
        slug: episode_slug(&snippet.title, &video.id),
        excerpt: excerpt(&snippet.description),
        youtube_url: watch_url(&video.id),
        thumbnail: snippet
            .thumbnails
            .best_url()
            .unwrap_or_default()
            .to_owned(),
        category: classifier::classify(&video.id, &snippet.title, video.tags()),
        tags: extract_tags(&snippet.title, &snippet.description, video.tags()),
        published_at: published_date(&snippet.published_at),
        featured: index < FEATURED_COUNT,
        assets: Vec::new(),
    }
}

/// Lowercases and collapses every run outside `[a-z0-9]` into one hyphen.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let hyphenated = NON_SLUG_RE.replace_all(&lowered, "-");
    hyphenated.trim_matches('-').to_owned()
}

/// Slug for an episode. Titles without any ASCII alphanumerics fall back to
/// the video id so the slug is never empty.
pub fn episode_slug(title: &str, video_id: &str) -> String {
    let slug = slugify(title);
    if !slug.is_empty() {
        return slug;
    }
    let from_id = slugify(video_id);
    if from_id.is_empty() {
        "episode".to_owned()
    } else {
        from_id
    }
}

/// Strips URLs and truncates to [`EXCERPT_LIMIT`] characters, preferring a
/// word boundary when one sits within the last [`EXCERPT_BACKTRACK`]
/// characters of the cut.
pub fn excerpt(description: &str) -> String {
    let stripped = URL_RE.replace_all(description, "");
    let text = stripped.trim();

    if text.chars().count() <= EXCERPT_LIMIT {
        return text.to_owned();
    }

    let cut: String = text.chars().take(EXCERPT_LIMIT).collect();
    let truncated = match cut.rfind(' ') {
        Some(space) if cut[space..].chars().count() <= EXCERPT_BACKTRACK => &cut[..space],
        _ => cut.as_str(),
    };
    format!("{}{ELLIPSIS}", truncated.trim_end())
}

/// Date portion of an RFC 3339 timestamp, verbatim.
pub fn published_date(timestamp: &str) -> String {
    timestamp
        .split_once('T')
        .map(|(date, _)| date)
        .unwrap_or(timestamp)
        .to_owned()
}

/// Dictionary tags found in the text followed by up to three normalized
/// upstream tags, deduplicated in first-seen order and capped at
/// [`MAX_TAGS`].
pub fn extract_tags(title: &str, description: &str, upstream: &[String]) -> Vec<String> {
    let haystack = format!("{title} {description}").to_lowercase();

    let from_keywords = KEYWORD_TAGS
        .iter()
        .filter(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, tag)| (*tag).to_owned());

    let from_upstream = upstream
        .iter()
        .take(MAX_UPSTREAM_TAGS)
        .map(|tag| normalize_upstream_tag(tag))
        .filter(|tag| tag.len() > 2 && tag.len() < 20);

    let mut tags: Vec<String> = Vec::new();
    for tag in from_keywords.chain(from_upstream) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.truncate(MAX_TAGS);
    tags
}

fn normalize_upstream_tag(tag: &str) -> String {
    let lowered = tag.to_lowercase();
    let cleaned = NON_TAG_RE.replace_all(&lowered, "");
    WHITESPACE_RE
        .replace_all(cleaned.trim(), "-")
        .into_owned()
}
