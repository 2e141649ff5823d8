//! Hand-authored episodes served whenever live ingestion is unavailable.

use crate::episode::{Category, Episode, watch_url};
use crate::mapper::{FEATURED_COUNT, episode_slug};

struct FallbackEntry {
    id: &'static str,
    title: &'static str,
    excerpt: &'static str,
    category: Category,
    tags: &'static [&'static str],
    published_at: &'static str,
}

static FALLBACK_EPISODES: &[FallbackEntry] = &[
    FallbackEntry {
        id: "RdYh_JEVD7c",
        title: "Painter's Expression",
        excerpt: "A painter talks through a year of large canvases, the colors she refuses to use, and why she still stretches every frame by hand.",
        category: Category::Painters,
        tags: &["painting", "studio", "creative-process"],
        published_at: "2024-09-12",
    },
    FallbackEntry {
        id: "Q3v8LmN2pXc",
        title: "The Sound of Silence: A Composer's Journey",
        excerpt: "From church choirs to film scores, a composer on writing music that leaves room for the listener.",
        category: Category::Musicians,
        tags: &["music", "interview", "career"],
        published_at: "2024-08-29",
    },
    FallbackEntry {
        id: "Zt7kP1wR9sA",
        title: "Framing the City: Street Photography After Dark",
        excerpt: "Night walks, fast film and patient strangers. A street photographer shares how she finds light where there is almost none.",
        category: Category::Photographers,
        tags: &["photography", "behind-the-scenes"],
        published_at: "2024-08-15",
    },
    FallbackEntry {
        id: "hB4nY6cX2qE",
        title: "Words That Heal: Poetry in Practice",
        excerpt: "A poet on running writing workshops in hospitals and what a single line can do for someone who has stopped talking.",
        category: Category::Writers,
        tags: &["poetry", "inspiration"],
        published_at: "2024-07-30",
    },
    FallbackEntry {
        id: "mK9dJ3vT5uL",
        title: "Bodies in Motion: A Choreographer's Notebook",
        excerpt: "Rehearsal footage and notebook pages from a choreographer building a new piece with six dancers in three weeks.",
        category: Category::Dancers,
        tags: &["dance", "creative-process"],
        published_at: "2024-07-11",
    },
    FallbackEntry {
        id: "pW2sF8gH1nR",
        title: "Behind the Lens: Lighting a Scene",
        excerpt: "A cinematographer breaks down one night exterior shot by shot, from the first lighting plan to the final grade.",
        category: Category::Cinematographers,
        tags: &["film", "behind-the-scenes"],
        published_at: "2024-06-20",
    },
    FallbackEntry {
        id: "xC5aV7bN4mQ",
        title: "Curating Memory",
        excerpt: "How a small-town archive became an exhibition, and what a curator owes the people whose photographs hang on the wall.",
        category: Category::Curators,
        tags: &["exhibition", "interview"],
        published_at: "2024-06-02",
    },
    FallbackEntry {
        id: "tR1yU6iO3pS",
        title: "Stories From the Road",
        excerpt: "Three artists, one van and twelve towns. A travelling storytelling project in its own words.",
        category: Category::Storytellers,
        tags: &["emerging-artist", "inspiration"],
        published_at: "2024-05-18",
    },
];

/// The fallback dataset, built fresh on every call.
pub fn fallback_episodes() -> Vec<Episode> {
    FALLBACK_EPISODES
        .iter()
        .enumerate()
        .map(|(index, entry)| Episode {
            id: entry.id.to_owned(),
            title: entry.title.to_owned(),
            slug: episode_slug(entry.title, entry.id),
            excerpt: entry.excerpt.to_owned(),
            youtube_url: watch_url(entry.id),
            thumbnail: format!("https://i.ytimg.com/vi/{}/maxresdefault.jpg", entry.id),
            category: entry.category,
            tags: entry.tags.iter().map(|tag| (*tag).to_owned()).collect(),
            published_at: entry.published_at.to_owned(),
            featured: index < FEATURED_COUNT,
            assets: Vec::new(),
        })
        .collect()
}

/// Video ids of the fallback dataset, in display order.
pub fn fallback_video_ids() -> Vec<String> {
    FALLBACK_EPISODES
        .iter()
        .map(|entry| entry.id.to_owned())
        .collect()
}
