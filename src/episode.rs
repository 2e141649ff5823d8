//! Internal episode model served to the frontend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Discipline label attached to every episode. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Painters,
    Musicians,
    Directors,
    Photographers,
    Writers,
    Designers,
    Filmmakers,
    Curators,
    Actors,
    Dancers,
    Cinematographers,
    Storytellers,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Painters,
        Category::Musicians,
        Category::Directors,
        Category::Photographers,
        Category::Writers,
        Category::Designers,
        Category::Filmmakers,
        Category::Curators,
        Category::Actors,
        Category::Dancers,
        Category::Cinematographers,
        Category::Storytellers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Painters => "Painters",
            Category::Musicians => "Musicians",
            Category::Directors => "Directors",
            Category::Photographers => "Photographers",
            Category::Writers => "Writers",
            Category::Designers => "Designers",
            Category::Filmmakers => "Filmmakers",
            Category::Curators => "Curators",
            Category::Actors => "Actors",
            Category::Dancers => "Dancers",
            Category::Cinematographers => "Cinematographers",
            Category::Storytellers => "Storytellers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supplementary material linked from an episode page (transcripts, artist
/// sites, press). Always empty for ingested episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeAsset {
    pub kind: String,
    pub label: String,
    pub url: String,
}

/// One piece of content as the site renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub youtube_url: String,
    pub thumbnail: String,
    pub category: Category,
    pub tags: Vec<String>,
    /// `YYYY-MM-DD`, copied from the upstream timestamp without conversion.
    pub published_at: String,
    pub featured: bool,
    #[serde(default)]
    pub assets: Vec<EpisodeAsset>,
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Cinematographers).unwrap();
        assert_eq!(json, "\"Cinematographers\"");
        for category in Category::ALL {
            assert_eq!(
                serde_json::to_string(&category).unwrap(),
                format!("\"{}\"", category.label())
            );
        }
    }

    #[test]
    fn episode_uses_camel_case_keys() {
        let episode = Episode {
            id: "RdYh_JEVD7c".into(),
            title: "Painter's Expression".into(),
            slug: "painter-s-expression".into(),
            excerpt: String::new(),
            youtube_url: watch_url("RdYh_JEVD7c"),
            thumbnail: String::new(),
            category: Category::Painters,
            tags: Vec::new(),
            published_at: "2024-03-01".into(),
            featured: true,
            assets: Vec::new(),
        };
        let value = serde_json::to_value(&episode).unwrap();
        assert_eq!(
            value["youtubeUrl"],
            "https://www.youtube.com/watch?v=RdYh_JEVD7c"
        );
        assert_eq!(value["publishedAt"], "2024-03-01");
        assert_eq!(value["category"], "Painters");
    }
}
