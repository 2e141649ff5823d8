//! Assigns a discipline category to an upstream video.
//!
//! Priority: curated override table, then the ordered keyword rules, then
//! [`Category::Storytellers`]. Rules are evaluated top to bottom and the first
//! rule with any matching keyword wins, so `film` shadows `filmmaker` and
//! `camera` shadows `camera work`.

use crate::episode::Category;

/// Hand-maintained corrections for videos the keyword rules get wrong.
static CATEGORY_OVERRIDES: &[(&str, Category)] = &[
    ("RdYh_JEVD7c", Category::Painters),
    ("Q3v8LmN2pXc", Category::Musicians),
    ("Zt7kP1wR9sA", Category::Photographers),
    ("hB4nY6cX2qE", Category::Writers),
    ("mK9dJ3vT5uL", Category::Dancers),
    ("pW2sF8gH1nR", Category::Cinematographers),
    ("xC5aV7bN4mQ", Category::Curators),
    ("tR1yU6iO3pS", Category::Storytellers),
    ("gN8eD2kL6wZ", Category::Directors),
    ("vJ4hS9qA7cB", Category::Designers),
];

static KEYWORD_RULES: &[(&[&str], Category)] = &[
    (&["paint", "color", "canvas"], Category::Painters),
    (&["music", "rhythm", "sound", "song"], Category::Musicians),
    (&["film", "director", "cinema", "movie"], Category::Directors),
    (
        &["photo", "lens", "camera", "photograph"],
        Category::Photographers,
    ),
    (&["write", "poet", "word", "story"], Category::Writers),
    (&["design", "visual", "graphic"], Category::Designers),
    (&["filmmaker", "documentary"], Category::Filmmakers),
    (&["curator", "curation", "exhibition"], Category::Curators),
    (
        &["actor", "acting", "performance", "theater"],
        Category::Actors,
    ),
    (
        &["dance", "dancer", "choreography", "ballet"],
        Category::Dancers,
    ),
    (
        &["cinematographer", "cinematography", "camera work"],
        Category::Cinematographers,
    ),
];

pub const DEFAULT_CATEGORY: Category = Category::Storytellers;

/// Curated category for `video_id`, if it has one.
pub fn override_for(video_id: &str) -> Option<Category> {
    CATEGORY_OVERRIDES
        .iter()
        .find(|(id, _)| *id == video_id)
        .map(|(_, category)| *category)
}

/// Category implied by the keyword rules alone.
pub fn category_from_keywords(title: &str, tags: &[String]) -> Option<Category> {
    let title = title.to_lowercase();
    let tags: Vec<String> = tags.iter().map(|tag| tag.to_lowercase()).collect();

    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| {
            keywords.iter().any(|keyword| {
                title.contains(keyword) || tags.iter().any(|tag| tag.contains(keyword))
            })
        })
        .map(|(_, category)| *category)
}

pub fn classify(video_id: &str, title: &str, tags: &[String]) -> Category {
    override_for(video_id)
        .or_else(|| category_from_keywords(title, tags))
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::is_video_id;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn override_wins_over_keywords() {
        // Title would match Musicians, tags would match Dancers.
        let category = classify(
            "RdYh_JEVD7c",
            "A Song for the Studio",
            &tags(&["ballet", "dance"]),
        );
        assert_eq!(category, Category::Painters);

        let lens = classify("pW2sF8gH1nR", "Behind the Lens", &[]);
        assert_eq!(lens, Category::Cinematographers);
    }

    #[test]
    fn untitled_clip_defaults_to_storytellers() {
        assert_eq!(
            classify("aaaaaaaaaaa", "untitled clip", &[]),
            Category::Storytellers
        );
    }

    #[test]
    fn keyword_rules_match_title_case_insensitively() {
        assert_eq!(
            classify("aaaaaaaaaaa", "Oil PAINTING at Dawn", &[]),
            Category::Painters
        );
        assert_eq!(
            classify("aaaaaaaaaaa", "The Exhibition Nobody Saw", &[]),
            Category::Curators
        );
        assert_eq!(
            classify("aaaaaaaaaaa", "Into the Ballet", &[]),
            Category::Dancers
        );
    }

    #[test]
    fn keyword_rules_match_tags() {
        assert_eq!(
            classify("aaaaaaaaaaa", "Conversation #12", &tags(&["Theater"])),
            Category::Actors
        );
        assert_eq!(
            classify("aaaaaaaaaaa", "Conversation #13", &tags(&["graphic novels"])),
            Category::Designers
        );
    }

    #[test]
    fn earlier_rules_shadow_later_ones() {
        // "filmmaker" contains "film", which the Directors rule sees first.
        assert_eq!(
            classify("aaaaaaaaaaa", "A Filmmaker at Home", &[]),
            Category::Directors
        );
        // "camera work" contains "camera", claimed by Photographers.
        assert_eq!(
            classify("aaaaaaaaaaa", "Notes on camera work", &[]),
            Category::Photographers
        );
        assert_eq!(
            classify("aaaaaaaaaaa", "Cinematography of Silence", &[]),
            Category::Directors
        );
        assert_eq!(
            classify("aaaaaaaaaaa", "A Documentary Life", &[]),
            Category::Filmmakers
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let input = tags(&["street photography", "night"]);
        let first = classify("bbbbbbbbbbb", "After Dark", &input);
        let second = classify("bbbbbbbbbbb", "After Dark", &input);
        assert_eq!(first, second);
        assert_eq!(first, Category::Photographers);
    }

    #[test]
    fn override_table_holds_valid_unique_ids() {
        for (index, (id, _)) in CATEGORY_OVERRIDES.iter().enumerate() {
            assert!(is_video_id(id), "{id} is not a video id");
            assert!(
                CATEGORY_OVERRIDES[index + 1..]
                    .iter()
                    .all(|(other, _)| other != id),
                "{id} listed twice"
            );
        }
    }
}
