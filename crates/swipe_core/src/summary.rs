//! End-of-session tallies and the liked gallery.

use serde::Serialize;
use shared::domain::Item;

pub const EMPTY_GALLERY_MESSAGE: &str = "No cats liked yet. Try again!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryEntry {
    /// 1-based position in the liked sequence.
    pub position: usize,
    pub item: Item,
}

impl GalleryEntry {
    pub fn label(&self) -> String {
        format!("#{}", self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gallery {
    Empty { message: String },
    Entries { entries: Vec<GalleryEntry> },
}

impl Gallery {
    pub fn entries(&self) -> &[GalleryEntry] {
        match self {
            Self::Empty { .. } => &[],
            Self::Entries { entries } => entries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub liked_count: usize,
    pub disliked_count: usize,
    pub total_seen: usize,
    pub gallery: Gallery,
}

impl Summary {
    pub fn from_session(liked: &[Item], disliked: &[Item], total: usize) -> Self {
        let gallery = if liked.is_empty() {
            Gallery::Empty {
                message: EMPTY_GALLERY_MESSAGE.to_string(),
            }
        } else {
            Gallery::Entries {
                entries: liked
                    .iter()
                    .enumerate()
                    .map(|(index, item)| GalleryEntry {
                        position: index + 1,
                        item: item.clone(),
                    })
                    .collect(),
            }
        };

        Self {
            liked_count: liked.len(),
            disliked_count: disliked.len(),
            total_seen: total,
            gallery,
        }
    }

    pub fn share_text(&self) -> String {
        let noun = if self.total_seen == 1 { "cat" } else { "cats" };
        format!(
            "I liked {} of {} {noun} and passed on {}. Swipe some cats yourself!",
            self.liked_count, self.total_seen, self.disliked_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str) -> Item {
        Item::new(
            id,
            format!("https://cataas.com/cat/{id}").parse().expect("url"),
            ["cat"],
        )
    }

    #[test]
    fn gallery_keeps_like_order_with_one_based_labels() {
        let liked = vec![item("a"), item("c")];
        let summary = Summary::from_session(&liked, &[item("b")], 3);

        assert_eq!(summary.liked_count, 2);
        assert_eq!(summary.disliked_count, 1);
        assert_eq!(summary.total_seen, 3);

        let entries = summary.gallery.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].item.id.0, "a");
        assert_eq!(entries[0].label(), "#1");
        assert_eq!(entries[1].item.id.0, "c");
        assert_eq!(entries[1].label(), "#2");
    }

    #[test]
    fn no_likes_renders_empty_state() {
        let summary = Summary::from_session(&[], &[item("a"), item("b")], 2);
        assert_eq!(
            summary.gallery,
            Gallery::Empty {
                message: EMPTY_GALLERY_MESSAGE.to_string()
            }
        );
        assert!(summary.gallery.entries().is_empty());
    }

    #[test]
    fn gallery_json_tags_each_shape_with_its_own_fields() {
        let empty = serde_json::to_value(Summary::from_session(&[], &[item("a")], 1).gallery)
            .expect("encode");
        assert_eq!(
            empty,
            serde_json::json!({"kind": "empty", "message": EMPTY_GALLERY_MESSAGE})
        );

        let liked = serde_json::to_value(Summary::from_session(&[item("a")], &[], 1).gallery)
            .expect("encode");
        assert_eq!(liked["kind"], "entries");
        assert_eq!(liked["entries"][0]["position"], 1);
        assert!(liked.get("message").is_none());
    }

    #[test]
    fn share_text_mentions_tallies() {
        let summary = Summary::from_session(&[item("a")], &[], 1);
        assert_eq!(
            summary.share_text(),
            "I liked 1 of 1 cat and passed on 0. Swipe some cats yourself!"
        );
    }
}
