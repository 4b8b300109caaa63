use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single presentable cat picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub image_ref: Url,
    pub tags: BTreeSet<String>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        image_ref: Url,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: ItemId(id.into()),
            image_ref,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Like,
    Dislike,
    Cancel,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Cancel => "cancel",
        }
    }

    /// Direction the card leaves the screen, `None` when it snaps back.
    pub fn exit_direction(self) -> Option<SwipeDirection> {
        match self {
            Self::Like => Some(SwipeDirection::Right),
            Self::Dislike => Some(SwipeDirection::Left),
            Self::Cancel => None,
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" | "l" | "right" => Ok(Self::Like),
            "dislike" | "d" | "left" => Ok(Self::Dislike),
            "cancel" | "c" | "skip" => Ok(Self::Cancel),
            other => Err(format!("unknown decision '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// +1 for the like side, -1 for the dislike side.
    pub fn sign(self) -> f32 {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decision_aliases() {
        assert_eq!("Like".parse::<Decision>(), Ok(Decision::Like));
        assert_eq!(" left ".parse::<Decision>(), Ok(Decision::Dislike));
        assert_eq!("skip".parse::<Decision>(), Ok(Decision::Cancel));
        assert!("maybe".parse::<Decision>().is_err());
    }

    #[test]
    fn cancel_has_no_exit_direction() {
        assert_eq!(Decision::Like.exit_direction(), Some(SwipeDirection::Right));
        assert_eq!(Decision::Dislike.exit_direction(), Some(SwipeDirection::Left));
        assert_eq!(Decision::Cancel.exit_direction(), None);
    }

    #[test]
    fn item_tags_are_deduplicated() {
        let item = Item::new(
            "abc",
            "https://cataas.com/cat/abc".parse().expect("url"),
            ["cat", "cute", "cat"],
        );
        assert_eq!(item.tags.len(), 2);
        assert_eq!(item.id.to_string(), "abc");
    }
}
