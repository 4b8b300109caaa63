//! Backend commands queued from UI to backend worker.

use shared::domain::{Item, SessionId};
use swipe_core::ImagePurpose;

pub enum BackendCommand {
    FetchItems {
        generation: u64,
        count: usize,
    },
    FetchImage {
        session_id: SessionId,
        item: Item,
        position: usize,
        purpose: ImagePurpose,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchItems { .. } => "fetch_items",
            Self::FetchImage {
                purpose: ImagePurpose::Card,
                ..
            } => "fetch_card_image",
            Self::FetchImage {
                purpose: ImagePurpose::Thumbnail,
                ..
            } => "fetch_thumbnail",
        }
    }
}
