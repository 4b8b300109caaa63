//! UI/backend events and error modeling for desktop GUI controller.

use shared::domain::{Item, ItemId, SessionId};
use swipe_core::{ImagePurpose, SupplyOrigin};

use crate::media::PreviewImage;

pub enum UiEvent {
    Info(String),
    ItemsLoaded {
        generation: u64,
        items: Vec<Item>,
        origin: SupplyOrigin,
    },
    SupplyFailed {
        generation: u64,
        error: UiError,
    },
    ImageLoaded {
        session_id: SessionId,
        item_id: ItemId,
        purpose: ImagePurpose,
        image: PreviewImage,
        substituted: bool,
    },
    ImageFailed {
        session_id: SessionId,
        item_id: ItemId,
        purpose: ImagePurpose,
        error: UiError,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Upstream,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadItems,
    LoadImage,
    Share,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("http status")
            || message_lower.contains("server returned")
            || message_lower.contains("returned status")
        {
            UiErrorCategory::Upstream
        } else if message_lower.contains("decode")
            || message_lower.contains("format")
            || message_lower.contains("no pixels")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Status-line text for the error.
    pub fn user_message(&self) -> String {
        let prefix = match self.context {
            UiErrorContext::BackendStartup => "Backend worker startup failure",
            UiErrorContext::LoadItems => "Could not load cats",
            UiErrorContext::LoadImage => "Image unavailable",
            UiErrorContext::Share => "Share failed",
            UiErrorContext::General => "Error",
        };
        let hint = match self.category {
            UiErrorCategory::Transport => " (check your network connection)",
            _ => "",
        };
        format!("{prefix}: {}{hint}", self.message)
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
