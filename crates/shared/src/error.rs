use thiserror::Error;

/// The primary item supply could not deliver a full batch.
#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("item supply transport failure: {0}")]
    Transport(String),
    #[error("item supply returned HTTP status {status}")]
    Status { status: u16 },
    #[error("malformed item supply payload: {0}")]
    Decode(String),
    #[error("item supply short: expected {expected} items, got {actual}")]
    Short { expected: usize, actual: usize },
}

/// A card image could not be downloaded or decoded.
#[derive(Debug, Error)]
#[error("image {url} failed to load: {reason}")]
pub struct ImageRenderError {
    pub url: String,
    pub reason: String,
}

impl ImageRenderError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share mechanism unavailable: {0}")]
    Unavailable(String),
    #[error("share mechanism rejected the text: {0}")]
    Rejected(String),
}
