//! Headless core of the cat swipe game: item supply, drag tracking, the
//! like/dislike threshold, the session controller and its summary.

pub mod config;
pub mod decision;
pub mod gesture;
pub mod image_fetch;
pub mod item_source;
pub mod session;
pub mod share;
pub mod summary;

pub use config::{load_settings, Settings};
pub use decision::resolve;
pub use gesture::{
    pointer_signal, CardPose, DragFeedback, GestureTracker, InputEvent, PointerSignal, Preview,
};
pub use image_fetch::{ImageFetcher, ImagePurpose, LoadedImage};
pub use item_source::{
    fetch_with_fallback, CataasItemSource, FallbackItems, ItemSource, SuppliedItems, SupplyOrigin,
};
pub use session::{
    PointerOutcome, Progress, Resolution, Session, SessionController, SessionError, SessionEvent,
    SessionPhase,
};
pub use share::{ClipboardShareTarget, ShareTarget, Sharer};
pub use summary::{Gallery, GalleryEntry, Summary};
