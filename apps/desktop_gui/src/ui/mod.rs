//! UI layer for desktop GUI: app shell and input translation.

pub mod app;
pub mod input;

pub use app::SwipeApp;
