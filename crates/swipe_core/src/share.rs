//! Sharing the summary text: native share first, clipboard second.

use arboard::Clipboard;
use shared::{
    error::ShareError,
    protocol::{ShareMechanism, ShareResult},
};
use tracing::{info, warn};

pub trait ShareTarget {
    fn share(&mut self, text: &str) -> Result<(), ShareError>;
}

/// System clipboard via `arboard`.
pub struct ClipboardShareTarget;

impl ShareTarget for ClipboardShareTarget {
    fn share(&mut self, text: &str) -> Result<(), ShareError> {
        let mut clipboard =
            Clipboard::new().map_err(|err| ShareError::Unavailable(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ShareError::Rejected(err.to_string()))
    }
}

#[derive(Default)]
pub struct Sharer {
    native: Option<Box<dyn ShareTarget + Send>>,
    clipboard: Option<Box<dyn ShareTarget + Send>>,
}

impl Sharer {
    pub fn new(
        native: Option<Box<dyn ShareTarget + Send>>,
        clipboard: Option<Box<dyn ShareTarget + Send>>,
    ) -> Self {
        Self { native, clipboard }
    }

    /// Desktop hosts have no share sheet; only the clipboard is wired.
    pub fn desktop() -> Self {
        Self::new(None, Some(Box::new(ClipboardShareTarget)))
    }

    /// Never fails; an undeliverable share reports [`ShareMechanism::None`].
    pub fn share(&mut self, text: &str) -> ShareResult {
        if let Some(native) = self.native.as_mut() {
            match native.share(text) {
                Ok(()) => {
                    info!("shared summary natively");
                    return ShareResult::delivered(ShareMechanism::Native);
                }
                Err(err) => warn!("native share failed, trying clipboard: {err}"),
            }
        }

        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.share(text) {
                Ok(()) => {
                    info!("copied summary to clipboard");
                    return ShareResult::delivered(ShareMechanism::Clipboard);
                }
                Err(err) => warn!("clipboard share failed: {err}"),
            }
        }

        ShareResult::not_delivered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    struct RecordingTarget {
        fail: bool,
        received: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingTarget {
        fn boxed(fail: bool) -> (Box<dyn ShareTarget + Send>, Arc<Mutex<Vec<String>>>) {
            let received = Arc::new(Mutex::new(Vec::new()));
            (
                Box::new(Self {
                    fail,
                    received: received.clone(),
                }),
                received,
            )
        }
    }

    impl ShareTarget for RecordingTarget {
        fn share(&mut self, text: &str) -> Result<(), ShareError> {
            if self.fail {
                return Err(ShareError::Unavailable("not here".to_string()));
            }
            self.received.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn native_share_wins_when_available() {
        let (native, native_log) = RecordingTarget::boxed(false);
        let (clipboard, clipboard_log) = RecordingTarget::boxed(false);
        let mut sharer = Sharer::new(Some(native), Some(clipboard));

        let result = sharer.share("hello");
        assert_eq!(result, ShareResult::delivered(ShareMechanism::Native));
        assert_eq!(native_log.lock().expect("lock").as_slice(), ["hello"]);
        assert!(clipboard_log.lock().expect("lock").is_empty());
    }

    #[test]
    fn failed_native_share_falls_back_to_clipboard() {
        let (native, _) = RecordingTarget::boxed(true);
        let (clipboard, clipboard_log) = RecordingTarget::boxed(false);
        let mut sharer = Sharer::new(Some(native), Some(clipboard));

        let result = sharer.share("hello");
        assert_eq!(result.mechanism, ShareMechanism::Clipboard);
        assert!(result.delivered);
        assert_eq!(clipboard_log.lock().expect("lock").len(), 1);
    }

    #[test]
    fn nothing_available_degrades_to_none() {
        let (clipboard, _) = RecordingTarget::boxed(true);
        let mut sharer = Sharer::new(None, Some(clipboard));
        assert_eq!(sharer.share("hello"), ShareResult::not_delivered());
        assert_eq!(Sharer::default().share("hello"), ShareResult::not_delivered());
    }
}
