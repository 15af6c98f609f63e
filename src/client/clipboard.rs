//! System clipboard writes for copied swatches.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(String);

/// Lazily opened system clipboard.
///
/// The handle is kept for the life of the client: on X11 the copied text
/// is only served while its owner is alive.
#[derive(Default)]
pub struct SwatchClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SwatchClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?,
        };
        self.inner
            .insert(clipboard)
            .set_text(text.to_string())
            .map_err(|e| ClipboardError(e.to_string()))
    }
}
