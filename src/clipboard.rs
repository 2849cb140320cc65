//! System clipboard access.
//!
//! The dashboard only ever writes to the clipboard, and a copy that fails
//! must not disturb the view, so failures here are surfaced to callers as
//! values they are free to ignore.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write failed: {0}")]
    Write(String),
}

#[cfg(test)]
use mockall::automock;

/// Write-only clipboard capability.
#[cfg_attr(test, automock)]
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The real system clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connects to the system clipboard. Fails on headless displays; the
    /// dashboard then runs with copying disabled.
    pub fn new() -> Result<Self, ClipboardError> {
        let inner =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}
