//! System clipboard through `arboard`

use crate::core::error::{AgentError, Result};
use crate::platform::TextClipboard;
use arboard::Clipboard;
use std::sync::Mutex;

/// Clipboard handle kept open for the life of the process
///
/// On X11 the clipboard contents are served by the owning handle, so it must
/// outlive the paste that follows `set_text`.
pub struct ArboardClipboard {
    inner: Mutex<Clipboard>,
}

impl ArboardClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().map_err(|e| AgentError::Clipboard(e.to_string()))?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl TextClipboard for ArboardClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| AgentError::Clipboard("clipboard lock poisoned".into()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| AgentError::Clipboard(e.to_string()))
    }
}
