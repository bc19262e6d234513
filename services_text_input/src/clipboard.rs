//! System clipboard seam.

use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Clipboard error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard holds no text")]
    Empty,

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Plain-text clipboard provided by the host.
pub trait Clipboard {
    fn get_text(&self) -> Result<String, ClipboardError>;
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard.
///
/// Clones share contents, so a test can keep a handle to what the service writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        *clipboard.contents.borrow_mut() = Some(text.into());
        clipboard
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Result<String, ClipboardError> {
        self.contents.borrow().clone().ok_or(ClipboardError::Empty)
    }

    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
