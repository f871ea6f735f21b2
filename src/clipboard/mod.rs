//! System clipboard viewer.
//!
//! This module provides:
//! - [`SystemClipboard`], a clipboard handle that renders the OS clipboard
//!   into a writer
//! - viewport rendering of clipboard text
//! - copying text to the clipboard

mod copy;
mod view;

pub use copy::copy_to_clipboard;
pub use view::{ClipboardContent, Viewport, render};

use std::cell::RefCell;
use std::io::Write;

use arboard::Clipboard;
use thiserror::Error;
use tracing::debug;

use crate::native::ClipboardHandle;

/// Errors raised by [`SystemClipboard`].
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Access(#[from] arboard::Error),

    #[error("failed to write clipboard contents: {0}")]
    Write(#[from] std::io::Error),
}

/// The OS clipboard, shown by writing its contents to a sink.
///
/// The OS clipboard is opened on first use.
pub struct SystemClipboard {
    clipboard: RefCell<Option<Clipboard>>,
    out: RefCell<Box<dyn Write>>,
    ellipsis: bool,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClipboard {
    /// Create a clipboard viewer showing contents on stdout.
    pub fn new() -> Self {
        Self {
            clipboard: RefCell::new(None),
            out: RefCell::new(Box::new(std::io::stdout())),
            ellipsis: true,
        }
    }

    /// Show contents on `out` instead of stdout.
    pub fn with_writer(mut self, out: impl Write + 'static) -> Self {
        self.out = RefCell::new(Box::new(out));
        self
    }

    /// Mark clipped lines with `…`.
    pub fn with_ellipsis(mut self, ellipsis: bool) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    /// Read what the clipboard currently holds.
    pub fn content(&self) -> Result<ClipboardContent, ClipboardError> {
        let mut slot = self.clipboard.borrow_mut();
        let clipboard = match slot.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new()?,
        };
        let clipboard = slot.insert(clipboard);

        match clipboard.get_text() {
            Ok(text) if text.is_empty() => Ok(ClipboardContent::Empty),
            Ok(text) => Ok(ClipboardContent::Text(text)),
            Err(arboard::Error::ContentNotAvailable) => match clipboard.get_image() {
                Ok(image) => Ok(ClipboardContent::Image {
                    width: image.width,
                    height: image.height,
                }),
                Err(arboard::Error::ContentNotAvailable) => Ok(ClipboardContent::Empty),
                Err(e) => Err(e.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    fn show(&self, viewport: Option<Viewport>) -> Result<(), ClipboardError> {
        let content = self.content()?;
        debug!(?viewport, "showing clipboard");

        let rendered = render(&content, viewport, self.ellipsis);
        let mut out = self.out.borrow_mut();
        if rendered.ends_with('\n') {
            out.write_all(rendered.as_bytes())?;
        } else {
            writeln!(out, "{rendered}")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl ClipboardHandle for SystemClipboard {
    type Error = ClipboardError;

    fn show_clipboard(&self) -> Result<(), ClipboardError> {
        self.show(None)
    }

    fn show_clipboard_in(&self, width: usize, height: usize) -> Result<(), ClipboardError> {
        self.show(Some(Viewport {
            width,
            height,
            offset: 0,
        }))
    }

    fn show_clipboard_from(
        &self,
        width: usize,
        height: usize,
        offset: usize,
    ) -> Result<(), ClipboardError> {
        self.show(Some(Viewport {
            width,
            height,
            offset,
        }))
    }
}
