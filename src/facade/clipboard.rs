//! Facade over a clipboard viewer.

use std::fmt;

use tracing::debug;

use super::count_arg;
use crate::error::BridgeError;
use crate::native::ClipboardHandle;
use crate::script::Value;

/// The three shapes of a "show clipboard" request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipboardRequest {
    /// Show everything.
    Plain,
    /// Show a `width x height` viewport.
    Viewport { width: usize, height: usize },
    /// Show a viewport starting `offset` lines down.
    ScrolledViewport {
        width: usize,
        height: usize,
        offset: usize,
    },
}

/// A borrowed clipboard with a reduced, stable surface.
pub struct ClipboardFacade<'h, H: ?Sized> {
    handle: &'h H,
}

impl<'h, H: ?Sized> ClipboardFacade<'h, H> {
    /// Wrap a handle. Issues no call against it.
    pub fn new(handle: &'h H) -> Self {
        Self { handle }
    }

    /// The wrapped handle, exactly as supplied to [`new`](Self::new).
    pub fn native(&self) -> &'h H {
        self.handle
    }
}

impl<'h, H: ClipboardHandle + ?Sized> ClipboardFacade<'h, H> {
    /// Show the clipboard in the requested shape, forwarding the handle's
    /// error unchanged.
    pub fn show_clipboard(&self, request: ClipboardRequest) -> Result<(), H::Error> {
        debug!(?request, "forwarding show_clipboard");
        match request {
            ClipboardRequest::Plain => self.handle.show_clipboard(),
            ClipboardRequest::Viewport { width, height } => {
                self.handle.show_clipboard_in(width, height)
            }
            ClipboardRequest::ScrolledViewport {
                width,
                height,
                offset,
            } => self.handle.show_clipboard_from(width, height, offset),
        }
    }

    /// Show the clipboard from a dynamic argument list of 0, 2 or 3 counts.
    pub fn show_clipboard_args(&self, args: &[Value]) -> Result<(), BridgeError<H::Error>> {
        const METHOD: &str = "show_clipboard";

        let request = match args.len() {
            0 => ClipboardRequest::Plain,
            2 => ClipboardRequest::Viewport {
                width: count_arg::<H::Error>(METHOD, args, 0)?,
                height: count_arg::<H::Error>(METHOD, args, 1)?,
            },
            3 => ClipboardRequest::ScrolledViewport {
                width: count_arg::<H::Error>(METHOD, args, 0)?,
                height: count_arg::<H::Error>(METHOD, args, 1)?,
                offset: count_arg::<H::Error>(METHOD, args, 2)?,
            },
            arity => {
                return Err(BridgeError::UnsupportedArity {
                    method: METHOD,
                    arity,
                });
            }
        };

        self.show_clipboard(request).map_err(BridgeError::Native)
    }
}

impl<H: ?Sized> Clone for ClipboardFacade<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for ClipboardFacade<'_, H> {}

impl<H: ?Sized> fmt::Debug for ClipboardFacade<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipboardFacade").finish_non_exhaustive()
    }
}
