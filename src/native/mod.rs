//! Capability traits for the host objects the facades forward to.
//!
//! A native handle is opaque to this crate: the facades only ever issue the
//! calls declared here. Handles take `&self` everywhere and are expected to
//! guard their own state.

/// A numerical-computation engine session.
pub trait ComputationHandle {
    /// Failure raised by the engine. Facades pass it through untouched.
    type Error;

    /// The engine's native array representation, returned by [`get_array`].
    ///
    /// [`get_array`]: ComputationHandle::get_array
    type Array;

    /// Evaluate an expression or statement block.
    fn eval_string(&self, expression: &str) -> Result<(), Self::Error>;

    /// Evaluate a macro file.
    fn eval_mfile(&self, path: &str) -> Result<(), Self::Error>;

    /// Markup for the engine's current matrix.
    fn matrix_to_latex(&self) -> Result<String, Self::Error>;

    /// Markup for the named array.
    fn get_array_latex(&self, name: &str) -> Result<String, Self::Error>;

    /// The top-left `rows x cols` block of the named array.
    fn get_array(&self, name: &str, rows: usize, cols: usize)
    -> Result<Self::Array, Self::Error>;
}

/// A clipboard viewer.
pub trait ClipboardHandle {
    /// Failure raised by the clipboard. Facades pass it through untouched.
    type Error;

    /// Show the whole clipboard.
    fn show_clipboard(&self) -> Result<(), Self::Error>;

    /// Show the clipboard clipped to a `width x height` viewport.
    fn show_clipboard_in(&self, width: usize, height: usize) -> Result<(), Self::Error>;

    /// Show the clipboard in a viewport, starting `offset` lines down.
    fn show_clipboard_from(
        &self,
        width: usize,
        height: usize,
        offset: usize,
    ) -> Result<(), Self::Error>;
}
