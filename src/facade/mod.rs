//! Facades over native handles.
//!
//! Each facade captures a borrowed handle and exposes a fixed surface. The
//! typed methods take request enums; the `*_args` methods accept a dynamic
//! argument list from scripting callers and reject shapes they don't know
//! without touching the handle.

mod clipboard;
mod computation;

pub use clipboard::{ClipboardFacade, ClipboardRequest};
pub use computation::{ArrayReply, ArrayRequest, ComputationFacade};

use crate::error::BridgeError;
use crate::script::Value;

/// Read argument `index` as text.
pub(crate) fn text_arg<'a, E>(
    method: &'static str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a str, BridgeError<E>> {
    args[index].as_str().ok_or(BridgeError::InvalidArgument {
        method,
        index,
        expected: "a string",
    })
}

/// Read argument `index` as a non-negative count.
pub(crate) fn count_arg<E>(
    method: &'static str,
    args: &[Value],
    index: usize,
) -> Result<usize, BridgeError<E>> {
    args[index].as_count().ok_or(BridgeError::InvalidArgument {
        method,
        index,
        expected: "a non-negative integer",
    })
}
