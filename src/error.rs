//! Errors raised by the facades' dynamic entry points.

use thiserror::Error;

/// Failure of a dynamically-shaped facade call.
///
/// `E` is the native handle's own error type. It is carried as-is so callers
/// can recover it with [`BridgeError::into_native`].
#[derive(Debug, Error)]
pub enum BridgeError<E> {
    /// The native handle failed.
    #[error(transparent)]
    Native(E),

    /// The call's argument count matches none of the method's shapes.
    /// No native call was issued.
    #[error("{method} does not accept {arity} argument(s)")]
    UnsupportedArity { method: &'static str, arity: usize },

    /// An argument has the wrong type. No native call was issued.
    #[error("argument {index} of {method} must be {expected}")]
    InvalidArgument {
        method: &'static str,
        index: usize,
        expected: &'static str,
    },
}

impl<E> BridgeError<E> {
    /// Check if this is an unsupported-arity rejection.
    pub fn is_unsupported_arity(&self) -> bool {
        matches!(self, Self::UnsupportedArity { .. })
    }

    /// The native error, if the native handle is what failed.
    pub fn into_native(self) -> Option<E> {
        match self {
            Self::Native(e) => Some(e),
            _ => None,
        }
    }

    /// Convert the native error type, keeping the other variants.
    pub fn map_native<F>(self, f: impl FnOnce(E) -> F) -> BridgeError<F> {
        match self {
            Self::Native(e) => BridgeError::Native(f(e)),
            Self::UnsupportedArity { method, arity } => {
                BridgeError::UnsupportedArity { method, arity }
            }
            Self::InvalidArgument {
                method,
                index,
                expected,
            } => BridgeError::InvalidArgument {
                method,
                index,
                expected,
            },
        }
    }
}
