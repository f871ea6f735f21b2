//! Stable facades over host-provided automation objects.
//!
//! A [`ComputationFacade`] wraps a borrowed [`ComputationHandle`] and a
//! [`ClipboardFacade`] wraps a borrowed [`ClipboardHandle`]. Each facade
//! forwards a small fixed surface to its handle and hands the handle back
//! through `native()`.
//!
//! [`FendEngine`] and [`SystemClipboard`] are ready-made handles, and the
//! [`script`] module drives both facades from JSON invocations.

pub mod clipboard;
pub mod config;
pub mod engine;
pub mod error;
pub mod facade;
pub mod native;
pub mod script;

pub use clipboard::{ClipboardError, SystemClipboard};
pub use config::Config;
pub use engine::{EngineError, FendEngine, Matrix, MatrixMarkup};
pub use error::BridgeError;
pub use facade::{ArrayReply, ArrayRequest, ClipboardFacade, ClipboardRequest, ComputationFacade};
pub use native::{ClipboardHandle, ComputationHandle};
pub use script::{ArityPolicy, Dispatcher, Invocation, Target, Value};
