//! Scripting surface: routes named, dynamically-typed calls to the facades.
//!
//! An [`Invocation`] names a target facade, a method and a list of
//! [`Value`] arguments. Method names are accepted in snake_case and under the
//! legacy plugin names (`mEvalString`, `mGetArray`, ...).

mod value;

pub use value::Value;

use std::error::Error as StdError;
use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BridgeError;
use crate::facade::{ArrayReply, ClipboardFacade, ComputationFacade, text_arg};
use crate::native::{ClipboardHandle, ComputationHandle};

/// How calls with an unrecognized argument count are answered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArityPolicy {
    /// Fail with [`BridgeError::UnsupportedArity`].
    #[default]
    Strict,
    /// Do nothing and return no value.
    Lenient,
}

/// Which facade an invocation addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Computation,
    Clipboard,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computation => f.write_str("computation"),
            Self::Clipboard => f.write_str("clipboard"),
        }
    }
}

/// One scripted call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub target: Target,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl Invocation {
    pub fn new(target: Target, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            target,
            method: method.into(),
            args,
        }
    }
}

/// Routes invocations to a computation facade and a clipboard facade.
pub struct Dispatcher<'h, C: ?Sized, K: ?Sized> {
    computation: ComputationFacade<'h, C>,
    clipboard: ClipboardFacade<'h, K>,
    policy: ArityPolicy,
}

impl<'h, C, K> Dispatcher<'h, C, K>
where
    C: ComputationHandle + ?Sized,
    C::Error: StdError + Send + Sync + 'static,
    C::Array: Into<Value>,
    K: ClipboardHandle + ?Sized,
    K::Error: StdError + Send + Sync + 'static,
{
    pub fn new(computation: ComputationFacade<'h, C>, clipboard: ClipboardFacade<'h, K>) -> Self {
        Self {
            computation,
            clipboard,
            policy: ArityPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ArityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Perform one invocation.
    ///
    /// Native failures come back as the handle's own error, reachable with
    /// `anyhow::Error::downcast_ref`.
    pub fn call(&self, invocation: &Invocation) -> anyhow::Result<Option<Value>> {
        let args = invocation.args.as_slice();
        match invocation.target {
            Target::Computation => {
                let result = self.call_computation(&invocation.method, args)?;
                self.settle(result)
            }
            Target::Clipboard => {
                let result = self.call_clipboard(&invocation.method, args)?;
                self.settle(result)
            }
        }
    }

    fn call_computation(
        &self,
        method: &str,
        args: &[Value],
    ) -> anyhow::Result<Result<Option<Value>, BridgeError<C::Error>>> {
        let result = match method {
            "eval_expression" | "mEvalString" => self.eval_expression(args),
            "eval_macro_file" | "mEvalMFile" => self.eval_macro_file(args),
            "matrix_to_markup" | "mMatrix2LaTeX" => self.matrix_to_markup(args),
            "get_array" | "mGetArray" => self.computation.get_array_args(args).map(|reply| {
                Some(match reply {
                    ArrayReply::Markup(markup) => Value::Text(markup),
                    ArrayReply::Array(array) => array.into(),
                })
            }),
            _ => bail!("computation has no method `{method}`"),
        };
        Ok(result)
    }

    fn eval_expression(&self, args: &[Value]) -> Result<Option<Value>, BridgeError<C::Error>> {
        const METHOD: &str = "eval_expression";
        fixed_arity::<C::Error>(METHOD, args, 1)?;
        let expression = text_arg::<C::Error>(METHOD, args, 0)?;
        self.computation
            .eval_expression(expression)
            .map_err(BridgeError::Native)?;
        Ok(None)
    }

    fn eval_macro_file(&self, args: &[Value]) -> Result<Option<Value>, BridgeError<C::Error>> {
        const METHOD: &str = "eval_macro_file";
        fixed_arity::<C::Error>(METHOD, args, 1)?;
        let path = text_arg::<C::Error>(METHOD, args, 0)?;
        self.computation
            .eval_macro_file(path)
            .map_err(BridgeError::Native)?;
        Ok(None)
    }

    fn matrix_to_markup(&self, args: &[Value]) -> Result<Option<Value>, BridgeError<C::Error>> {
        fixed_arity::<C::Error>("matrix_to_markup", args, 0)?;
        let markup = self
            .computation
            .matrix_to_markup()
            .map_err(BridgeError::Native)?;
        Ok(Some(Value::Text(markup)))
    }

    fn call_clipboard(
        &self,
        method: &str,
        args: &[Value],
    ) -> anyhow::Result<Result<Option<Value>, BridgeError<K::Error>>> {
        match method {
            "show_clipboard" | "showClipboard" => {
                Ok(self.clipboard.show_clipboard_args(args).map(|()| None))
            }
            _ => bail!("clipboard has no method `{method}`"),
        }
    }

    /// Apply the arity policy and surface native errors unwrapped.
    fn settle<E>(
        &self,
        result: Result<Option<Value>, BridgeError<E>>,
    ) -> anyhow::Result<Option<Value>>
    where
        E: StdError + Send + Sync + 'static,
    {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_unsupported_arity() && self.policy == ArityPolicy::Lenient => {
                debug!(%err, "ignoring call with unsupported arity");
                Ok(None)
            }
            Err(BridgeError::Native(native)) => Err(anyhow::Error::new(native)),
            Err(err) => Err(err.into()),
        }
    }
}

fn fixed_arity<E>(
    method: &'static str,
    args: &[Value],
    arity: usize,
) -> Result<(), BridgeError<E>> {
    if args.len() == arity {
        Ok(())
    } else {
        Err(BridgeError::UnsupportedArity {
            method,
            arity: args.len(),
        })
    }
}

/// Run a JSON-lines script, writing one JSON result per invocation.
///
/// Blank lines and lines starting with `#` are skipped. The first failing
/// line stops the run. Returns the number of invocations performed.
pub fn run_script<C, K>(
    dispatcher: &Dispatcher<'_, C, K>,
    reader: impl BufRead,
    mut writer: impl Write,
) -> anyhow::Result<usize>
where
    C: ComputationHandle + ?Sized,
    C::Error: StdError + Send + Sync + 'static,
    C::Array: Into<Value>,
    K: ClipboardHandle + ?Sized,
    K::Error: StdError + Send + Sync + 'static,
{
    let mut performed = 0;

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read script line {number}"))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invocation: Invocation = serde_json::from_str(line)
            .with_context(|| format!("line {number}: invalid invocation"))?;
        let result = dispatcher.call(&invocation).with_context(|| {
            format!("line {number}: {}.{}", invocation.target, invocation.method)
        })?;

        serde_json::to_writer(&mut writer, &result)?;
        writeln!(writer)?;
        performed += 1;
    }

    writer.flush()?;
    Ok(performed)
}
