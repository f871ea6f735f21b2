//! Facade over a numerical-computation engine.

use std::fmt;

use tracing::debug;

use super::{count_arg, text_arg};
use crate::error::BridgeError;
use crate::native::ComputationHandle;
use crate::script::Value;

/// The two shapes of an array lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayRequest<'a> {
    /// Fetch the named array as markup.
    ByName(&'a str),
    /// Fetch a `rows x cols` block of the named array in native form.
    ByNameAndRange {
        name: &'a str,
        rows: usize,
        cols: usize,
    },
}

/// Result of an array lookup. The variant mirrors the request.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayReply<A> {
    /// Reply to [`ArrayRequest::ByName`].
    Markup(String),
    /// Reply to [`ArrayRequest::ByNameAndRange`].
    Array(A),
}

/// A borrowed computation engine with a reduced, stable surface.
pub struct ComputationFacade<'h, H: ?Sized> {
    handle: &'h H,
}

impl<'h, H: ?Sized> ComputationFacade<'h, H> {
    /// Wrap a handle. Issues no call against it.
    pub fn new(handle: &'h H) -> Self {
        Self { handle }
    }

    /// The wrapped handle, exactly as supplied to [`new`](Self::new).
    pub fn native(&self) -> &'h H {
        self.handle
    }
}

impl<'h, H: ComputationHandle + ?Sized> ComputationFacade<'h, H> {
    /// Evaluate an expression verbatim.
    pub fn eval_expression(&self, expression: &str) -> Result<(), H::Error> {
        debug!(expression, "forwarding eval_string");
        self.handle.eval_string(expression)
    }

    /// Evaluate a macro file.
    pub fn eval_macro_file(&self, path: &str) -> Result<(), H::Error> {
        debug!(path, "forwarding eval_mfile");
        self.handle.eval_mfile(path)
    }

    /// Markup for the engine's current matrix.
    pub fn matrix_to_markup(&self) -> Result<String, H::Error> {
        self.handle.matrix_to_latex()
    }

    /// Look up an array.
    pub fn get_array(&self, request: ArrayRequest<'_>) -> Result<ArrayReply<H::Array>, H::Error> {
        match request {
            ArrayRequest::ByName(name) => {
                debug!(name, "forwarding get_array_latex");
                self.handle.get_array_latex(name).map(ArrayReply::Markup)
            }
            ArrayRequest::ByNameAndRange { name, rows, cols } => {
                debug!(name, rows, cols, "forwarding get_array");
                self.handle.get_array(name, rows, cols).map(ArrayReply::Array)
            }
        }
    }

    /// Look up an array from a dynamic argument list.
    ///
    /// `[name]` fetches markup, `[name, rows, cols]` fetches a block. Any
    /// other count is rejected before the handle is touched.
    pub fn get_array_args(
        &self,
        args: &[Value],
    ) -> Result<ArrayReply<H::Array>, BridgeError<H::Error>> {
        const METHOD: &str = "get_array";

        let request = match args.len() {
            1 => ArrayRequest::ByName(text_arg::<H::Error>(METHOD, args, 0)?),
            3 => ArrayRequest::ByNameAndRange {
                name: text_arg::<H::Error>(METHOD, args, 0)?,
                rows: count_arg::<H::Error>(METHOD, args, 1)?,
                cols: count_arg::<H::Error>(METHOD, args, 2)?,
            },
            arity => {
                return Err(BridgeError::UnsupportedArity {
                    method: METHOD,
                    arity,
                });
            }
        };

        self.get_array(request).map_err(BridgeError::Native)
    }
}

impl<H: ?Sized> Clone for ComputationFacade<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for ComputationFacade<'_, H> {}

impl<H: ?Sized> fmt::Debug for ComputationFacade<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputationFacade").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        EvalString(String),
        EvalMFile(String),
        MatrixToLatex,
        GetArrayLatex(String),
        GetArray(String, usize, usize),
    }

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Call>>,
        fail: bool,
    }

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn record(&self, call: Call) -> Result<(), String> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                Err("native failure".to_string())
            } else {
                Ok(())
            }
        }
    }

    impl ComputationHandle for Recorder {
        type Error = String;
        type Array = Vec<f64>;

        fn eval_string(&self, expression: &str) -> Result<(), String> {
            self.record(Call::EvalString(expression.to_string()))
        }

        fn eval_mfile(&self, path: &str) -> Result<(), String> {
            self.record(Call::EvalMFile(path.to_string()))
        }

        fn matrix_to_latex(&self) -> Result<String, String> {
            self.record(Call::MatrixToLatex)?;
            Ok("\\left(1\\right)".to_string())
        }

        fn get_array_latex(&self, name: &str) -> Result<String, String> {
            self.record(Call::GetArrayLatex(name.to_string()))?;
            Ok(format!("markup:{name}"))
        }

        fn get_array(&self, name: &str, rows: usize, cols: usize) -> Result<Vec<f64>, String> {
            self.record(Call::GetArray(name.to_string(), rows, cols))?;
            Ok(vec![rows as f64, cols as f64])
        }
    }

    #[test]
    fn test_construction_issues_no_calls() {
        let recorder = Recorder::default();
        let _facade = ComputationFacade::new(&recorder);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_native_is_identical() {
        let recorder = Recorder::default();
        let facade = ComputationFacade::new(&recorder);
        assert!(std::ptr::eq(facade.native(), &recorder));
    }

    #[test]
    fn test_eval_expression_forwards_once() {
        let recorder = Recorder::default();
        ComputationFacade::new(&recorder).eval_expression("x=1").unwrap();
        assert_eq!(recorder.calls(), vec![Call::EvalString("x=1".into())]);
    }

    #[test]
    fn test_eval_macro_file_forwards_path() {
        let recorder = Recorder::default();
        ComputationFacade::new(&recorder)
            .eval_macro_file("/tmp/setup.m")
            .unwrap();
        assert_eq!(recorder.calls(), vec![Call::EvalMFile("/tmp/setup.m".into())]);
    }

    #[test]
    fn test_matrix_to_markup_returns_native_value() {
        let recorder = Recorder::default();
        let markup = ComputationFacade::new(&recorder).matrix_to_markup().unwrap();
        assert_eq!(markup, "\\left(1\\right)");
        assert_eq!(recorder.calls(), vec![Call::MatrixToLatex]);
    }

    #[test]
    fn test_get_array_by_name() {
        let recorder = Recorder::default();
        let reply = ComputationFacade::new(&recorder)
            .get_array(ArrayRequest::ByName("A"))
            .unwrap();
        assert_eq!(reply, ArrayReply::Markup("markup:A".into()));
        assert_eq!(recorder.calls(), vec![Call::GetArrayLatex("A".into())]);
    }

    #[test]
    fn test_get_array_by_range_keeps_order() {
        let recorder = Recorder::default();
        let reply = ComputationFacade::new(&recorder)
            .get_array(ArrayRequest::ByNameAndRange {
                name: "B",
                rows: 2,
                cols: 5,
            })
            .unwrap();
        assert_eq!(reply, ArrayReply::Array(vec![2.0, 5.0]));
        assert_eq!(recorder.calls(), vec![Call::GetArray("B".into(), 2, 5)]);
    }

    #[test]
    fn test_get_array_args_shapes() {
        let recorder = Recorder::default();
        let facade = ComputationFacade::new(&recorder);

        facade.get_array_args(&[Value::from("A")]).unwrap();
        facade
            .get_array_args(&[Value::from("A"), Value::from(3usize), Value::from(1usize)])
            .unwrap();

        assert_eq!(
            recorder.calls(),
            vec![
                Call::GetArrayLatex("A".into()),
                Call::GetArray("A".into(), 3, 1),
            ]
        );
    }

    #[test]
    fn test_get_array_args_unsupported_arity_issues_no_calls() {
        let recorder = Recorder::default();
        let facade = ComputationFacade::new(&recorder);
        let a = Value::from("A");
        let n = Value::from(1usize);

        for args in [vec![], vec![a.clone(), n.clone()], vec![a, n.clone(), n.clone(), n]] {
            let err = facade.get_array_args(&args).unwrap_err();
            assert!(err.is_unsupported_arity());
        }
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_get_array_args_invalid_argument() {
        let recorder = Recorder::default();
        let facade = ComputationFacade::new(&recorder);

        let err = facade
            .get_array_args(&[Value::from("A"), Value::from("two"), Value::from(1usize)])
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::InvalidArgument {
                method: "get_array",
                index: 1,
                ..
            }
        ));

        let err = facade.get_array_args(&[Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArgument { index: 0, .. }));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_native_failure_passes_through() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let facade = ComputationFacade::new(&recorder);

        assert_eq!(facade.eval_expression("1+").unwrap_err(), "native failure");
        let err = facade.get_array_args(&[Value::from("A")]).unwrap_err();
        assert_eq!(err.into_native().as_deref(), Some("native failure"));
    }

    #[test]
    fn test_works_through_trait_object() {
        let recorder = Recorder::default();
        let handle: &dyn ComputationHandle<Error = String, Array = Vec<f64>> = &recorder;
        let facade = ComputationFacade::new(handle);
        facade.eval_expression("y = 2").unwrap();
        assert_eq!(recorder.calls(), vec![Call::EvalString("y = 2".into())]);
    }
}
