use std::cell::RefCell;
use std::io::Write;

use hostbridge::script::run_script;
use hostbridge::{
    ArityPolicy, ClipboardFacade, ClipboardHandle, ComputationFacade, Dispatcher, EngineError,
    FendEngine, Invocation, Target, Value,
};

#[derive(Default)]
struct Viewer {
    shown: RefCell<Vec<Vec<usize>>>,
}

impl ClipboardHandle for Viewer {
    type Error = std::io::Error;

    fn show_clipboard(&self) -> std::io::Result<()> {
        self.shown.borrow_mut().push(vec![]);
        Ok(())
    }

    fn show_clipboard_in(&self, width: usize, height: usize) -> std::io::Result<()> {
        self.shown.borrow_mut().push(vec![width, height]);
        Ok(())
    }

    fn show_clipboard_from(
        &self,
        width: usize,
        height: usize,
        offset: usize,
    ) -> std::io::Result<()> {
        self.shown.borrow_mut().push(vec![width, height, offset]);
        Ok(())
    }
}

#[test]
fn script_drives_engine_and_clipboard() {
    let engine = FendEngine::new();
    let viewer = Viewer::default();
    let dispatcher = Dispatcher::new(
        ComputationFacade::new(&engine),
        ClipboardFacade::new(&viewer),
    );

    let script = r#"
{"target": "computation", "method": "mEvalString", "args": ["n = 2; A = [1 n; 3 4]"]}
{"target": "computation", "method": "mGetArray", "args": ["A", 1, 2]}
{"target": "computation", "method": "mMatrix2LaTeX"}
{"target": "clipboard", "method": "showClipboard"}
{"target": "clipboard", "method": "showClipboard", "args": [40, 5]}
"#;
    let mut out = Vec::new();
    let performed = run_script(&dispatcher, script.as_bytes(), &mut out).unwrap();

    assert_eq!(performed, 5);
    let lines: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(lines[0], "null");
    assert_eq!(lines[1], "[[1.0,2.0]]");
    let markup: String = serde_json::from_str(&lines[2]).unwrap();
    assert_eq!(
        markup,
        "\\left(\\begin{array}{cc}1 & 2 \\\\ 3 & 4\\end{array}\\right)"
    );
    assert_eq!(*viewer.shown.borrow(), vec![vec![], vec![40, 5]]);
}

#[test]
fn engine_errors_surface_unchanged() {
    let engine = FendEngine::new();
    let viewer = Viewer::default();
    let dispatcher = Dispatcher::new(
        ComputationFacade::new(&engine),
        ClipboardFacade::new(&viewer),
    );

    let err = dispatcher
        .call(&Invocation::new(
            Target::Computation,
            "get_array",
            vec!["missing".into()],
        ))
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::UnknownVariable(name)) if name == "missing"
    ));
}

#[test]
fn lenient_dispatch_leaves_engine_untouched() {
    let engine = FendEngine::new();
    let viewer = Viewer::default();
    let dispatcher = Dispatcher::new(
        ComputationFacade::new(&engine),
        ClipboardFacade::new(&viewer),
    )
    .with_policy(ArityPolicy::Lenient);

    let result = dispatcher
        .call(&Invocation::new(
            Target::Computation,
            "mEvalString",
            vec!["x = 1".into(), "y = 2".into()],
        ))
        .unwrap();

    assert_eq!(result, None);
    assert!(engine.variable("x").is_none());
    assert!(engine.current().is_none());
}

#[test]
fn macro_file_through_facade() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# weights").unwrap();
    writeln!(file, "w = [0.5 0.25]").unwrap();
    file.flush().unwrap();

    let engine = FendEngine::new();
    let facade = ComputationFacade::new(&engine);
    facade
        .eval_macro_file(file.path().to_str().unwrap())
        .unwrap();

    assert_eq!(
        facade.matrix_to_markup().unwrap(),
        "\\left(\\begin{array}{cc}0.5 & 0.25\\end{array}\\right)"
    );
    assert!(std::ptr::eq(facade.native(), &engine));
    assert_eq!(
        Value::from(engine.variable("w").unwrap()),
        Value::Matrix(vec![vec![0.5, 0.25]])
    );
}
