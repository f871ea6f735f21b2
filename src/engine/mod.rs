//! A computation engine backed by fend.
//!
//! The engine keeps a workspace of named matrices and a current matrix
//! (`ans`, the result of the most recent statement). Scalar arithmetic is
//! delegated to `fend-core`; matrices are built from literals whose elements
//! are scalar expressions.

mod matrix;
mod statement;

pub use matrix::{Matrix, MatrixMarkup, format_number};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::native::ComputationHandle;
use statement::{Rhs, parse_statement, split_matrix_literal, split_statements, substitute};

/// Name of the implicit result variable.
pub const ANS: &str = "ans";

/// Errors raised by [`FendEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to evaluate `{expression}`: {message}")]
    Evaluation { expression: String, message: String },

    #[error("`{expression}` evaluated to `{output}`, which is not a plain number")]
    NotNumeric { expression: String, output: String },

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable `{0}` is a matrix and cannot be used in a scalar expression")]
    NotScalar(String),

    #[error("invalid variable name `{0}`")]
    InvalidName(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("matrix rows have different lengths ({expected} and {found})")]
    RaggedMatrix { expected: usize, found: usize },

    #[error("no current matrix")]
    NoCurrentMatrix,

    #[error("{rows}x{cols} is outside `{name}` ({available_rows}x{available_cols})")]
    OutOfRange {
        name: String,
        rows: usize,
        cols: usize,
        available_rows: usize,
        available_cols: usize,
    },

    #[error("failed to read macro file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {source}", path.display())]
    Macro {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<EngineError>,
    },
}

struct Workspace {
    context: fend_core::Context,
    variables: BTreeMap<String, Matrix>,
    /// Fully substituted source of each scalar variable, substituted in
    /// place of its rounded value.
    exact: BTreeMap<String, String>,
    current: Option<Matrix>,
}

/// Computation engine session.
pub struct FendEngine {
    workspace: RefCell<Workspace>,
    markup: MatrixMarkup,
}

impl Default for FendEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FendEngine {
    pub fn new() -> Self {
        Self::with_markup(MatrixMarkup::default())
    }

    /// Create an engine rendering matrices with the given environment.
    pub fn with_markup(markup: MatrixMarkup) -> Self {
        Self {
            workspace: RefCell::new(Workspace {
                context: fend_core::Context::new(),
                variables: BTreeMap::new(),
                exact: BTreeMap::new(),
                current: None,
            }),
            markup,
        }
    }

    /// Get a copy of a workspace variable.
    pub fn variable(&self, name: &str) -> Option<Matrix> {
        self.workspace.borrow().variables.get(name).cloned()
    }

    /// Get a copy of the current matrix.
    pub fn current(&self) -> Option<Matrix> {
        self.workspace.borrow().current.clone()
    }

    fn lookup(&self, name: &str) -> Result<Matrix, EngineError> {
        self.variable(name)
            .ok_or_else(|| EngineError::UnknownVariable(name.to_string()))
    }
}

impl Workspace {
    fn execute(&mut self, input: &str) -> Result<(), EngineError> {
        let statement = parse_statement(input)?;

        let (value, exact) = match statement.rhs {
            Rhs::MatrixLiteral(body) => self.eval_matrix_literal(body)?,
            Rhs::Variable(name) => match self.variables.get(name) {
                Some(matrix) => (matrix.clone(), self.exact.get(name).cloned()),
                // Not a variable: constants like `pi` still evaluate.
                None => {
                    let (value, resolved) = self.eval_scalar(name)?;
                    (Matrix::scalar(value), Some(resolved))
                }
            },
            Rhs::Expression(expression) => {
                let (value, resolved) = self.eval_scalar(expression)?;
                (Matrix::scalar(value), Some(resolved))
            }
        };

        let target = statement.target.unwrap_or(ANS);
        debug!(target, rows = value.rows(), cols = value.cols(), "assigned");
        match exact {
            Some(exact) => self.exact.insert(target.to_string(), exact),
            None => self.exact.remove(target),
        };
        self.variables.insert(target.to_string(), value.clone());
        self.current = Some(value);
        Ok(())
    }

    /// Evaluate a literal, keeping the exact source when it is 1x1.
    fn eval_matrix_literal(
        &mut self,
        body: &str,
    ) -> Result<(Matrix, Option<String>), EngineError> {
        let mut rows = Vec::new();
        let mut last = None;
        for row in split_matrix_literal(body) {
            let mut values = Vec::with_capacity(row.len());
            for element in row {
                let (value, resolved) = self.eval_scalar(element)?;
                values.push(value);
                last = Some(resolved);
            }
            rows.push(values);
        }

        let matrix = Matrix::from_rows(rows)?;
        let exact = last.filter(|_| matrix.as_scalar().is_some());
        Ok((matrix, exact))
    }

    /// Evaluate a scalar expression, returning its value and its source with
    /// every variable substituted.
    fn eval_scalar(&mut self, expression: &str) -> Result<(f64, String), EngineError> {
        let variables = &self.variables;
        let exact = &self.exact;
        let resolved = substitute(expression, |name| match variables.get(name) {
            None => Ok(None),
            Some(matrix) => match (exact.get(name), matrix.as_scalar()) {
                (Some(source), _) => Ok(Some(format!("({source})"))),
                (None, Some(v)) => Ok(Some(format!("({v})"))),
                (None, None) => Err(EngineError::NotScalar(name.to_string())),
            },
        })?;

        let result = fend_core::evaluate(&resolved, &mut self.context).map_err(|message| {
            EngineError::Evaluation {
                expression: expression.to_string(),
                message,
            }
        })?;

        let value =
            parse_fend_number(result.get_main_result()).ok_or_else(|| EngineError::NotNumeric {
                expression: expression.to_string(),
                output: result.get_main_result().to_string(),
            })?;
        Ok((value, resolved))
    }
}

/// Parse fend's textual result as a plain number.
fn parse_fend_number(output: &str) -> Option<f64> {
    let output = output.trim();
    let output = output.strip_prefix("approx.").unwrap_or(output).trim();
    output.replace(',', "").parse().ok()
}

impl ComputationHandle for FendEngine {
    type Error = EngineError;
    type Array = Matrix;

    fn eval_string(&self, expression: &str) -> Result<(), EngineError> {
        let mut workspace = self.workspace.borrow_mut();
        for (_, statement) in split_statements(expression) {
            workspace.execute(statement)?;
        }
        Ok(())
    }

    fn eval_mfile(&self, path: &str) -> Result<(), EngineError> {
        let path = PathBuf::from(path);
        let source = std::fs::read_to_string(&path).map_err(|source| EngineError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "evaluating macro file");

        let mut workspace = self.workspace.borrow_mut();
        for (line, statement) in split_statements(&source) {
            workspace
                .execute(statement)
                .map_err(|source| EngineError::Macro {
                    path: path.clone(),
                    line,
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    fn matrix_to_latex(&self) -> Result<String, EngineError> {
        self.current()
            .map(|matrix| matrix.to_latex(self.markup))
            .ok_or(EngineError::NoCurrentMatrix)
    }

    fn get_array_latex(&self, name: &str) -> Result<String, EngineError> {
        Ok(self.lookup(name)?.to_latex(self.markup))
    }

    fn get_array(&self, name: &str, rows: usize, cols: usize) -> Result<Matrix, EngineError> {
        let matrix = self.lookup(name)?;
        matrix.block(rows, cols).ok_or_else(|| EngineError::OutOfRange {
            name: name.to_string(),
            rows,
            cols,
            available_rows: matrix.rows(),
            available_cols: matrix.cols(),
        })
    }
}
