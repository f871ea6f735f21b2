//! Dense matrices and their LaTeX rendering.

use serde::{Deserialize, Serialize};

use super::EngineError;
use crate::script::Value;

/// LaTeX environment used to render non-scalar matrices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixMarkup {
    /// `\left(\begin{array}{cc} .. \end{array}\right)`, understood by
    /// lightweight equation renderers.
    #[default]
    Array,
    /// `\begin{pmatrix} .. \end{pmatrix}`
    Pmatrix,
    /// `\begin{bmatrix} .. \end{bmatrix}`
    Bmatrix,
}

/// A row-major matrix of numbers. Scalars are 1x1.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A 1x1 matrix.
    pub fn scalar(value: f64) -> Self {
        Self {
            rows: 1,
            cols: 1,
            data: vec![value],
        }
    }

    /// Build from rows, which must be non-empty and equally long.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(EngineError::Syntax("empty matrix".to_string()));
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.len() != cols {
                return Err(EngineError::RaggedMatrix {
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`, zero-based.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// The single value of a 1x1 matrix.
    pub fn as_scalar(&self) -> Option<f64> {
        if self.rows == 1 && self.cols == 1 {
            self.data.first().copied()
        } else {
            None
        }
    }

    /// Copy out the rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }

    /// The top-left `rows x cols` block, if it fits and is non-empty.
    pub fn block(&self, rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 || rows > self.rows || cols > self.cols {
            return None;
        }

        let data = self
            .data
            .chunks(self.cols)
            .take(rows)
            .flat_map(|row| row[..cols].iter().copied())
            .collect();

        Some(Self { rows, cols, data })
    }

    /// Render as LaTeX. Scalars render as the bare number.
    pub fn to_latex(&self, markup: MatrixMarkup) -> String {
        if let Some(value) = self.as_scalar() {
            return format_number(value);
        }

        let body = self
            .data
            .chunks(self.cols)
            .map(|row| {
                row.iter()
                    .map(|&v| format_number(v))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join(" \\\\ ");

        match markup {
            MatrixMarkup::Array => format!(
                "\\left(\\begin{{array}}{{{}}}{}\\end{{array}}\\right)",
                "c".repeat(self.cols),
                body
            ),
            MatrixMarkup::Pmatrix => format!("\\begin{{pmatrix}}{body}\\end{{pmatrix}}"),
            MatrixMarkup::Bmatrix => format!("\\begin{{bmatrix}}{body}\\end{{bmatrix}}"),
        }
    }
}

impl From<Matrix> for Value {
    fn from(matrix: Matrix) -> Self {
        Value::Matrix(matrix.to_rows())
    }
}

/// Format a number for markup: integers without decimals, everything else
/// to at most ten places with trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "\\mathrm{NaN}".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "\\infty".to_string()
        } else {
            "-\\infty".to_string()
        };
    }

    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.10}", value);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_three() -> Matrix {
        Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-1e-12), "0");
        assert_eq!(format_number(f64::INFINITY), "\\infty");
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::RaggedMatrix {
                expected: 2,
                found: 1
            }
        ));
        assert!(Matrix::from_rows(vec![]).is_err());
    }

    #[test]
    fn test_accessors() {
        let m = two_by_three();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.as_scalar(), None);
        assert_eq!(Matrix::scalar(7.0).as_scalar(), Some(7.0));
    }

    #[test]
    fn test_block() {
        let m = two_by_three();
        let block = m.block(2, 2).unwrap();
        assert_eq!(block.to_rows(), vec![vec![1.0, 2.0], vec![4.0, 5.0]]);
        assert_eq!(m.block(1, 3).unwrap().to_rows(), vec![vec![1.0, 2.0, 3.0]]);
        assert!(m.block(3, 1).is_none());
        assert!(m.block(0, 1).is_none());
    }

    #[test]
    fn test_latex_array() {
        assert_eq!(
            two_by_three().to_latex(MatrixMarkup::Array),
            "\\left(\\begin{array}{ccc}1 & 2 & 3 \\\\ 4 & 5 & 6\\end{array}\\right)"
        );
    }

    #[test]
    fn test_latex_environments() {
        let m = Matrix::from_rows(vec![vec![0.5], vec![2.0]]).unwrap();
        assert_eq!(
            m.to_latex(MatrixMarkup::Pmatrix),
            "\\begin{pmatrix}0.5 \\\\ 2\\end{pmatrix}"
        );
        assert_eq!(
            m.to_latex(MatrixMarkup::Bmatrix),
            "\\begin{bmatrix}0.5 \\\\ 2\\end{bmatrix}"
        );
    }

    #[test]
    fn test_scalar_latex_is_bare() {
        assert_eq!(Matrix::scalar(3.5).to_latex(MatrixMarkup::Array), "3.5");
    }

    #[test]
    fn test_into_value() {
        let value: Value = Matrix::scalar(1.0).into();
        assert_eq!(value, Value::Matrix(vec![vec![1.0]]));
    }
}
