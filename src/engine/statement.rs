//! Statement splitting and parsing for the engine's input language.
//!
//! The language is deliberately small:
//! - statements are separated by newlines or by `;` outside brackets
//! - lines starting with `%` or `#` are comments
//! - `name = rhs` assigns, a bare `rhs` assigns to `ans`
//! - `rhs` is a matrix literal, a variable name, or a scalar expression

use lazy_static::lazy_static;
use regex::Regex;

use super::EngineError;

lazy_static! {
    /// A whole string that is a valid variable name.
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();

    /// Identifier-shaped tokens inside an expression.
    static ref IDENTIFIER_TOKEN: Regex = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").unwrap();
}

/// A parsed statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Statement<'a> {
    /// The assigned variable, or `None` for a bare expression.
    pub target: Option<&'a str>,
    pub rhs: Rhs<'a>,
}

/// Right-hand side of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rhs<'a> {
    /// Contents of a `[...]` literal, without the brackets.
    MatrixLiteral(&'a str),
    /// A lone variable name.
    Variable(&'a str),
    /// Anything else, handed to the scalar evaluator.
    Expression(&'a str),
}

/// Check if the input is a valid variable name.
pub fn is_identifier(input: &str) -> bool {
    IDENTIFIER.is_match(input)
}

/// Split source text into statements, keeping 1-based line numbers.
pub fn split_statements(source: &str) -> Vec<(usize, &str)> {
    let mut statements = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('%') || trimmed.starts_with('#') {
            continue;
        }

        let mut depth = 0usize;
        let mut start = 0;
        for (i, c) in line.char_indices() {
            match c {
                '[' | '(' => depth += 1,
                ']' | ')' => depth = depth.saturating_sub(1),
                ';' if depth == 0 => {
                    push_trimmed(&mut statements, index + 1, &line[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        push_trimmed(&mut statements, index + 1, &line[start..]);
    }

    statements
}

fn push_trimmed<'a>(statements: &mut Vec<(usize, &'a str)>, line: usize, text: &'a str) {
    let text = text.trim();
    if !text.is_empty() {
        statements.push((line, text));
    }
}

/// Parse one statement.
pub fn parse_statement(input: &str) -> Result<Statement<'_>, EngineError> {
    let (target, rhs) = match find_assignment(input) {
        Some(pos) => {
            let name = input[..pos].trim();
            if !is_identifier(name) {
                return Err(EngineError::InvalidName(name.to_string()));
            }
            (Some(name), input[pos + 1..].trim())
        }
        None => (None, input.trim()),
    };

    if rhs.is_empty() {
        return Err(EngineError::Syntax(format!("missing value in `{input}`")));
    }

    let rhs = if let Some(body) = rhs.strip_prefix('[') {
        let body = body
            .strip_suffix(']')
            .ok_or_else(|| EngineError::Syntax(format!("unclosed matrix literal `{rhs}`")))?;
        Rhs::MatrixLiteral(body)
    } else if is_identifier(rhs) {
        Rhs::Variable(rhs)
    } else {
        Rhs::Expression(rhs)
    };

    Ok(Statement { target, rhs })
}

/// Byte offset of the assignment `=`, skipping comparisons and anything
/// nested in brackets.
fn find_assignment(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'[' | b'(' => depth += 1,
            b']' | b')' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => {
                let prev = i.checked_sub(1).map(|p| bytes[p]);
                let next = bytes.get(i + 1).copied();
                let comparison = matches!(prev, Some(b'<' | b'>' | b'!' | b'='))
                    || next == Some(b'=');
                if !comparison {
                    return Some(i);
                }
            }
            _ => {}
        }
    }

    None
}

/// Split a matrix literal body into rows of element expressions.
///
/// Rows are separated by `;`, elements by whitespace or commas. Separators
/// inside parentheses belong to the element (`max(1, 2)`, `sqrt(1 + 3)`).
pub fn split_matrix_literal(body: &str) -> Vec<Vec<&str>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                push_element(&mut row, &body[start..i]);
                start = i + 1;
                if !row.is_empty() {
                    rows.push(std::mem::take(&mut row));
                }
            }
            c if depth == 0 && (c.is_whitespace() || c == ',') => {
                push_element(&mut row, &body[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    push_element(&mut row, &body[start..]);
    if !row.is_empty() {
        rows.push(row);
    }

    rows
}

fn push_element<'a>(row: &mut Vec<&'a str>, text: &'a str) {
    if !text.is_empty() {
        row.push(text);
    }
}

/// Replace identifiers in `expression` using `lookup`.
///
/// Identifiers glued to a preceding digit or dot (`1e5`, `0xff`) belong to a
/// number literal and are left alone, as are identifiers `lookup` declines.
pub fn substitute<F>(expression: &str, mut lookup: F) -> Result<String, EngineError>
where
    F: FnMut(&str) -> Result<Option<String>, EngineError>,
{
    let mut out = String::with_capacity(expression.len());
    let mut last = 0;

    for token in IDENTIFIER_TOKEN.find_iter(expression) {
        let glued = expression[..token.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if glued {
            continue;
        }

        if let Some(replacement) = lookup(token.as_str())? {
            out.push_str(&expression[last..token.start()]);
            out.push_str(&replacement);
            last = token.end();
        }
    }

    out.push_str(&expression[last..]);
    Ok(out)
}
