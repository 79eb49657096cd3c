//! Errors found while parsing and validating a script
//!
//! Every error renders as two lines: the offending source line, then an
//! indented explanation.

use thiserror::Error;

/// A line that does not match the script grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "line {line}{}: {text}\n    {message}",
    .column.map(|c| format!(", column {}", c)).unwrap_or_default()
)]
pub struct ScriptSyntaxError {
    pub line: usize,
    /// 1-based character column, when the failure point is known
    pub column: Option<usize>,
    pub text: String,
    pub message: String,
}

/// A single problem with a script
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error(transparent)]
    Syntax(#[from] ScriptSyntaxError),

    #[error("line {line}: {text}\n    '{name}' is already declared on line {first_line}")]
    Reassignment {
        name: String,
        line: usize,
        text: String,
        first_line: usize,
    },

    #[error("line {line}: {text}\n    '{name}' is used before its declaration on line {declared_on}")]
    ForwardReference {
        name: String,
        line: usize,
        text: String,
        declared_on: usize,
    },

    #[error("line {line}: {text}\n    '{name}' is never declared")]
    UnknownReference {
        name: String,
        line: usize,
        text: String,
    },

    #[error("line {line}: {text}\n    '{name}' cannot be used in its own declaration")]
    RecursiveReference {
        name: String,
        line: usize,
        text: String,
    },
}

impl ScriptError {
    /// Number of the line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Syntax(e) => e.line,
            ScriptError::Reassignment { line, .. }
            | ScriptError::ForwardReference { line, .. }
            | ScriptError::UnknownReference { line, .. }
            | ScriptError::RecursiveReference { line, .. } => *line,
        }
    }
}

/// A script that cannot be run, with every problem found in it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid script ({}):{}", self.error_count(), self.details())]
pub struct InvalidScript {
    pub errors: Vec<ScriptError>,
}

impl InvalidScript {
    fn error_count(&self) -> String {
        match self.errors.len() {
            1 => "1 error".to_string(),
            n => format!("{} errors", n),
        }
    }

    fn details(&self) -> String {
        self.errors.iter().map(|e| format!("\n{}", e)).collect()
    }
}
