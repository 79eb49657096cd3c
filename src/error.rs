//! Error types for datactl

use std::path::PathBuf;

use thiserror::Error;

use crate::script::error::InvalidScript;
use crate::script::template::RenderError;

#[derive(Error, Debug)]
pub enum DatactlError {
    #[error("{message}{}", .info.as_ref().map(|i| format!(" ({})", i)).unwrap_or_default())]
    Execution {
        message: String,
        info: Option<String>,
    },

    #[error("Invalid command: {0}")]
    Usage(String),

    #[error(transparent)]
    InvalidScript(#[from] InvalidScript),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Missing required script arguments: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    #[error("Scripts cannot run other scripts")]
    NestedRun,

    #[error("Line {line}: {source}")]
    ScriptLine {
        line: usize,
        #[source]
        source: Box<DatactlError>,
    },

    #[error("Script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error("Interrupted")]
    Interrupted,

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl DatactlError {
    /// Build a plain domain error without supplementary info.
    pub fn execution(message: impl Into<String>) -> Self {
        DatactlError::Execution {
            message: message.into(),
            info: None,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DatactlError::Usage(_) | DatactlError::InvalidScript(_) => 2,
            DatactlError::Interrupted => 130,
            DatactlError::ScriptLine { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatactlError>;
