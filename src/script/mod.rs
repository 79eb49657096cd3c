//! Script support for datactl
//!
//! Scripts are plain text files holding one statement per line: value
//! declarations, prompts, pauses, comments and datactl commands. Commands
//! may use `{{name}}` placeholders that are filled from declared values.

pub mod error;
pub mod lines;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod runner;
pub mod source;
pub mod statement;
pub mod template;
pub mod value;

pub use error::{InvalidScript, ScriptError, ScriptSyntaxError};
pub use lines::{combine_lines, Line};
pub use model::{ParsedLine, Script};
pub use parser::parse_line;
pub use runner::{
    explain_script, missing_arguments, Dispatch, LineError, ScriptOptions, ScriptResult,
    ScriptRunner,
};
pub use source::{list_scripts, ScriptSource, SCRIPT_EXTENSION};
pub use statement::{InputType, Statement, ValueDefault};
pub use template::{RenderError, Template, TemplateError};
pub use value::{Value, Values};
