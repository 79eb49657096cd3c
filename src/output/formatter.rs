//! Output format selection

use crate::engine::executor::ExecutionResult;
use crate::output::human::format_human;
use crate::output::json::format_json;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned tables and plain messages
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
}

/// Render a command result.
pub fn format_output(result: &ExecutionResult, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(result),
        OutputFormat::Json => format_json(result),
    }
}
