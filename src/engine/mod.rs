//! Execution engine for datactl commands

pub mod dispatch;
pub mod executor;
pub mod host;

pub use dispatch::PlatformDispatcher;
pub use executor::{execute_command, ExecutionContext, ExecutionResult, ResultData, ScriptInfo};
pub use host::{check_script, list_script_names, run_script};
