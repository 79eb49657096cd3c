//! datactl - manage a data platform from the command line
//!
//! Besides single commands, datactl runs scripts: text files mixing
//! datactl commands with value declarations, prompts and comments.
//!
//! # Example
//!
//! ```no_run
//! use datactl::script::{Script, ScriptOptions};
//!
//! let script = Script::parse("$value name='henk'\nadd user {{name}}").unwrap();
//! for line in script.lines_from(2) {
//!     println!("{}: {}", line.number, line.raw_text);
//! }
//! let options = ScriptOptions { dry_run: true, ..Default::default() };
//! # let _ = options;
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod output;
pub mod platform;
pub mod prompt;
pub mod script;

pub use config::Config;
pub use engine::{execute_command, ExecutionContext, PlatformDispatcher};
pub use error::{DatactlError, Result};
pub use output::{format_output, OutputFormat};
pub use platform::{LocalPlatform, Platform};
pub use script::{Script, ScriptOptions, ScriptResult, ScriptRunner};
