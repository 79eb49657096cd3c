//! Command-line grammar shared by the binary and by scripts

pub mod args;
pub mod words;

use clap::Parser;

pub use args::{AddTarget, Args, DeleteTarget, ListTarget, RunArgs, ScriptSourceArgs, SubCommand};
pub use words::split_words;

use crate::error::{DatactlError, Result};

/// Parse one command line, as typed in a script, with the top-level grammar.
pub fn parse_command_line(text: &str) -> Result<Args> {
    let words = split_words(text)?;
    if words.is_empty() {
        return Err(DatactlError::Usage("empty command".to_string()));
    }
    Args::try_parse_from(std::iter::once(env!("CARGO_PKG_NAME").to_string()).chain(words))
        .map_err(|e| DatactlError::Usage(e.to_string().trim_end().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let args = parse_command_line("add group 'data team' --json").unwrap();
        assert!(args.json);
        match args.command {
            SubCommand::Add {
                target: AddTarget::Group { name },
            } => assert_eq!(name, "data team"),
            other => panic!("Expected add group, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_command_line_errors() {
        assert!(matches!(
            parse_command_line("frobnicate users"),
            Err(DatactlError::Usage(_))
        ));
        assert!(matches!(parse_command_line(""), Err(DatactlError::Usage(_))));
    }

    #[test]
    fn test_run_is_recognised() {
        let args = parse_command_line("run other --dry-run").unwrap();
        assert!(matches!(args.command, SubCommand::Run(_)));
    }
}
