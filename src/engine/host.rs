//! The `run`, `check` and `scripts` commands

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cli::RunArgs;
use crate::config::Config;
use crate::engine::executor::{ExecutionResult, ResultData, ScriptInfo};
use crate::error::{DatactlError, Result};
use crate::prompt::TerminalPrompter;
use crate::script::{
    explain_script, list_scripts, Dispatch, Script, ScriptOptions, ScriptResult, ScriptRunner,
    ScriptSource,
};

/// Translate `run` arguments into runner options.
pub fn script_options(run: &RunArgs, dry_run: bool, config: &Config) -> ScriptOptions {
    ScriptOptions {
        arguments: run.args.iter().cloned().collect(),
        dry_run,
        start_at_line: usize::try_from(run.start_at_line).unwrap_or(usize::MAX),
        log_comments: config.log_comments && !run.no_comments,
        exit_on_error: !run.ignore_errors,
    }
}

/// Load and run a script, sending its commands to `dispatcher`.
pub fn run_script(
    run: &RunArgs,
    dry_run: bool,
    config: &Config,
    dispatcher: &mut dyn Dispatch,
) -> Result<ScriptResult> {
    let source = run.source.source();
    let script = source.load(&config.scripts_dir)?;
    let options = script_options(run, dry_run, config);
    debug!(
        "Running {:?} from line {} ({} lines)",
        source,
        options.start_at_line,
        script.lines().len()
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    ctrlc::set_handler(move || {
        if record_interrupt(&flag) {
            std::process::exit(DatactlError::Interrupted.exit_code());
        }
        warn!("Interrupted, stopping before the next line (press Ctrl-C again to abort now)");
    })
    .map_err(|e| DatactlError::execution(format!("Failed to set Ctrl+C handler: {}", e)))?;

    let mut prompter = TerminalPrompter::new();
    let result = ScriptRunner::new(dispatcher, &mut prompter)
        .with_interrupt_flag(interrupted)
        .run(&script, &options)?;

    if result.errors.is_empty() {
        debug!("Script completed: {} lines executed", result.lines_executed);
    } else {
        warn!(
            "Script completed with {} failed line(s): {}",
            result.errors.len(),
            result
                .errors
                .iter()
                .map(|e| e.line.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(result)
}

/// Set the interrupt flag. Returns true when an interrupt was already
/// pending, so the run is blocked somewhere and must be abandoned.
fn record_interrupt(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::SeqCst)
}

/// Parse and validate a script without running it.
pub fn check_script(source: &ScriptSource, config: &Config) -> Result<ExecutionResult> {
    let path = source.resolve(&config.scripts_dir)?;
    let script = Script::parse(&fs::read_to_string(&path)?)?;
    let lines = explain_script(&script);
    Ok(ExecutionResult {
        message: Some(format!("{} is valid", path.display())),
        data: ResultData::Script(ScriptInfo {
            path: path.display().to_string(),
            lines,
        }),
    })
}

/// List the scripts in the scripts directory.
pub fn list_script_names(config: &Config) -> Result<ExecutionResult> {
    Ok(ExecutionResult {
        data: ResultData::Scripts(list_scripts(&config.scripts_dir)?),
        message: None,
    })
}
