//! Script runner for executing parsed scripts

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, debug_span, error, info, Level};

use crate::cli::{parse_command_line, Args, SubCommand};
use crate::error::{DatactlError, Result};
use crate::prompt::Prompter;
use crate::script::model::{ParsedLine, Script};
use crate::script::statement::{InputType, Statement, ValueDefault};
use crate::script::value::{Value, Values};

/// Executes commands that a script produces
pub trait Dispatch {
    /// Run one parsed top-level command on behalf of a script. `audit` is
    /// the rendered command text, recorded as the invocation's arguments.
    fn dispatch(&mut self, args: Args, audit: &str) -> Result<()>;
}

/// How a script is run
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// Pre-supplied values; these win over prompts and defaults
    pub arguments: Values,
    /// Log commands instead of dispatching them
    pub dry_run: bool,
    /// First line to run (1-based)
    pub start_at_line: usize,
    /// Log visible comments
    pub log_comments: bool,
    /// Stop at the first failing line
    pub exit_on_error: bool,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            arguments: Values::new(),
            dry_run: false,
            start_at_line: 1,
            log_comments: true,
            exit_on_error: true,
        }
    }
}

/// A line that failed and was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineError {
    pub line: usize,
    pub message: String,
}

/// Result of script execution
#[derive(Debug, Default)]
pub struct ScriptResult {
    /// Lines that completed without error
    pub lines_executed: usize,
    /// Errors that were logged and skipped
    pub errors: Vec<LineError>,
    /// Rendered command texts, in execution order
    pub commands: Vec<String>,
}

/// Mutable state of one script run
struct ExecutionState<'s> {
    script: &'s Script,
    options: &'s ScriptOptions,
    values: Values,
    result: ScriptResult,
}

impl<'s> ExecutionState<'s> {
    fn new(script: &'s Script, options: &'s ScriptOptions) -> Self {
        Self {
            script,
            options,
            values: options.arguments.clone(),
            result: ScriptResult::default(),
        }
    }
}

/// Interprets a script line by line
pub struct ScriptRunner<'a> {
    dispatcher: &'a mut dyn Dispatch,
    prompter: &'a mut dyn Prompter,
    interrupted: Option<Arc<AtomicBool>>,
}

impl<'a> ScriptRunner<'a> {
    /// Create a new script runner
    pub fn new(dispatcher: &'a mut dyn Dispatch, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            dispatcher,
            prompter,
            interrupted: None,
        }
    }

    /// Abort before the next line once `flag` is set.
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(flag);
        self
    }

    /// Run `script` from `options.start_at_line`.
    pub fn run(&mut self, script: &Script, options: &ScriptOptions) -> Result<ScriptResult> {
        let mut state = ExecutionState::new(script, options);

        let missing = missing_arguments(state.script, &state.options.arguments);
        if !missing.is_empty() {
            return Err(DatactlError::MissingArguments(missing));
        }

        let lines = state.script.lines_from(state.options.start_at_line);

        for line in lines {
            if self.is_interrupted() {
                return Err(DatactlError::Interrupted);
            }

            let _span = debug_span!("line", number = line.number).entered();
            match self.execute_line(line, &mut state) {
                Ok(()) => state.result.lines_executed += 1,
                Err(DatactlError::Interrupted) => return Err(DatactlError::Interrupted),
                Err(e) if state.options.exit_on_error && !state.options.dry_run => {
                    return Err(DatactlError::ScriptLine {
                        line: line.number,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    error!("Line {}: {}", line.number, e);
                    state.result.errors.push(LineError {
                        line: line.number,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(state.result)
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn execute_line(&mut self, line: &ParsedLine, state: &mut ExecutionState) -> Result<()> {
        match &line.statement {
            Statement::Value { name, default } => {
                if state.values.contains_key(name) {
                    debug!("'{}' already has a value", name);
                    return Ok(());
                }
                let value = match default {
                    Some(ValueDefault::Boolean(b)) => Value::Boolean(*b),
                    Some(ValueDefault::Template(template)) => {
                        Value::String(template.render(&state.values)?)
                    }
                    None => return Err(DatactlError::MissingArguments(vec![name.clone()])),
                };
                state.values.insert(name.clone(), value);
            }

            Statement::Input {
                name,
                input_type,
                message,
            } => {
                if state.values.contains_key(name) {
                    debug!("'{}' already has a value, not asking", name);
                    return Ok(());
                }
                let message = match message {
                    Some(template) => template.render(&state.values)?,
                    None => name.clone(),
                };
                let value = match input_type {
                    InputType::Text => Value::String(self.prompter.text(&message)?),
                    InputType::Bool => Value::Boolean(self.prompter.confirm(&message)?),
                    InputType::Password => Value::String(self.prompter.password(&message)?),
                };
                state.values.insert(name.clone(), value);
            }

            Statement::Wait { message } => {
                let message = match message {
                    Some(template) => template.render(&state.values)?,
                    None => String::new(),
                };
                self.prompter.wait_for_enter(&message)?;
            }

            Statement::VisibleComment { text } => {
                if state.options.log_comments {
                    let text = text.render(&state.values)?;
                    if text.is_empty() {
                        if blank_lines_enabled() {
                            eprintln!();
                        }
                    } else {
                        info!("{}", text);
                    }
                }
            }

            Statement::InvisibleComment { .. } | Statement::Empty => {}

            Statement::Command { command } => {
                let rendered = command.render(&state.values)?;
                let args = parse_command_line(&rendered)?;
                if matches!(args.command, SubCommand::Run(_)) {
                    return Err(DatactlError::NestedRun);
                }

                state.result.commands.push(rendered.clone());
                if state.options.dry_run {
                    info!("[dry-run] {}", rendered);
                } else {
                    self.dispatcher.dispatch(args, &rendered)?;
                }
            }
        }

        Ok(())
    }
}

// A blank comment line follows the same level filter as other comments.
fn blank_lines_enabled() -> bool {
    tracing::enabled!(Level::INFO)
}

/// Names of `$value` declarations anywhere in `script` that have no default
/// and were not supplied.
pub fn missing_arguments(script: &Script, arguments: &Values) -> Vec<String> {
    script
        .lines()
        .iter()
        .filter_map(|line| match &line.statement {
            Statement::Value {
                name,
                default: None,
            } if !arguments.contains_key(name) => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Explain a script without executing
pub fn explain_script(script: &Script) -> Vec<String> {
    script
        .lines()
        .iter()
        .map(|line| {
            let detail = match &line.statement {
                Statement::Value {
                    name,
                    default: None,
                } => format!("value {} (required argument)", name),
                Statement::Value {
                    name,
                    default: Some(ValueDefault::Boolean(b)),
                } => format!("value {} = {}", name, b),
                Statement::Value {
                    name,
                    default: Some(ValueDefault::Template(t)),
                } => format!("value {} = \"{}\"", name, t),
                Statement::Input {
                    name, input_type, ..
                } => format!("input {} {}", input_type, name),
                Statement::Wait { message: Some(m) } => format!("wait \"{}\"", m),
                Statement::Wait { message: None } => "wait".to_string(),
                Statement::Command { command } => format!("command {}", command),
                other => other.kind().to_string(),
            };

            let needs: Vec<String> = script
                .dependencies_of(line)
                .iter()
                .map(|dep| dep.number.to_string())
                .collect();
            if needs.is_empty() {
                format!("{:>3}: {}", line.number, detail)
            } else {
                format!("{:>3}: {} (needs lines {})", line.number, detail, needs.join(", "))
            }
        })
        .collect()
}
