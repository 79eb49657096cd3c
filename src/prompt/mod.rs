//! Interactive prompts used by running scripts

use std::borrow::Cow;

use rustyline::config::{ColorMode, Configurer};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Editor, Helper, Hinter, Validator};

use crate::error::{DatactlError, Result};

/// Source of user answers
pub trait Prompter {
    /// Ask for a line of free text.
    fn text(&mut self, message: &str) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Ask for a secret without echoing it.
    fn password(&mut self, message: &str) -> Result<String>;

    /// Block until the user presses enter.
    fn wait_for_enter(&mut self, message: &str) -> Result<()>;
}

#[derive(Completer, Helper, Hinter, Validator)]
struct MaskingHelper {
    masking: bool,
}

impl Highlighter for MaskingHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if self.masking {
            Cow::Owned("*".repeat(line.chars().count()))
        } else {
            Cow::Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        self.masking
    }
}

/// Prompts on the controlling terminal
///
/// The line editor is only set up when the first question is asked.
#[derive(Default)]
pub struct TerminalPrompter {
    editor: Option<Editor<MaskingHelper, DefaultHistory>>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn editor(&mut self) -> Result<&mut Editor<MaskingHelper, DefaultHistory>> {
        if self.editor.is_none() {
            let mut editor =
                Editor::<MaskingHelper, DefaultHistory>::new().map_err(prompt_error)?;
            editor.set_helper(Some(MaskingHelper { masking: false }));
            editor.set_auto_add_history(false);
            self.editor = Some(editor);
        }
        self.editor
            .as_mut()
            .ok_or_else(|| DatactlError::Prompt("terminal unavailable".to_string()))
    }

    fn read(&mut self, prompt: &str, masked: bool) -> Result<String> {
        let editor = self.editor()?;
        if let Some(helper) = editor.helper_mut() {
            helper.masking = masked;
        }
        editor.set_color_mode(if masked {
            ColorMode::Forced
        } else {
            ColorMode::Enabled
        });
        let line = editor.readline(prompt).map_err(prompt_error);
        if let Some(helper) = editor.helper_mut() {
            helper.masking = false;
        }
        line
    }
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, message: &str) -> Result<String> {
        self.read(&format!("{}: ", message), false)
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        loop {
            let answer = self.read(&format!("{} [y/n]: ", message), false)?;
            match parse_yes_no(&answer) {
                Some(answer) => return Ok(answer),
                None => eprintln!("Please answer 'y' or 'n'"),
            }
        }
    }

    fn password(&mut self, message: &str) -> Result<String> {
        self.read(&format!("{}: ", message), true)
    }

    fn wait_for_enter(&mut self, message: &str) -> Result<()> {
        let prompt = if message.is_empty() {
            "Waiting, press enter to continue...".to_string()
        } else {
            format!("{} (press enter to continue)", message)
        };
        self.read(&prompt, false).map(|_| ())
    }
}

/// Interpret a yes/no answer.
pub fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn prompt_error(e: ReadlineError) -> DatactlError {
    match e {
        ReadlineError::Interrupted | ReadlineError::Eof => DatactlError::Interrupted,
        other => DatactlError::Prompt(other.to_string()),
    }
}
