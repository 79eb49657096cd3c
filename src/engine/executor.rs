//! Command executor

use serde::{Deserialize, Serialize};

use crate::cli::{AddTarget, Args, DeleteTarget, ListTarget, SubCommand};
use crate::error::{DatactlError, Result};
use crate::output::OutputFormat;
use crate::platform::{Group, Platform, User};

/// Execution context containing runtime configuration
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub dry_run: bool,
    pub output_format: OutputFormat,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            dry_run: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl ExecutionContext {
    pub fn from_args(args: &Args) -> Self {
        Self {
            dry_run: args.dry_run,
            output_format: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
        }
    }
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub data: ResultData,
    pub message: Option<String>,
}

impl ExecutionResult {
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            data: ResultData::Message(text.into()),
            message: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResultData {
    Users(Vec<User>),
    Groups(Vec<Group>),
    /// A checked script
    Script(ScriptInfo),
    /// Names of stored scripts
    Scripts(Vec<String>),
    Message(String),
    Empty,
}

/// Explanation of a validated script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptInfo {
    pub path: String,
    pub lines: Vec<String>,
}

/// Execute a platform command
pub fn execute_command(
    command: &SubCommand,
    platform: &mut dyn Platform,
    ctx: &ExecutionContext,
) -> Result<ExecutionResult> {
    match command {
        SubCommand::Add { target } => execute_add(target, platform, ctx),
        SubCommand::Delete { target } => execute_delete(target, platform, ctx),
        SubCommand::List { target } => execute_list(*target, platform),
        SubCommand::Run(_) | SubCommand::Check { .. } | SubCommand::Scripts => Err(
            DatactlError::execution("not a platform command"),
        ),
    }
}

fn execute_add(
    target: &AddTarget,
    platform: &mut dyn Platform,
    ctx: &ExecutionContext,
) -> Result<ExecutionResult> {
    let description = match target {
        AddTarget::User { username, .. } => format!("user '{}'", username),
        AddTarget::Group { name } => format!("group '{}'", name),
        AddTarget::Member { group, username } => format!("'{}' to group '{}'", username, group),
    };
    if ctx.dry_run {
        return Ok(ExecutionResult::message(format!(
            "[DRY RUN] Would add {}",
            description
        )));
    }

    match target {
        AddTarget::User {
            username,
            is_superuser,
            password,
        } => {
            platform.add_user(username, *is_superuser, password.as_deref())?;
        }
        AddTarget::Group { name } => {
            platform.add_group(name)?;
        }
        AddTarget::Member { group, username } => platform.add_member(group, username)?,
    }
    Ok(ExecutionResult::message(format!("Added {}", description)))
}

fn execute_delete(
    target: &DeleteTarget,
    platform: &mut dyn Platform,
    ctx: &ExecutionContext,
) -> Result<ExecutionResult> {
    let description = match target {
        DeleteTarget::User { username } => format!("user '{}'", username),
        DeleteTarget::Group { name } => format!("group '{}'", name),
        DeleteTarget::Member { group, username } => {
            format!("'{}' from group '{}'", username, group)
        }
    };
    if ctx.dry_run {
        return Ok(ExecutionResult::message(format!(
            "[DRY RUN] Would remove {}",
            description
        )));
    }

    match target {
        DeleteTarget::User { username } => platform.delete_user(username)?,
        DeleteTarget::Group { name } => platform.delete_group(name)?,
        DeleteTarget::Member { group, username } => platform.remove_member(group, username)?,
    }
    Ok(ExecutionResult::message(format!("Removed {}", description)))
}

fn execute_list(target: ListTarget, platform: &mut dyn Platform) -> Result<ExecutionResult> {
    let (data, count) = match target {
        ListTarget::Users => {
            let users = platform.users()?;
            let count = format!("{} user(s)", users.len());
            (ResultData::Users(users), count)
        }
        ListTarget::Groups => {
            let groups = platform.groups()?;
            let count = format!("{} group(s)", groups.len());
            (ResultData::Groups(groups), count)
        }
    };
    Ok(ExecutionResult {
        data,
        message: Some(count),
    })
}
