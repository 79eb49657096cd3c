//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::script::{ScriptSource, Value};

#[derive(Parser, Debug)]
#[command(name = "datactl")]
#[command(author, version, about = "Manage a data platform from the command line", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Enable dry-run mode (show what would happen without executing)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(long, global = true, env = "DATACTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Create users, groups and memberships
    Add {
        #[command(subcommand)]
        target: AddTarget,
    },

    /// Remove users, groups and memberships
    Delete {
        #[command(subcommand)]
        target: DeleteTarget,
    },

    /// List users or groups
    List {
        #[command(subcommand)]
        target: ListTarget,
    },

    /// Run a script
    Run(RunArgs),

    /// Parse and validate a script without running it
    Check {
        #[command(flatten)]
        source: ScriptSourceArgs,
    },

    /// List stored scripts
    Scripts,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AddTarget {
    /// Add a user
    User {
        username: String,

        /// Give the user superuser rights
        #[arg(long)]
        is_superuser: bool,

        /// Initial password
        #[arg(long)]
        password: Option<String>,
    },

    /// Add a group
    Group { name: String },

    /// Add a user to a group
    Member { group: String, username: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DeleteTarget {
    /// Delete a user
    User { username: String },

    /// Delete a group
    Group { name: String },

    /// Remove a user from a group
    Member { group: String, username: String },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ListTarget {
    /// List all users
    Users,

    /// List all groups
    Groups,
}

/// Where to read a script from
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ScriptSourceArgs {
    /// Name of a script in the scripts directory
    pub name: Option<String>,

    /// Path to a script file
    #[arg(long, short, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

impl ScriptSourceArgs {
    pub fn source(&self) -> ScriptSource {
        match (&self.file, &self.name) {
            (Some(path), _) => ScriptSource::Path(path.clone()),
            (None, Some(name)) => ScriptSource::Named(name.clone()),
            (None, None) => ScriptSource::Named(String::new()),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: ScriptSourceArgs,

    /// Start at this line; earlier lines run only when later ones need them
    #[arg(long, value_name = "LINE", default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub start_at_line: u64,

    /// Log failing lines and keep going
    #[arg(long)]
    pub ignore_errors: bool,

    /// Do not log visible comments
    #[arg(long)]
    pub no_comments: bool,

    /// Script arguments in the form name=value
    #[arg(short = 'a', long = "arg", value_name = "NAME=VALUE", value_parser = parse_script_argument)]
    pub args: Vec<(String, Value)>,
}

/// Parse a `name=value` script argument.
pub fn parse_script_argument(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid argument name '{}'", name));
    }
    Ok((name.to_string(), Value::from_argument(value)))
}
