//! Dispatching parsed commands to the platform

use tracing::debug;

use crate::cli::{Args, SubCommand};
use crate::config::Config;
use crate::engine::executor::{execute_command, ExecutionContext, ResultData};
use crate::engine::host;
use crate::error::{DatactlError, Result};
use crate::output::format_output;
use crate::platform::Platform;
use crate::script::Dispatch;

/// Runs commands against a platform and prints their output.
///
/// Used for the command typed on the command line and, nested, for every
/// command a script produces.
pub struct PlatformDispatcher<'p> {
    platform: &'p mut dyn Platform,
    config: &'p Config,
    nested: bool,
}

impl<'p> PlatformDispatcher<'p> {
    pub fn new(platform: &'p mut dyn Platform, config: &'p Config) -> Self {
        Self {
            platform,
            config,
            nested: false,
        }
    }

    #[cfg(test)]
    fn is_nested(&self) -> bool {
        self.nested
    }

    fn nested(&mut self) -> PlatformDispatcher<'_> {
        PlatformDispatcher {
            platform: &mut *self.platform,
            config: self.config,
            nested: true,
        }
    }
}

impl Dispatch for PlatformDispatcher<'_> {
    fn dispatch(&mut self, args: Args, audit: &str) -> Result<()> {
        debug!(target: "datactl::audit", nested = self.nested, "{}", audit);

        let ctx = ExecutionContext::from_args(&args);
        let config = self.config;
        let result = match &args.command {
            SubCommand::Run(run) => {
                if self.nested {
                    return Err(DatactlError::NestedRun);
                }
                host::run_script(run, ctx.dry_run, config, &mut self.nested())?;
                return Ok(());
            }
            SubCommand::Check { source } => host::check_script(&source.source(), config)?,
            SubCommand::Scripts => host::list_script_names(config)?,
            command => execute_command(command, &mut *self.platform, &ctx)?,
        };

        if !matches!(result.data, ResultData::Empty) {
            println!("{}", format_output(&result, &ctx.output_format));
        }
        Ok(())
    }
}
